//! Errors produced while turning task rows into a schedule.
//!
//! Every variant is terminal for the run that produced it; no partial
//! schedule ever accompanies an error.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("no tasks to schedule")]
    EmptyTaskList,

    #[error("invalid duration for activity id(s): {}", .ids.join(", "))]
    InvalidDuration { ids: Vec<String> },

    #[error("activity id(s) are blank or carry surrounding whitespace: {:?}", .ids)]
    InvalidActivityId { ids: Vec<String> },

    #[error("duplicate activity id(s): {}; activity ids must be unique", .ids.join(", "))]
    DuplicateActivityId { ids: Vec<String> },

    #[error("activity id(s) list the same dependency more than once: {}", .ids.join(", "))]
    RepeatedDependency { ids: Vec<String> },

    #[error("activity id(s) depend on themselves: {}", .ids.join(", "))]
    SelfDependency { ids: Vec<String> },

    #[error("dependency refers to unknown activity id(s): {}", .ids.join(", "))]
    UnknownDependencyReference { ids: Vec<String> },

    #[error("cycle detected in dependencies; unable to order: {}", .unresolved.join(", "))]
    CycleDetected {
        /// Every task the topological sort could not order.
        unresolved: Vec<String>,
        /// Strongly connected components of more than one task.
        cycles: Vec<Vec<String>>,
    },

    #[error("date for activity {id} falls outside the supported calendar range")]
    DateOutOfRange { id: String },
}

impl ScheduleError {
    /// Stable machine-readable code for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ScheduleError::EmptyTaskList => "empty_task_list",
            ScheduleError::InvalidDuration { .. } => "invalid_duration",
            ScheduleError::InvalidActivityId { .. } => "invalid_activity_id",
            ScheduleError::DuplicateActivityId { .. } => "duplicate_activity_id",
            ScheduleError::RepeatedDependency { .. } => "repeated_dependency",
            ScheduleError::SelfDependency { .. } => "self_dependency",
            ScheduleError::UnknownDependencyReference { .. } => "unknown_dependency_reference",
            ScheduleError::CycleDetected { .. } => "cycle_detected",
            ScheduleError::DateOutOfRange { .. } => "date_out_of_range",
        }
    }

    /// Offending activity ids, in input order.
    pub fn ids(&self) -> Vec<String> {
        match self {
            ScheduleError::EmptyTaskList => Vec::new(),
            ScheduleError::InvalidDuration { ids }
            | ScheduleError::InvalidActivityId { ids }
            | ScheduleError::DuplicateActivityId { ids }
            | ScheduleError::RepeatedDependency { ids }
            | ScheduleError::SelfDependency { ids }
            | ScheduleError::UnknownDependencyReference { ids } => ids.clone(),
            ScheduleError::CycleDetected { unresolved, .. } => unresolved.clone(),
            ScheduleError::DateOutOfRange { id } => vec![id.clone()],
        }
    }
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
