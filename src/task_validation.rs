use crate::error::{ScheduleError, ScheduleResult};
use crate::task::{RawDuration, Task, TaskRow};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Turn raw rows into typed tasks.
///
/// Rows whose trimmed activity is blank are skipped. Missing or blank
/// durations default to 0 (a milestone); anything else that is not a
/// non-negative whole number is rejected. Every check scans the full input
/// so the error carries all offending ids.
pub fn normalize_rows(rows: &[TaskRow]) -> ScheduleResult<Vec<Task>> {
    let mut tasks = Vec::with_capacity(rows.len());
    let mut invalid_durations: Vec<String> = Vec::new();
    let mut skipped = 0usize;

    for row in rows {
        let id = row.activity.trim();
        if id.is_empty() {
            skipped += 1;
            continue;
        }

        let duration_days = match parse_duration(row.duration.as_ref()) {
            Some(days) => days,
            None => {
                push_unique(&mut invalid_durations, id);
                0
            }
        };

        let dependencies = split_dependencies(row.dependencies.as_deref());
        tasks.push(Task::new(id, duration_days).with_dependencies(dependencies));
    }

    if skipped > 0 {
        warn!(skipped, "skipped task rows with a blank activity");
    }
    if !invalid_durations.is_empty() {
        return Err(ScheduleError::InvalidDuration {
            ids: invalid_durations,
        });
    }

    validate_task_collection(&tasks)?;
    debug!(rows = rows.len(), tasks = tasks.len(), "normalized task rows");
    Ok(tasks)
}

/// Check id shape, uniqueness, dependency sets, self references, and that
/// every dependency resolves.
pub fn validate_task_collection(tasks: &[Task]) -> ScheduleResult<()> {
    if tasks.is_empty() {
        return Err(ScheduleError::EmptyTaskList);
    }

    let malformed: Vec<String> = tasks
        .iter()
        .filter(|task| task.id.is_empty() || task.id.trim() != task.id)
        .map(|task| task.id.clone())
        .collect();
    if !malformed.is_empty() {
        return Err(ScheduleError::InvalidActivityId { ids: malformed });
    }

    let mut seen_ids: HashSet<&str> = HashSet::with_capacity(tasks.len());
    let mut duplicates: Vec<String> = Vec::new();
    for task in tasks {
        if !seen_ids.insert(task.id.as_str()) {
            push_unique(&mut duplicates, &task.id);
        }
    }
    if !duplicates.is_empty() {
        return Err(ScheduleError::DuplicateActivityId { ids: duplicates });
    }

    let repeated: Vec<String> = tasks
        .iter()
        .filter(|task| {
            let mut seen: HashSet<&str> = HashSet::with_capacity(task.dependencies.len());
            !task.dependencies.iter().all(|dep| seen.insert(dep.as_str()))
        })
        .map(|task| task.id.clone())
        .collect();
    if !repeated.is_empty() {
        return Err(ScheduleError::RepeatedDependency { ids: repeated });
    }

    let self_dependent: Vec<String> = tasks
        .iter()
        .filter(|task| task.dependencies.iter().any(|dep| *dep == task.id))
        .map(|task| task.id.clone())
        .collect();
    if !self_dependent.is_empty() {
        return Err(ScheduleError::SelfDependency {
            ids: self_dependent,
        });
    }

    let mut unknown: Vec<String> = Vec::new();
    for task in tasks {
        for dep in &task.dependencies {
            if !seen_ids.contains(dep.as_str()) {
                push_unique(&mut unknown, dep);
            }
        }
    }
    if !unknown.is_empty() {
        return Err(ScheduleError::UnknownDependencyReference { ids: unknown });
    }

    Ok(())
}

/// `None` means the value is present but not a usable day count.
pub fn parse_duration(raw: Option<&RawDuration>) -> Option<u32> {
    match raw {
        None => Some(0),
        Some(RawDuration::Integer(value)) => u32::try_from(*value).ok(),
        Some(RawDuration::Float(value)) => whole_days(*value),
        Some(RawDuration::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Some(0);
            }
            match text.parse::<i64>() {
                Ok(value) => u32::try_from(value).ok(),
                Err(_) => text.parse::<f64>().ok().and_then(whole_days),
            }
        }
    }
}

fn whole_days(value: f64) -> Option<u32> {
    if !value.is_finite() || value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    Some(value as u32)
}

/// Split a comma separated dependency cell, trimming tokens and dropping
/// empty ones.
pub fn split_dependencies(raw: Option<&str>) -> Vec<String> {
    let mut deps: Vec<String> = Vec::new();
    for token in raw.unwrap_or_default().split(',') {
        let token = token.trim();
        if !token.is_empty() {
            push_unique(&mut deps, token);
        }
    }
    deps
}

fn push_unique(ids: &mut Vec<String>, id: &str) {
    if !ids.iter().any(|existing| existing == id) {
        ids.push(id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(activity: &str, duration: &str, deps: &str) -> TaskRow {
        TaskRow::new(activity, duration, deps)
    }

    #[test]
    fn trims_ids_and_dependency_tokens() {
        let tasks = normalize_rows(&[
            row(" A ", "2", ""),
            row("B", "3", " A ,, "),
            row("C", "1", "A, B, A"),
        ])
        .unwrap();
        assert_eq!(tasks[0].id, "A");
        assert_eq!(tasks[1].dependencies, vec!["A".to_string()]);
        assert_eq!(tasks[2].dependencies, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn blank_activity_rows_are_skipped() {
        let tasks = normalize_rows(&[row("A", "1", ""), row("   ", "4", "A")]).unwrap();
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn only_blank_rows_is_an_empty_task_list() {
        let err = normalize_rows(&[row("", "1", "")]).unwrap_err();
        assert_eq!(err, ScheduleError::EmptyTaskList);
    }

    #[test]
    fn duration_policy() {
        assert_eq!(parse_duration(None), Some(0));
        assert_eq!(parse_duration(Some(&RawDuration::from(""))), Some(0));
        assert_eq!(parse_duration(Some(&RawDuration::from(" 7 "))), Some(7));
        assert_eq!(parse_duration(Some(&RawDuration::from("5.0"))), Some(5));
        assert_eq!(parse_duration(Some(&RawDuration::Float(3.0))), Some(3));
        assert_eq!(parse_duration(Some(&RawDuration::Integer(0))), Some(0));
        assert_eq!(parse_duration(Some(&RawDuration::Integer(-1))), None);
        assert_eq!(parse_duration(Some(&RawDuration::from("2.5"))), None);
        assert_eq!(parse_duration(Some(&RawDuration::from("abc"))), None);
        assert_eq!(parse_duration(Some(&RawDuration::from("NaN"))), None);
        assert_eq!(parse_duration(Some(&RawDuration::Float(f64::INFINITY))), None);
    }

    #[test]
    fn invalid_durations_are_all_reported() {
        let err = normalize_rows(&[
            row("A", "-2", ""),
            row("B", "x", "A"),
            row("C", "3", "A"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::InvalidDuration {
                ids: vec!["A".into(), "B".into()]
            }
        );
    }

    #[test]
    fn duplicates_are_reported_once_each_in_input_order() {
        let err = normalize_rows(&[
            row("B", "1", ""),
            row("A", "1", ""),
            row("B", "1", ""),
            row("A", "1", ""),
            row("B", "1", ""),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::DuplicateActivityId {
                ids: vec!["B".into(), "A".into()]
            }
        );
    }

    #[test]
    fn unknown_references_are_all_reported() {
        let err = normalize_rows(&[
            row("A", "1", "X"),
            row("B", "1", "A, Y, X"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::UnknownDependencyReference {
                ids: vec!["X".into(), "Y".into()]
            }
        );
    }

    #[test]
    fn self_dependency_has_its_own_error() {
        let err = normalize_rows(&[row("A", "1", "A"), row("B", "1", "B, A")]).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::SelfDependency {
                ids: vec!["A".into(), "B".into()]
            }
        );
    }

    #[test]
    fn typed_tasks_with_blank_or_padded_ids_are_rejected() {
        let err = validate_task_collection(&[Task::new("", 1), Task::new(" A ", 1), Task::new("B", 1)])
            .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::InvalidActivityId {
                ids: vec!["".into(), " A ".into()]
            }
        );
    }

    #[test]
    fn typed_tasks_with_repeated_dependencies_are_rejected() {
        let tasks = vec![
            Task::new("A", 1),
            Task {
                id: "B".into(),
                duration_days: 1,
                dependencies: vec!["A".into(), "A".into()],
            },
        ];
        let err = validate_task_collection(&tasks).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::RepeatedDependency {
                ids: vec!["B".into()]
            }
        );
    }

    #[test]
    fn duplicate_check_runs_before_reference_check() {
        let err = normalize_rows(&[row("A", "1", "Z"), row("A", "1", "")]).unwrap_err();
        assert_eq!(err.kind(), "duplicate_activity_id");
    }
}
