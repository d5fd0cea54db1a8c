use super::{shift_forward, span_days};
use crate::error::ScheduleResult;
use crate::graph::ScheduleDag;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

/// Early dates (ES, EF) keyed by task id.
pub type EarlyDates = HashMap<String, (NaiveDate, NaiveDate)>;

pub struct ForwardPass<'a> {
    dag: &'a ScheduleDag,
}

impl<'a> ForwardPass<'a> {
    pub fn new(dag: &'a ScheduleDag) -> Self {
        Self { dag }
    }

    /// Walk `order` (a topological order of the dag) and compute early dates.
    ///
    /// Tasks without dependencies start on `project_start`; every other task
    /// starts the day after its latest-finishing dependency.
    pub fn execute(&self, order: &[String], project_start: NaiveDate) -> ScheduleResult<EarlyDates> {
        let mut early_finishes: HashMap<&str, NaiveDate> = HashMap::with_capacity(order.len());
        let mut results: EarlyDates = HashMap::with_capacity(order.len());

        for task_id in order {
            let deps = self.dag.dependencies(task_id);
            let early_start = if deps.is_empty() {
                project_start
            } else {
                let max_dep_finish = deps
                    .iter()
                    .filter_map(|dep| early_finishes.get(dep.as_str()))
                    .max()
                    .copied()
                    .unwrap_or(project_start);
                shift_forward(max_dep_finish, 1, task_id)?
            };
            let early_finish =
                shift_forward(early_start, span_days(self.dag.duration(task_id)), task_id)?;

            early_finishes.insert(task_id.as_str(), early_finish);
            results.insert(task_id.clone(), (early_start, early_finish));
        }

        debug!(tasks = results.len(), "forward pass complete");
        Ok(results)
    }
}
