use super::forward_pass::EarlyDates;
use super::{shift_back, span_days};
use crate::error::ScheduleResult;
use crate::graph::ScheduleDag;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

/// Late dates (LS, LF) keyed by task id.
pub type LateDates = HashMap<String, (NaiveDate, NaiveDate)>;

pub struct BackwardPass<'a> {
    dag: &'a ScheduleDag,
}

impl<'a> BackwardPass<'a> {
    pub fn new(dag: &'a ScheduleDag) -> Self {
        Self { dag }
    }

    /// Latest early finish over all tasks.
    pub fn project_finish(early: &EarlyDates) -> Option<NaiveDate> {
        early.values().map(|(_, early_finish)| *early_finish).max()
    }

    /// Walk `order` in reverse and compute late dates.
    ///
    /// Tasks without successors must finish by `project_finish`; every other
    /// task must finish the day before its earliest late-starting successor.
    pub fn execute(&self, order: &[String], project_finish: NaiveDate) -> ScheduleResult<LateDates> {
        let mut late_starts: HashMap<&str, NaiveDate> = HashMap::with_capacity(order.len());
        let mut results: LateDates = HashMap::with_capacity(order.len());

        for task_id in order.iter().rev() {
            let successors = self.dag.successors(task_id);
            let late_finish = if successors.is_empty() {
                project_finish
            } else {
                let min_succ_start = successors
                    .iter()
                    .filter_map(|succ| late_starts.get(succ.as_str()))
                    .min()
                    .copied()
                    .unwrap_or(project_finish);
                shift_back(min_succ_start, 1, task_id)?
            };
            let late_start =
                shift_back(late_finish, span_days(self.dag.duration(task_id)), task_id)?;

            late_starts.insert(task_id.as_str(), late_start);
            results.insert(task_id.clone(), (late_start, late_finish));
        }

        debug!(tasks = results.len(), %project_finish, "backward pass complete");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::forward_pass::ForwardPass;
    use crate::graph::topological_order;
    use crate::task::Task;

    fn d(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn run(tasks: &[Task], start: NaiveDate) -> (EarlyDates, LateDates) {
        let dag = ScheduleDag::build(tasks);
        let order = topological_order(&dag).unwrap();
        let early = ForwardPass::new(&dag).execute(&order, start).unwrap();
        let finish = BackwardPass::project_finish(&early).unwrap();
        let late = BackwardPass::new(&dag).execute(&order, finish).unwrap();
        (early, late)
    }

    #[test]
    fn backward_pass_sets_late_dates() {
        // 1 -> {2,3} -> 4 with durations 2,3,1,2
        let tasks = vec![
            Task::new("T1", 2),
            Task::new("T2", 3).with_dependencies(["T1"]),
            Task::new("T3", 1).with_dependencies(["T1"]),
            Task::new("T4", 2).with_dependencies(["T2", "T3"]),
        ];
        let (early, late) = run(&tasks, d(2025, 1, 6));

        assert_eq!(BackwardPass::project_finish(&early), Some(d(2025, 1, 12)));
        assert_eq!(late["T4"], (d(2025, 1, 11), d(2025, 1, 12)));
        assert_eq!(late["T2"], (d(2025, 1, 8), d(2025, 1, 10)));
        assert_eq!(late["T3"], (d(2025, 1, 10), d(2025, 1, 10)));
        assert_eq!(late["T1"], (d(2025, 1, 6), d(2025, 1, 7)));
    }

    #[test]
    fn milestone_late_start_mirrors_late_finish() {
        let tasks = vec![
            Task::new("A", 4),
            Task::new("Gate", 0).with_dependencies(["A"]),
            Task::new("B", 1),
        ];
        let (_, late) = run(&tasks, d(2025, 5, 1));
        // finish is Gate's EF = May 5
        assert_eq!(late["Gate"], (d(2025, 5, 5), d(2025, 5, 5)));
        assert_eq!(late["A"], (d(2025, 5, 1), d(2025, 5, 4)));
        assert_eq!(late["B"], (d(2025, 5, 5), d(2025, 5, 5)));
    }

    #[test]
    fn empty_early_map_has_no_finish() {
        assert_eq!(BackwardPass::project_finish(&EarlyDates::new()), None);
    }
}
