use super::backward_pass::LateDates;
use super::forward_pass::EarlyDates;
use crate::error::{ScheduleError, ScheduleResult};
use crate::schedule::{Schedule, ScheduleRecord, TaskStatus};
use crate::task::Task;
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::debug;

/// Derive slack and status for every task and collect the critical path in
/// topological order.
pub fn classify(
    tasks: &[Task],
    order: &[String],
    early: &EarlyDates,
    late: &LateDates,
    project_start: NaiveDate,
    project_finish: NaiveDate,
) -> ScheduleResult<Schedule> {
    let mut records = Vec::with_capacity(tasks.len());
    for task in tasks {
        // A task missing from either pass was never ordered.
        let (Some(&(early_start, early_finish)), Some(&(late_start, late_finish))) =
            (early.get(&task.id), late.get(&task.id))
        else {
            return Err(ScheduleError::CycleDetected {
                unresolved: vec![task.id.clone()],
                cycles: Vec::new(),
            });
        };

        let slack_days = (late_finish - early_finish).num_days();
        records.push(ScheduleRecord {
            activity: task.id.clone(),
            duration_days: task.duration_days,
            dependencies: task.dependencies.clone(),
            early_start,
            early_finish,
            late_start,
            late_finish,
            slack_days,
            status: TaskStatus::from_slack(slack_days),
        });
    }

    let critical: HashSet<&str> = records
        .iter()
        .filter(|record| record.is_critical())
        .map(|record| record.activity.as_str())
        .collect();
    let critical_path: Vec<String> = order
        .iter()
        .filter(|id| critical.contains(id.as_str()))
        .cloned()
        .collect();

    debug!(critical = critical_path.len(), "critical path classified");
    Ok(Schedule::from_parts(
        project_start,
        project_finish,
        records,
        critical_path,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn d(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn slack_is_late_finish_minus_early_finish() {
        let tasks = vec![Task::new("A", 1), Task::new("B", 1)];
        let order = vec!["B".to_string(), "A".to_string()];
        let early: EarlyDates = HashMap::from([
            ("A".to_string(), (d(2025, 1, 1), d(2025, 1, 1))),
            ("B".to_string(), (d(2025, 1, 1), d(2025, 1, 3))),
        ]);
        let late: LateDates = HashMap::from([
            ("A".to_string(), (d(2025, 1, 3), d(2025, 1, 3))),
            ("B".to_string(), (d(2025, 1, 1), d(2025, 1, 3))),
        ]);

        let schedule = classify(&tasks, &order, &early, &late, d(2025, 1, 1), d(2025, 1, 3)).unwrap();
        let a = schedule.record("A").unwrap();
        assert_eq!(a.slack_days, 2);
        assert_eq!(a.status, TaskStatus::NonCritical);
        assert_eq!(schedule.record("B").unwrap().status, TaskStatus::Critical);
        assert_eq!(schedule.critical_path(), ["B".to_string()]);
        // records keep input order
        assert_eq!(schedule.records()[0].activity, "A");
    }

    #[test]
    fn missing_dates_fail_the_run() {
        let tasks = vec![Task::new("A", 1)];
        let err = classify(
            &tasks,
            &[],
            &EarlyDates::new(),
            &LateDates::new(),
            d(2025, 1, 1),
            d(2025, 1, 1),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "cycle_detected");
    }
}
