pub mod backward_pass;
pub mod critical_path;
pub mod forward_pass;

use crate::error::{ScheduleError, ScheduleResult};
use chrono::{Days, NaiveDate};

fn shift_forward(date: NaiveDate, days: u64, task_id: &str) -> ScheduleResult<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| ScheduleError::DateOutOfRange {
            id: task_id.to_string(),
        })
}

fn shift_back(date: NaiveDate, days: u64, task_id: &str) -> ScheduleResult<NaiveDate> {
    date.checked_sub_days(Days::new(days))
        .ok_or_else(|| ScheduleError::DateOutOfRange {
            id: task_id.to_string(),
        })
}

/// Inclusive day count: a task spanning `d > 0` days finishes `d - 1` days
/// after it starts; milestones finish on their start day.
fn span_days(duration_days: u32) -> u64 {
    u64::from(duration_days.saturating_sub(1))
}
