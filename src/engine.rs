//! Single entry point for schedule computation.
//!
//! Each call is a full, stateless run: rows are normalized, the dependency
//! graph is built and ordered, both passes run, and tasks are classified.
//! Any failure ends the run without a partial schedule. Nothing is shared
//! between calls, so callers may run them in parallel freely.

use crate::calculations::backward_pass::BackwardPass;
use crate::calculations::critical_path::classify;
use crate::calculations::forward_pass::ForwardPass;
use crate::error::ScheduleResult;
use crate::graph::{ScheduleDag, topological_order};
use crate::schedule::Schedule;
use crate::task::{Task, TaskRow};
use crate::task_validation::{normalize_rows, validate_task_collection};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Input for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub start_date: NaiveDate,
    pub tasks: Vec<TaskRow>,
}

impl ScheduleRequest {
    pub fn new(start_date: NaiveDate, tasks: Vec<TaskRow>) -> Self {
        Self { start_date, tasks }
    }

    pub fn compute(&self) -> ScheduleResult<Schedule> {
        compute_schedule(&self.tasks, self.start_date)
    }
}

/// Compute a schedule from raw task rows.
pub fn compute_schedule(rows: &[TaskRow], start_date: NaiveDate) -> ScheduleResult<Schedule> {
    normalize_rows(rows)
        .and_then(|tasks| run_pipeline(&tasks, start_date))
        .inspect_err(|err| warn!(kind = err.kind(), %err, "schedule computation failed"))
}

/// Compute a schedule from tasks that were built in code rather than parsed.
pub fn compute_schedule_for_tasks(tasks: &[Task], start_date: NaiveDate) -> ScheduleResult<Schedule> {
    validate_task_collection(tasks)
        .and_then(|()| run_pipeline(tasks, start_date))
        .inspect_err(|err| warn!(kind = err.kind(), %err, "schedule computation failed"))
}

/// Run independent requests in parallel; results keep request order.
pub fn compute_schedules(requests: &[ScheduleRequest]) -> Vec<ScheduleResult<Schedule>> {
    requests.par_iter().map(ScheduleRequest::compute).collect()
}

fn run_pipeline(tasks: &[Task], start_date: NaiveDate) -> ScheduleResult<Schedule> {
    let dag = ScheduleDag::build(tasks);
    let order = topological_order(&dag)?;

    let early = ForwardPass::new(&dag).execute(&order, start_date)?;
    let project_finish = BackwardPass::project_finish(&early).unwrap_or(start_date);
    let late = BackwardPass::new(&dag).execute(&order, project_finish)?;

    let schedule = classify(tasks, &order, &early, &late, start_date, project_finish)?;
    info!(
        tasks = schedule.len(),
        critical = schedule.critical_path().len(),
        %start_date,
        %project_finish,
        "schedule computed"
    );
    Ok(schedule)
}
