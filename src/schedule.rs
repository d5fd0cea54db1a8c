use chrono::{Datelike, NaiveDate};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Days between 0001-01-01 and the Unix epoch, for polars' Date encoding.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "Critical")]
    Critical,
    #[serde(rename = "Non-Critical")]
    NonCritical,
}

impl TaskStatus {
    pub fn from_slack(slack_days: i64) -> Self {
        if slack_days == 0 {
            TaskStatus::Critical
        } else {
            TaskStatus::NonCritical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Critical => "Critical",
            TaskStatus::NonCritical => "Non-Critical",
        }
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, TaskStatus::Critical)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived schedule values for one task. Serialized keys follow the results
/// table headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    #[serde(rename = "Activity")]
    pub activity: String,
    #[serde(rename = "Duration (Days)")]
    pub duration_days: u32,
    #[serde(rename = "Dependencies")]
    pub dependencies: Vec<String>,
    #[serde(rename = "ES")]
    pub early_start: NaiveDate,
    #[serde(rename = "EF")]
    pub early_finish: NaiveDate,
    #[serde(rename = "LS")]
    pub late_start: NaiveDate,
    #[serde(rename = "LF")]
    pub late_finish: NaiveDate,
    #[serde(rename = "Slack (Days)")]
    pub slack_days: i64,
    #[serde(rename = "Status")]
    pub status: TaskStatus,
}

impl ScheduleRecord {
    pub fn is_critical(&self) -> bool {
        self.status.is_critical()
    }
}

/// A dependency edge as a network diagram would draw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEdge {
    pub from: String,
    pub to: String,
    /// Both endpoints are on the critical path.
    pub critical: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub task_count: usize,
    pub critical_count: usize,
    pub project_start: NaiveDate,
    pub project_finish: NaiveDate,
    pub duration_days: i64,
    pub critical_path: Vec<String>,
}

impl ScheduleSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.task_count));
        parts.push(format!("critical={}", self.critical_count));
        parts.push(format!("start={}", self.project_start));
        parts.push(format!("finish={}", self.project_finish));
        parts.push(format!("days={}", self.duration_days));
        if !self.critical_path.is_empty() {
            parts.push(format!("crit_path={}", self.critical_path.join("->")));
        }
        parts.join(", ")
    }
}

/// Terminal output of a successful run: one record per task in input order
/// plus the critical path in topological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    project_start: NaiveDate,
    project_finish: NaiveDate,
    records: Vec<ScheduleRecord>,
    critical_path: Vec<String>,
}

impl Schedule {
    pub(crate) fn from_parts(
        project_start: NaiveDate,
        project_finish: NaiveDate,
        records: Vec<ScheduleRecord>,
        critical_path: Vec<String>,
    ) -> Self {
        Self {
            project_start,
            project_finish,
            records,
            critical_path,
        }
    }

    pub fn project_start(&self) -> NaiveDate {
        self.project_start
    }

    pub fn project_finish(&self) -> NaiveDate {
        self.project_finish
    }

    /// Calendar days from project start through project finish, inclusive.
    pub fn duration_days(&self) -> i64 {
        (self.project_finish - self.project_start).num_days() + 1
    }

    pub fn records(&self) -> &[ScheduleRecord] {
        &self.records
    }

    pub fn record(&self, activity: &str) -> Option<&ScheduleRecord> {
        self.records.iter().find(|record| record.activity == activity)
    }

    pub fn critical_path(&self) -> &[String] {
        &self.critical_path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every dependency -> dependent edge, in record order.
    pub fn edges(&self) -> Vec<ScheduleEdge> {
        let status: HashMap<&str, bool> = self
            .records
            .iter()
            .map(|record| (record.activity.as_str(), record.is_critical()))
            .collect();

        self.records
            .iter()
            .flat_map(|record| {
                let status = &status;
                record.dependencies.iter().map(move |dep| ScheduleEdge {
                    from: dep.clone(),
                    to: record.activity.clone(),
                    critical: record.is_critical()
                        && status.get(dep.as_str()).copied().unwrap_or(false),
                })
            })
            .collect()
    }

    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            task_count: self.records.len(),
            critical_count: self.records.iter().filter(|r| r.is_critical()).count(),
            project_start: self.project_start,
            project_finish: self.project_finish,
            duration_days: self.duration_days(),
            critical_path: self.critical_path.clone(),
        }
    }

    /// Tabular view with the output contract's column names; date columns
    /// use polars' `Date` type.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let activities: Vec<&str> = self.records.iter().map(|r| r.activity.as_str()).collect();
        let durations: Vec<i64> = self
            .records
            .iter()
            .map(|r| i64::from(r.duration_days))
            .collect();
        let dependencies: Vec<String> = self
            .records
            .iter()
            .map(|r| r.dependencies.join(", "))
            .collect();
        let slack: Vec<i64> = self.records.iter().map(|r| r.slack_days).collect();
        let status: Vec<&str> = self.records.iter().map(|r| r.status.as_str()).collect();

        let columns: Vec<Column> = vec![
            Series::new(PlSmallStr::from_static("Activity"), activities).into_column(),
            Series::new(PlSmallStr::from_static("Duration (Days)"), durations).into_column(),
            Series::new(PlSmallStr::from_static("Dependencies"), dependencies).into_column(),
            self.date_series("ES", |r| r.early_start)?.into_column(),
            self.date_series("EF", |r| r.early_finish)?.into_column(),
            self.date_series("LS", |r| r.late_start)?.into_column(),
            self.date_series("LF", |r| r.late_finish)?.into_column(),
            Series::new(PlSmallStr::from_static("Slack (Days)"), slack).into_column(),
            Series::new(PlSmallStr::from_static("Status"), status).into_column(),
        ];

        DataFrame::new(columns)
    }

    fn date_series<F>(&self, name: &str, pick: F) -> PolarsResult<Series>
    where
        F: Fn(&ScheduleRecord) -> NaiveDate,
    {
        let days: Vec<i32> = self
            .records
            .iter()
            .map(|r| date_to_i32(pick(r)))
            .collect();
        Series::new(name.into(), days).cast(&DataType::Date)
    }
}

/// Convert NaiveDate to polars' day count since the Unix epoch.
pub fn date_to_i32(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub fn date_from_i32(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}
