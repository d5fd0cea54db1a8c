use super::{PersistenceError, PersistenceResult};
use crate::schedule::{Schedule, ScheduleRecord};
use crate::task::{RawDuration, TaskRow};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

const ACTIVITY: &str = "Activity";
const DURATION: &str = "Duration (Days)";
const DEPENDENCIES: &str = "Dependencies";

/// Read the three-column task table. Headers are matched after trimming and
/// extra columns are ignored; short rows read as blank cells.
pub fn read_task_rows_csv<R: Read>(reader: R) -> PersistenceResult<Vec<TaskRow>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);
    let missing: Vec<String> = [ACTIVITY, DURATION, DEPENDENCIES]
        .into_iter()
        .filter(|name| position(name).is_none())
        .map(str::to_string)
        .collect();
    let (Some(activity_idx), Some(duration_idx), Some(deps_idx)) =
        (position(ACTIVITY), position(DURATION), position(DEPENDENCIES))
    else {
        return Err(PersistenceError::MissingColumns(missing));
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cell = |idx: usize| record.get(idx).unwrap_or_default();
        let duration = cell(duration_idx).trim();
        rows.push(TaskRow {
            activity: cell(activity_idx).to_string(),
            duration: (!duration.is_empty()).then(|| RawDuration::Text(duration.to_string())),
            dependencies: Some(cell(deps_idx).to_string()),
        });
    }
    debug!(rows = rows.len(), "task rows read from csv");
    Ok(rows)
}

pub fn load_task_rows_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<TaskRow>> {
    let file = File::open(path)?;
    read_task_rows_csv(file)
}

#[derive(Serialize)]
struct TaskRowCsvRecord<'a> {
    #[serde(rename = "Activity")]
    activity: &'a str,
    #[serde(rename = "Duration (Days)")]
    duration: String,
    #[serde(rename = "Dependencies")]
    dependencies: &'a str,
}

impl<'a> From<&'a TaskRow> for TaskRowCsvRecord<'a> {
    fn from(row: &'a TaskRow) -> Self {
        Self {
            activity: &row.activity,
            duration: row
                .duration
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            dependencies: row.dependencies.as_deref().unwrap_or_default(),
        }
    }
}

pub fn write_task_rows_csv<W: Write>(rows: &[TaskRow], writer: W) -> PersistenceResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        writer.write_record([ACTIVITY, DURATION, DEPENDENCIES])?;
    }
    for row in rows {
        writer.serialize(TaskRowCsvRecord::from(row))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_task_rows_to_csv<P: AsRef<Path>>(rows: &[TaskRow], path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    write_task_rows_csv(rows, file)
}

#[derive(Serialize)]
struct ScheduleCsvRecord {
    #[serde(rename = "Activity")]
    activity: String,
    #[serde(rename = "Duration (Days)")]
    duration_days: u32,
    #[serde(rename = "Dependencies")]
    dependencies: String,
    #[serde(rename = "ES")]
    early_start: String,
    #[serde(rename = "EF")]
    early_finish: String,
    #[serde(rename = "LS")]
    late_start: String,
    #[serde(rename = "LF")]
    late_finish: String,
    #[serde(rename = "Slack (Days)")]
    slack_days: i64,
    #[serde(rename = "Status")]
    status: &'static str,
}

impl From<&ScheduleRecord> for ScheduleCsvRecord {
    fn from(record: &ScheduleRecord) -> Self {
        Self {
            activity: record.activity.clone(),
            duration_days: record.duration_days,
            dependencies: record.dependencies.join(", "),
            early_start: format_date(record.early_start),
            early_finish: format_date(record.early_finish),
            late_start: format_date(record.late_start),
            late_finish: format_date(record.late_finish),
            slack_days: record.slack_days,
            status: record.status.as_str(),
        }
    }
}

/// Results table, one row per task in input order.
pub fn write_schedule_csv<W: Write>(schedule: &Schedule, writer: W) -> PersistenceResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in schedule.records() {
        writer.serialize(ScheduleCsvRecord::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_schedule_to_csv<P: AsRef<Path>>(
    schedule: &Schedule,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    write_schedule_csv(schedule, file)
}

pub fn save_schedule_to_json<P: AsRef<Path>>(
    schedule: &Schedule,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, schedule)?;
    Ok(())
}

pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Schedule> {
    let file = File::open(path)?;
    let schedule: Schedule = serde_json::from_reader(file)?;
    if schedule.is_empty() {
        return Err(PersistenceError::InvalidData(
            "JSON snapshot contained no tasks".into(),
        ));
    }
    Ok(schedule)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
