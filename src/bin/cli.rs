use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use cpm_schedule::persistence::{load_task_rows_from_csv, write_schedule_csv, write_task_rows_csv};
use cpm_schedule::schedule::date_from_i32;
use cpm_schedule::{Schedule, ScheduleError, TaskRow, compute_schedule, logging};
use polars::prelude::{AnyValue, DataFrame};

/// Critical path analysis for task tables.
#[derive(Debug, Parser)]
#[command(name = "cpm-schedule", version, long_about = None)]
struct Cli {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CPM_SCHEDULE_LOG` or `info` is used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute the schedule for a CSV task table.
    Analyze {
        /// CSV with `Activity`, `Duration (Days)` and `Dependencies` columns.
        #[arg(value_name = "CSV")]
        input: PathBuf,

        /// Project start date (YYYY-MM-DD). Defaults to today.
        #[arg(long, value_name = "DATE")]
        start: Option<NaiveDate>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write to this file instead of stdout.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Write the sample project as a CSV template.
    Template {
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = logging::init_logging(cli.log_level.map(Into::into)) {
        eprintln!("warning: {err}");
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ScheduleError>() {
                Some(schedule_err) => eprintln!("error[{}]: {schedule_err}", schedule_err.kind()),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Analyze {
            input,
            start,
            format,
            output,
        } => {
            let rows = load_task_rows_from_csv(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let start = start.unwrap_or_else(|| chrono::Local::now().date_naive());
            let schedule = compute_schedule(&rows, start)?;
            let mut out = open_output(output.as_deref())?;
            render(&schedule, format, &mut out)?;
            out.flush()?;
            Ok(())
        }
        Command::Template { output } => {
            let out = open_output(output.as_deref())?;
            write_task_rows_csv(&TaskRow::sample_rows(), out)?;
            Ok(())
        }
    }
}

fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn render(schedule: &Schedule, format: OutputFormat, out: &mut dyn Write) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            let df = schedule.to_dataframe()?;
            out.write_all(render_df_as_text_table(&df).as_bytes())?;
            writeln!(out, "{}", schedule.summary().to_cli_summary())?;
        }
        OutputFormat::Csv => write_schedule_csv(schedule, out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, schedule)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn cell_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::Date(days) => date_from_i32(*days)
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        other => other.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let cells: Vec<Vec<String>> = (0..df.height())
        .map(|row_idx| {
            columns
                .iter()
                .map(|col| {
                    col.get(row_idx)
                        .map(|av| cell_text(&av))
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_row(&mut out, &col_names, &widths);
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        push_row(&mut out, row, &widths);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.iter().zip(widths) {
        out.push(' ');
        out.push_str(cell);
        out.push_str(&" ".repeat(width.saturating_sub(cell.len())));
        out.push_str(" |");
    }
    out.push('\n');
}
