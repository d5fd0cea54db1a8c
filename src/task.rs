use serde::{Deserialize, Serialize};
use std::fmt;

/// Duration cell as it arrives from a table, CSV file, or JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDuration {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for RawDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawDuration::Integer(v) => write!(f, "{v}"),
            RawDuration::Float(v) => write!(f, "{v}"),
            RawDuration::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RawDuration {
    fn from(value: i64) -> Self {
        RawDuration::Integer(value)
    }
}

impl From<f64> for RawDuration {
    fn from(value: f64) -> Self {
        RawDuration::Float(value)
    }
}

impl From<&str> for RawDuration {
    fn from(value: &str) -> Self {
        RawDuration::Text(value.to_string())
    }
}

impl From<String> for RawDuration {
    fn from(value: String) -> Self {
        RawDuration::Text(value)
    }
}

/// One untyped input row: `Activity`, `Duration (Days)`, `Dependencies`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRow {
    #[serde(alias = "Activity")]
    pub activity: String,
    #[serde(default, alias = "Duration (Days)")]
    pub duration: Option<RawDuration>,
    #[serde(default, alias = "Dependencies")]
    pub dependencies: Option<String>,
}

impl TaskRow {
    pub fn new(
        activity: impl Into<String>,
        duration: impl Into<RawDuration>,
        dependencies: impl Into<String>,
    ) -> Self {
        Self {
            activity: activity.into(),
            duration: Some(duration.into()),
            dependencies: Some(dependencies.into()),
        }
    }

    /// The seed project shown when a new session starts.
    pub fn sample_rows() -> Vec<TaskRow> {
        [
            ("A", 5, ""),
            ("B", 7, "A"),
            ("C", 6, "A"),
            ("D", 4, "B"),
            ("E", 6, "C"),
            ("F", 5, "D, E"),
            ("G", 4, "F"),
        ]
        .into_iter()
        .map(|(activity, duration, deps)| TaskRow::new(activity, duration as i64, deps))
        .collect()
    }
}

/// A normalized task: trimmed id, non-negative duration, and a dependency set
/// kept in first-occurrence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub duration_days: u32,
    pub dependencies: Vec<String>,
}

impl Task {
    pub fn new(id: impl Into<String>, duration_days: u32) -> Self {
        Self {
            id: id.into(),
            duration_days,
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for dep in dependencies {
            let dep = dep.into();
            if !self.dependencies.contains(&dep) {
                self.dependencies.push(dep);
            }
        }
        self
    }

    /// Zero-length tasks finish on the day they start.
    pub fn is_milestone(&self) -> bool {
        self.duration_days == 0
    }
}
