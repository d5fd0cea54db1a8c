pub mod calculations;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod logging;
pub mod persistence;
pub mod schedule;
pub mod task;
pub mod task_validation;

#[cfg(feature = "http_api")]
pub mod http_api;

pub use config::{ConfigError, ServiceConfig};
pub use engine::{ScheduleRequest, compute_schedule, compute_schedule_for_tasks, compute_schedules};
pub use error::{ScheduleError, ScheduleResult};
pub use persistence::{PersistenceError, PersistenceResult};
pub use schedule::{Schedule, ScheduleEdge, ScheduleRecord, ScheduleSummary, TaskStatus};
pub use task::{RawDuration, Task, TaskRow};
