pub mod app;
pub mod bus;
pub mod effects;
pub mod install;
pub mod logging;
pub mod prompt;
pub mod storage;
pub mod surfaces;

pub use app::run_app;

use std::sync::Arc;

/// Source of wall-clock milliseconds; injectable so tests stay deterministic.
pub type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

pub fn wall_clock() -> Clock {
    Arc::new(|| chrono::Utc::now().timestamp_millis().max(0) as u64)
}
