use thiserror::Error;

use crate::{FetchError, FetchSettings, WorkerHost};

/// Fixed origin-relative path of the worker script.
pub const WORKER_SCRIPT_PATH: &str = "/service-worker.js";
/// The worker controls the whole origin.
pub const WORKER_SCOPE: &str = "/";

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("worker script path must be origin-relative: {0:?}")]
    InvalidScriptPath(String),
    #[error("worker failed to start: {0}")]
    Startup(#[from] FetchError),
}

/// A successful registration: the running worker plus its advertised scope.
#[derive(Debug)]
pub struct WorkerRegistration {
    pub script_path: String,
    pub scope: String,
    host: WorkerHost,
}

impl WorkerRegistration {
    pub fn host(&self) -> &WorkerHost {
        &self.host
    }
}

/// Registers the background worker.
///
/// Failure is reported to the caller, who logs it and carries on as a plain
/// page.
pub fn register(
    script_path: &str,
    settings: FetchSettings,
) -> Result<WorkerRegistration, RegisterError> {
    if !script_path.starts_with('/') {
        return Err(RegisterError::InvalidScriptPath(script_path.to_string()));
    }
    let host = WorkerHost::new(settings)?;
    Ok(WorkerRegistration {
        script_path: script_path.to_string(),
        scope: WORKER_SCOPE.to_string(),
        host,
    })
}
