//! Hearth worker: background-worker runtime and network IO.
mod api;
mod cache;
mod fetch;
mod lifecycle;
mod policy;
mod registration;
mod types;
mod worker;

pub use api::{ApiError, AuthClient, CurrentUser, TokenPair};
pub use cache::{CacheRegistry, CacheStore, OFFLINE_CACHE_NAME};
pub use fetch::{FetchSettings, Fetcher, NetworkFetcher};
pub use lifecycle::{WorkerLifecycle, WorkerPhase};
pub use policy::{respond, offline_response, OFFLINE_BODY};
pub use registration::{register, RegisterError, WorkerRegistration, WORKER_SCOPE, WORKER_SCRIPT_PATH};
pub use types::{
    FailureKind, FetchError, RequestId, RequestMode, WorkerRequest, WorkerResponse,
};
pub use worker::{WorkerEvent, WorkerHost};
