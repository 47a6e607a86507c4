//! Hearth app: platform layer (event bus, install glue, timers, storage)
//! and the host run loop.
pub mod platform;
