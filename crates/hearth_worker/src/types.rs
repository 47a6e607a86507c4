use std::fmt;

use bytes::Bytes;

pub type RequestId = u64;

/// How the page intends to use the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// A page load; eligible for the synthesized offline fallback.
    Navigate,
    /// Assets, API calls, everything else.
    Subresource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerRequest {
    pub url: String,
    pub mode: RequestMode,
}

impl WorkerRequest {
    pub fn navigate(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mode: RequestMode::Navigate,
        }
    }

    pub fn subresource(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mode: RequestMode::Subresource,
        }
    }
}

/// A response handed back to the page.
///
/// HTTP error statuses are responses, not errors; only network-level
/// failures surface as [`FetchError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl WorkerResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Timeout,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
