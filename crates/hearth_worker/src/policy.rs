use hearth_logging::hearth_warn;

use crate::{Fetcher, FetchError, RequestMode, WorkerRequest, WorkerResponse};

/// Body of the synthesized response served when a page load fails offline.
pub const OFFLINE_BODY: &str = "You are offline. Please check your connection.";

/// The synthesized plain-text fallback for failed navigations.
pub fn offline_response() -> WorkerResponse {
    WorkerResponse {
        status: 200,
        content_type: Some("text/plain".to_string()),
        body: bytes::Bytes::from_static(OFFLINE_BODY.as_bytes()),
    }
}

/// Answers a fetch event under the strict network-only policy.
///
/// Navigation requests always produce a response: the network's answer
/// (whatever its status), or the synthesized offline page when the network
/// itself fails. Previously fetched content is never served. Everything else
/// goes to the network and propagates its failure untouched.
pub async fn respond(
    fetcher: &dyn Fetcher,
    request: &WorkerRequest,
) -> Result<WorkerResponse, FetchError> {
    match request.mode {
        RequestMode::Navigate => match fetcher.fetch(request).await {
            Ok(response) => Ok(response),
            Err(err) => {
                hearth_warn!("navigation to {} failed offline: {}", request.url, err);
                Ok(offline_response())
            }
        },
        RequestMode::Subresource => fetcher.fetch(request).await,
    }
}
