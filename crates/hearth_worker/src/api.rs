use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    #[error("http status {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Access/refresh pair returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurrentUser {
    pub user_type: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RefreshedAccess {
    access: String,
}

/// Thin client for the remote authentication API.
///
/// Requests are sent with no-cache headers; responses are never stored.
#[derive(Debug, Clone)]
pub struct AuthClient {
    base_url: String,
    client: reqwest::Client,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|err| ApiError::InvalidBaseUrl(err.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self { base_url, client })
    }

    /// `login(email, password) -> {access, refresh}`.
    ///
    /// The backend keys accounts by username; the client submits the email
    /// in that field.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, ApiError> {
        let body = serde_json::json!({ "username": email, "password": password });
        self.post_json("/token/", &body).await
    }

    /// Exchanges a refresh token for a fresh access token.
    pub async fn refresh_access(&self, refresh: &str) -> Result<String, ApiError> {
        let body = serde_json::json!({ "refresh": refresh });
        let refreshed: RefreshedAccess = self.post_json("/token/refresh/", &body).await?;
        Ok(refreshed.access)
    }

    /// Fetches the authenticated user's profile.
    pub async fn current_user(&self, access: &str) -> Result<CurrentUser, ApiError> {
        let response = self
            .client
            .get(format!("{}/users/me/", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {access}"))
            .send()
            .await
            .map_err(map_send_error)?;
        decode(response).await
    }

    /// Kicks off the email-based password reset flow.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({ "email": email });
        let response = self
            .client
            .post(format!("{}/password-reset/request/", self.base_url))
            .body(serde_json::to_vec(&body).map_err(|err| ApiError::Decode(err.to_string()))?)
            .send()
            .await
            .map_err(map_send_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(())
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .body(serde_json::to_vec(body).map_err(|err| ApiError::Decode(err.to_string()))?)
            .send()
            .await
            .map_err(map_send_error)?;
        decode(response).await
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status(status.as_u16()));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
}

fn map_send_error(err: reqwest::Error) -> ApiError {
    ApiError::Network(err.to_string())
}
