use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Credential is not a valid header value")]
    InvalidCredential,
}

impl BackendError {
    /// Whether the backend answered with a non-success status, as opposed to
    /// the request never completing or the body failing to parse.
    pub fn is_status(&self) -> bool {
        matches!(self, BackendError::Status { .. })
    }
}

/// Thin JSON client for the telemedicine backend.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_base_url(&config.api_base_url)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get_headers(&self, auth_token: &str) -> Result<HeaderMap, BackendError> {
        let mut headers = HeaderMap::new();

        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let bearer = HeaderValue::from_str(&format!("Bearer {}", auth_token))
            .map_err(|_| BackendError::InvalidCredential)?;
        headers.insert(AUTHORIZATION, bearer);

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, auth_token: &str) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let headers = self.get_headers(auth_token)?;

        let response = self.client.request(method, &url).headers(headers).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("API error ({}) from {}: {}", status, path, body);
            return Err(BackendError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        let data = serde_json::from_slice::<T>(&bytes)?;
        Ok(data)
    }

    pub async fn get_json<T>(&self, path: &str, auth_token: &str) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        self.request(Method::GET, path, auth_token).await
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}
