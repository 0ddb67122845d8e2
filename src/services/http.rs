//! Shared reqwest plumbing for the HTTP collaborators

use super::ServiceError;
use crate::config::{ConfigError, EndpointConfig, HttpConfig};
use reqwest::header::COOKIE;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

/// Error body shape used by the backends
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

/// One collaborator's base URL plus a configured client
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    client: Client,
    base_url: Url,
    session_cookie: Option<String>,
}

impl HttpEndpoint {
    pub fn new(endpoint: &EndpointConfig, http: &HttpConfig) -> Result<Self, ConfigError> {
        let base_url = endpoint.url()?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::ValidationError(format!(
                "base_url '{}' cannot carry a path",
                endpoint.base_url
            )));
        }

        let client = Client::builder()
            .timeout(http.timeout())
            .build()
            .map_err(|e| ConfigError::ValidationError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            session_cookie: http.session_cookie.clone(),
        })
    }

    /// Base URL extended with percent-encoded path segments
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Request without credentials
    pub fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        debug!("{} {}", method, url);
        self.client.request(method, url)
    }

    /// Request carrying the operator's session cookie, if one is configured
    pub fn credentialed(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let builder = self.request(method, segments);
        match &self.session_cookie {
            Some(cookie) => builder.header(COOKIE, cookie.as_str()),
            None => builder,
        }
    }
}

/// Send a request, mapping transport failures
pub async fn send(builder: RequestBuilder) -> Result<Response, ServiceError> {
    builder.send().await.map_err(|e| {
        if e.is_timeout() {
            ServiceError::Network(format!("request timed out: {}", e))
        } else {
            ServiceError::Network(e.to_string())
        }
    })
}

/// Classify the status code, consuming the body of failed responses
pub async fn check_status(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ServiceError::Unauthorized),
        _ => {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| {
                    if text.is_empty() {
                        status
                            .canonical_reason()
                            .unwrap_or("Unknown error")
                            .to_string()
                    } else {
                        text
                    }
                });

            Err(ServiceError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Decode a successful JSON body
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ServiceError::Network(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| ServiceError::Decode(e.to_string()))
}
