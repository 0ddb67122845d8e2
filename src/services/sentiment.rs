//! HTTP client for the sentiment classifier

use super::http::{check_status, read_json, send, HttpEndpoint};
use super::{SentimentService, ServiceError};
use crate::config::{ConfigError, EndpointConfig, HttpConfig};
use crate::types::AnalysisResult;
use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
struct SentimentRequest<'a> {
    text: &'a str,
}

/// `POST /api/analyze-sentiment`
///
/// The classifier is not session-scoped, so no cookie is sent.
pub struct HttpSentimentService {
    endpoint: HttpEndpoint,
}

impl HttpSentimentService {
    pub fn new(endpoint: &EndpointConfig, http: &HttpConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: HttpEndpoint::new(endpoint, http)?,
        })
    }
}

#[async_trait]
impl SentimentService for HttpSentimentService {
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, ServiceError> {
        debug!("Requesting sentiment for {} chars", text.chars().count());

        let response = send(
            self.endpoint
                .request(Method::POST, &["api", "analyze-sentiment"])
                .json(&SentimentRequest { text }),
        )
        .await?;
        let result: AnalysisResult = read_json(check_status(response).await?).await?;

        if !result.score.is_finite() {
            return Err(ServiceError::Decode(format!(
                "score is not a finite number: {}",
                result.score
            )));
        }
        Ok(result)
    }
}
