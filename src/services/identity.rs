//! HTTP client for session lookup and logout

use super::http::{check_status, read_json, send, HttpEndpoint};
use super::{IdentityService, ServiceError};
use crate::config::{ConfigError, EndpointConfig, HttpConfig};
use crate::types::User;
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
struct MeResponse {
    user: Option<User>,
}

/// `GET /api/me` and `POST /api/logout`
pub struct HttpIdentityService {
    endpoint: HttpEndpoint,
}

impl HttpIdentityService {
    pub fn new(endpoint: &EndpointConfig, http: &HttpConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: HttpEndpoint::new(endpoint, http)?,
        })
    }
}

#[async_trait]
impl IdentityService for HttpIdentityService {
    async fn current_user(&self) -> Result<Option<User>, ServiceError> {
        let response = send(self.endpoint.credentialed(Method::GET, &["api", "me"])).await?;
        match check_status(response).await {
            Ok(response) => Ok(read_json::<MeResponse>(response).await?.user),
            Err(ServiceError::Unauthorized) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn logout(&self) -> Result<(), ServiceError> {
        let response = send(self.endpoint.credentialed(Method::POST, &["api", "logout"])).await?;
        check_status(response).await?;
        info!("Logged out");
        Ok(())
    }
}
