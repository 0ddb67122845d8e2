//! HTTP client for the operator dashboard backend

use super::http::{check_status, read_json, send, HttpEndpoint};
use super::{DashboardPayload, DashboardService, ServiceError};
use crate::config::{ConfigError, EndpointConfig, HttpConfig};
use crate::types::PageId;
use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, info};

/// `GET /api/admin/dashboard` and `DELETE /api/admin/feedback/{pageId}`
pub struct HttpDashboardService {
    endpoint: HttpEndpoint,
}

impl HttpDashboardService {
    pub fn new(endpoint: &EndpointConfig, http: &HttpConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: HttpEndpoint::new(endpoint, http)?,
        })
    }
}

#[async_trait]
impl DashboardService for HttpDashboardService {
    async fn fetch_dashboard(&self) -> Result<DashboardPayload, ServiceError> {
        let response = send(
            self.endpoint
                .credentialed(Method::GET, &["api", "admin", "dashboard"]),
        )
        .await?;
        let payload: DashboardPayload = read_json(check_status(response).await?).await?;

        debug!(
            "Dashboard fetched: {} feedback records for {}",
            payload.feedbacks.len(),
            payload.admin.name
        );
        Ok(payload)
    }

    async fn delete_feedback(&self, page_id: &PageId) -> Result<(), ServiceError> {
        let response = send(self.endpoint.credentialed(
            Method::DELETE,
            &["api", "admin", "feedback", page_id.as_str()],
        ))
        .await?;
        check_status(response).await?;

        info!("Deleted feedback for page {}", page_id);
        Ok(())
    }
}
