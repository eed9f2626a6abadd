//! HTTP push client

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use lumen_common::PushConfig;
use lumen_core::error::DomainError;
use lumen_core::notification::PushPayload;
use lumen_core::traits::PushGateway;

use crate::wire::{WireRequest, WireResponse};

/// Push gateway backed by the push service's HTTP topic API
#[derive(Clone)]
pub struct HttpPushGateway {
    endpoint: String,
    service_key: String,
    http: reqwest::Client,
}

impl HttpPushGateway {
    /// Create a gateway from configuration
    pub fn from_config(config: &PushConfig) -> Result<Self, DomainError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::Internal(format!("push client init failed: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            service_key: config.service_key.clone(),
            http,
        })
    }
}

#[async_trait]
impl PushGateway for HttpPushGateway {
    #[instrument(skip(self, payload))]
    async fn send(&self, payload: &PushPayload, topic: &str) -> Result<(), DomainError> {
        let request = WireRequest::build(payload, topic)
            .map_err(|e| DomainError::DispatchFailed(format!("payload encoding failed: {e}")))?;

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.service_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::DispatchFailed(format!("push request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::DispatchFailed(format!(
                "push service returned {status}: {body}"
            )));
        }

        let accepted: WireResponse = response
            .json()
            .await
            .map_err(|e| DomainError::DispatchFailed(format!("malformed push response: {e}")))?;
        debug!(topic, name = ?accepted.name, "push dispatched");

        Ok(())
    }
}
