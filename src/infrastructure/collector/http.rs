//! HTTP collector notifier adapter

use async_trait::async_trait;
use tracing::info;

use crate::application::ports::{CollectorError, CollectorNotifier};

/// Notifier that pings the collector's completion endpoint over HTTP
pub struct HttpCollectorNotifier {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCollectorNotifier {
    /// Create a notifier for the given collector base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build the completion endpoint URL
    fn endpoint(&self, vibration_detected: bool) -> String {
        format!(
            "{}/recording_complete?vibration={}",
            self.base_url.trim_end_matches('/'),
            vibration_detected
        )
    }
}

#[async_trait]
impl CollectorNotifier for HttpCollectorNotifier {
    async fn recording_complete(&self, vibration_detected: bool) -> Result<(), CollectorError> {
        let url = self.endpoint(vibration_detected);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CollectorError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollectorError::BadStatus(status.as_u16()));
        }

        info!(status = status.as_u16(), "collector notified");
        Ok(())
    }
}
