//! Registration confirmations
//!
//! Sending a confirmation is best effort: the registration handler hands
//! the work to [`dispatch_confirmation`] and returns without waiting.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::task::JoinHandle;
use url::Url;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Tell `username` at `email` that their account was created
    async fn send_confirmation(&self, email: &str, username: &str) -> Result<(), NotifyError>;
}

/// Records confirmations in the log only
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_confirmation(&self, email: &str, username: &str) -> Result<(), NotifyError> {
        tracing::info!(%email, %username, "registration confirmation (log only)");
        Ok(())
    }
}

/// Posts confirmations as JSON to a configured endpoint
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: Url,
}

#[derive(Debug, Serialize)]
struct ConfirmationPayload<'a> {
    event: &'static str,
    email: &'a str,
    username: &'a str,
}

impl WebhookNotifier {
    pub fn new(url: Url) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send_confirmation(&self, email: &str, username: &str) -> Result<(), NotifyError> {
        let payload = ConfirmationPayload {
            event: "registration",
            email,
            username,
        };
        let response = self.client.post(self.url.clone()).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(status));
        }
        Ok(())
    }
}

/// Build the notifier for an optional webhook endpoint
pub fn from_config(webhook: Option<&Url>) -> Result<Arc<dyn Notifier>, NotifyError> {
    match webhook {
        Some(url) => Ok(Arc::new(WebhookNotifier::new(url.clone())?)),
        None => Ok(Arc::new(LogNotifier)),
    }
}

/// Send a confirmation in the background. Failures are logged and
///  never reach the caller.
pub fn dispatch_confirmation(
    notifier: Arc<dyn Notifier>,
    email: String,
    username: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match notifier.send_confirmation(&email, &username).await {
            Ok(()) => tracing::debug!(%username, "confirmation sent"),
            Err(e) => tracing::warn!(%username, error = %e, "failed to send confirmation"),
        }
    })
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("endpoint rejected confirmation: {0}")]
    Rejected(reqwest::StatusCode),
}
