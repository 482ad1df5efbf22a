use derive_more::{Display, Error};
use reqwest::{header::ACCEPT, StatusCode};
use tracing::debug;

use crate::events::issues::NotificationMessage;

#[derive(Debug, Display, Error)]
pub enum NotifyError {
    #[display("Slack returned {status}: {body}")]
    Rejected { status: StatusCode, body: String },
    #[display("Error calling Slack: {_0}")]
    Transport(reqwest::Error),
}

/// Delivers a message to a chat webhook.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, url: &str, message: &NotificationMessage) -> Result<(), NotifyError>;
}

/// Slack incoming webhook client. Clones share one connection pool.
#[derive(Debug, Clone, Default)]
pub struct SlackClient {
    http: reqwest::Client,
}

impl SlackClient {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait::async_trait]
impl Notifier for SlackClient {
    async fn notify(&self, url: &str, message: &NotificationMessage) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .json(message)
            .send()
            .await
            .map_err(NotifyError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(NotifyError::Transport)?;

        if !status.is_success() {
            return Err(NotifyError::Rejected { status, body });
        }

        debug!("Slack accepted the message with status {}", status);
        Ok(())
    }
}
