// Best-effort forwarding of each snapshot to a remote collector.

use std::time::Duration;

use reqwest::StatusCode;

use crate::models::Snapshot;
use crate::version;

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("push request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("push rejected with status {0}")]
    Rejected(StatusCode),
}

/// POSTs snapshots as JSON. Every request is bounded by the client timeout; there are no retries.
#[derive(Clone)]
pub struct Pusher {
    client: reqwest::Client,
}

impl Pusher {
    pub fn new(timeout: Duration) -> Result<Self, PushError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(version::user_agent())
            .build()?;
        Ok(Self { client })
    }

    pub async fn push(&self, url: &str, snapshot: &Snapshot) -> Result<(), PushError> {
        let resp = self.client.post(url).json(snapshot).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PushError::Rejected(status));
        }
        tracing::debug!(operation = "push", %status, "snapshot pushed");
        Ok(())
    }
}
