//! Session backend client.
//!
//! The backend is the system of record for sessions and orders; the engine
//! only creates sessions, cancels them, and submits signed order batches.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::types::{
    BatchCreateOrdersRequest, CancelSessionRequest, CreateSessionRequest, GridSession, OrderIntent,
};

/// Session lifecycle and order submission, as consumed by the engine.
#[async_trait]
pub trait SessionSync: Send + Sync {
    /// Register a session; the backend assigns the id and echoes the record.
    async fn create_session(&self, req: &CreateSessionRequest) -> Result<GridSession>;

    /// Cancel a session.
    async fn cancel_session(&self, session_id: &str, trader: &str) -> Result<()>;

    /// Submit a batch of signed order intents for a session.
    async fn batch_create_orders(&self, session_id: &str, orders: &[OrderIntent]) -> Result<()>;
}

/// HTTP client for the session backend.
#[derive(Clone)]
pub struct HttpSessionSync {
    client: Client,
    base_url: String,
}

impl HttpSessionSync {
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Self {
        let client = Client::builder()
            .user_agent("gridtap/0.1")
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SessionSync for HttpSessionSync {
    async fn create_session(&self, req: &CreateSessionRequest) -> Result<GridSession> {
        let url = format!("{}/sessions", self.base_url);
        let response = self.client.post(&url).json(req).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "session creation rejected");
            return Err(EngineError::SessionCreationRejected(format!(
                "{status}: {body}"
            )));
        }

        let session: GridSession = response.json().await?;
        debug!(session_id = %session.id, "session created");
        Ok(session)
    }

    async fn cancel_session(&self, session_id: &str, trader: &str) -> Result<()> {
        let url = format!("{}/sessions/{}/cancel", self.base_url, session_id);
        let req = CancelSessionRequest {
            session_id: session_id.to_string(),
            trader: trader.to_string(),
        };
        let response = self.client.post(&url).json(&req).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::SubmissionFailed(format!(
                "cancel {session_id}: {status}: {body}"
            )));
        }
        debug!(%session_id, "session cancelled");
        Ok(())
    }

    async fn batch_create_orders(&self, session_id: &str, orders: &[OrderIntent]) -> Result<()> {
        let url = format!("{}/sessions/{}/orders/batch", self.base_url, session_id);
        let req = BatchCreateOrdersRequest {
            session_id: session_id.to_string(),
            orders: orders.to_vec(),
        };
        let response = self.client.post(&url).json(&req).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::SubmissionFailed(format!("{status}: {body}")));
        }
        debug!(%session_id, count = orders.len(), "order batch accepted");
        Ok(())
    }
}
