//! Generation gateway port
//!
//! Defines the interface for communicating with the text-generation API.
//! Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use glyphcast_domain::{Model, StreamEvent};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Errors that can occur during gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The generation endpoint could not be reached.
    #[error("Cannot reach generation endpoint: {0}")]
    TransportUnavailable(String),

    /// The endpoint answered, but the request failed.
    #[error("Request failed: {0}")]
    RequestFailed(String),
}

/// One streaming generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub model: Model,
    pub prompt: String,
    pub system: String,
}

/// Handle for receiving streaming events from a generation request.
///
/// Wraps an `mpsc::Receiver<StreamEvent>`. Dropping the handle releases the
/// transport; cancelling the token passed to
/// [`GenerationGateway::stream_generate`] unblocks a pending read.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Consume the stream and collect all delta text into one string.
    ///
    /// Malformed-chunk notices are skipped; a terminal error is returned as
    /// such. Useful in tests and for callers that only need the final text.
    pub async fn collect_text(mut self) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => full_text.push_str(&chunk),
                StreamEvent::Malformed(_) => {}
                StreamEvent::Done => return Ok(full_text),
                StreamEvent::Error(e) => return Err(GatewayError::RequestFailed(e)),
            }
        }
        // Channel closed without Done — return what we have
        Ok(full_text)
    }
}

/// Gateway for streaming text generation
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Fetch the model catalog.
    async fn list_models(&self) -> Result<Vec<Model>, GatewayError>;

    /// Open one streaming generation exchange.
    ///
    /// Returns once the request is accepted; events then arrive on the
    /// handle in wire order. Cancelling `cancel` aborts the transport call
    /// and ends the event stream without a further terminal event.
    async fn stream_generate(
        &self,
        request: GenerationRequest,
        cancel: CancellationToken,
    ) -> Result<StreamHandle, GatewayError>;
}
