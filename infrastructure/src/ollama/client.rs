//! HTTP gateway to an Ollama-compatible generation API
//!
//! `POST {base}/api/generate` streams newline-delimited JSON; a background
//! reader task owns the response body, feeds the codec, and forwards
//! [`StreamEvent`]s through the handle's channel. The reader selects on the
//! caller's cancellation token at every read, so cancelling unblocks a
//! pending read without waiting for the next chunk to arrive.

use crate::ollama::codec::{ChunkParser, ParsedChunk};
use crate::ollama::error::OllamaError;
use async_trait::async_trait;
use futures::StreamExt;
use glyphcast_application::ports::generation_gateway::{
    GatewayError, GenerationGateway, GenerationRequest, StreamHandle,
};
use glyphcast_domain::{Model, StreamEvent};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Request body for `/api/generate`.
#[derive(Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

/// Response body for `/api/tags`.
#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TaggedModel>,
}

#[derive(Deserialize)]
struct TaggedModel {
    name: String,
}

pub struct OllamaGateway {
    http: reqwest::Client,
    base_url: String,
}

impl OllamaGateway {
    /// Build a gateway for `base_url` (e.g. `http://localhost:11434`).
    ///
    /// Only the connect phase is bounded by `connect_timeout`; a streaming
    /// body may legitimately stay open for minutes.
    pub fn new(
        base_url: impl Into<String>,
        connect_timeout: Duration,
    ) -> Result<Self, OllamaError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(OllamaError::ClientBuild)?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }
}

#[async_trait]
impl GenerationGateway for OllamaGateway {
    async fn list_models(&self) -> Result<Vec<Model>, GatewayError> {
        let url = self.endpoint("tags");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| GatewayError::TransportUnavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        debug!(count = tags.models.len(), "model catalog fetched");
        Ok(tags.models.into_iter().map(|m| Model::new(m.name)).collect())
    }

    async fn stream_generate(
        &self,
        request: GenerationRequest,
        cancel: CancellationToken,
    ) -> Result<StreamHandle, GatewayError> {
        let url = self.endpoint("generate");
        let body = GenerateBody {
            model: request.model.as_str(),
            prompt: &request.prompt,
            system: &request.system,
            stream: true,
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::TransportUnavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        debug!(model = %request.model, "generation stream opened");

        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(read_stream(response, tx, cancel));
        Ok(StreamHandle::new(rx))
    }
}

/// Drain the response body into stream events until the terminal marker,
/// a clean close, a transport error, or cancellation.
async fn read_stream(
    response: reqwest::Response,
    tx: mpsc::Sender<StreamEvent>,
    cancel: CancellationToken,
) {
    let mut parser = ChunkParser::new();
    let mut body = response.bytes_stream();

    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("generation stream cancelled");
                return;
            }
            chunk = body.next() => chunk,
        };

        match chunk {
            Some(Ok(bytes)) => {
                for parsed in parser.feed(&bytes) {
                    let terminal = matches!(parsed, ParsedChunk::Done { .. });
                    for event in into_events(parsed) {
                        if tx.send(event).await.is_err() {
                            return;
                        }
                    }
                    if terminal {
                        return;
                    }
                }
            }
            Some(Err(e)) => {
                warn!(error = %e, "generation stream failed mid-read");
                let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                return;
            }
            // Clean close without a terminal marker still completes the
            // stream.
            None => {
                let _ = tx.send(StreamEvent::Done).await;
                return;
            }
        }
    }
}

fn into_events(chunk: ParsedChunk) -> Vec<StreamEvent> {
    match chunk {
        ParsedChunk::Delta(text) => vec![StreamEvent::Delta(text)],
        ParsedChunk::Done { trailing } => {
            let mut events = Vec::with_capacity(2);
            if let Some(text) = trailing {
                events.push(StreamEvent::Delta(text));
            }
            events.push(StreamEvent::Done);
            events
        }
        ParsedChunk::Malformed { reason } => vec![StreamEvent::Malformed(reason)],
    }
}
