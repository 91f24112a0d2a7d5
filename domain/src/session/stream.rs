//! Streaming events for generation-session communication
//!
//! [`StreamEvent`] bridges transport-level streaming (newline-delimited
//! JSON chunks from the generation API) to the application layer, enabling
//! incremental display of model output.

/// An event in a streaming generation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text fragment from the model.
    Delta(String),
    /// The stream finished normally (terminal marker or clean close).
    Done,
    /// One line failed to decode. Non-fatal: the stream continues.
    Malformed(String),
    /// The stream failed. Terminal.
    Error(String),
}

impl StreamEvent {
    /// Returns the text content if this is a delta.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::Delta(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Done | StreamEvent::Error(_))
    }
}
