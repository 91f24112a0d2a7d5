//! Application layer for glyphcast
//!
//! This crate defines the ports (traits) the outer layers implement and the
//! use cases that orchestrate the domain: the single-flight chat session
//! manager, the artwork animator, art generation, and the model catalog
//! refresh. All shared display state is mutated by whoever drains the
//! [`UiEvent`] channel, never by the workers that produce the events.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    frame_exporter::{ExportError, FrameExporter},
    generation_gateway::{GatewayError, GenerationGateway, GenerationRequest, StreamHandle},
    text_renderer::TextRenderer,
    ui_event::UiEvent,
};
pub use use_cases::{
    animate::ArtworkAnimator,
    chat::{ChatTemplates, SendError, SessionManager},
    generate_art::GenerateArt,
    models::refresh_models,
};
