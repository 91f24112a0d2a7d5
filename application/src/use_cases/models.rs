//! Background model-catalog refresh

use crate::ports::generation_gateway::GenerationGateway;
use crate::ports::ui_event::UiEvent;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

/// Fetch the model catalog off the coordinating context.
///
/// The result arrives as a [`UiEvent`]; a fetch failure is informational
/// text, never fatal — the rest of the application stays usable.
pub fn refresh_models<G: GenerationGateway + 'static>(
    gateway: Arc<G>,
    events: mpsc::UnboundedSender<UiEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match gateway.list_models().await {
            Ok(models) => {
                let _ = events.send(UiEvent::ModelsLoaded(models));
            }
            Err(e) => {
                warn!(error = %e, "model catalog fetch failed");
                let _ = events.send(UiEvent::ModelsError {
                    message: format!("{e}. Is the generation server running?"),
                });
            }
        }
    })
}
