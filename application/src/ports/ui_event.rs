//! UI events marshaled from worker tasks to the coordinating context
//!
//! Network and timer work runs on background tasks; every result crosses
//! this channel and is applied by the single consumer (the REPL), which
//! gives the ordering guarantee for delta application without locks.

use glyphcast_domain::{Model, Rgb};

/// Events emitted by background workers for the coordinator to apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    // === Chat stream ===
    /// An incremental text fragment, in arrival order.
    ChatDelta(String),
    /// The stream finished; append a record terminator.
    ChatDone,
    /// The stream was cancelled on request.
    ChatCancelled,
    /// The stream failed. Terminal for the session.
    ChatError { message: String },
    /// One chunk failed to decode and was skipped. Soft notice.
    ChunkSkipped { reason: String },

    // === Model catalog ===
    /// Catalog fetched.
    ModelsLoaded(Vec<Model>),
    /// Catalog fetch failed. Informational, never fatal.
    ModelsError { message: String },

    // === Animation ===
    /// The displayed shadow color for the current tick.
    ShadowTick(Rgb),

    // === General ===
    /// A soft status line.
    Status(String),
}
