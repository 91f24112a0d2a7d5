//! Domain layer for glyphcast
//!
//! This crate contains the core business logic and value objects: colors
//! and the animation color cycle, rendered artwork, prompt templates, and
//! the streaming-session vocabulary. It has no dependencies on
//! infrastructure or presentation concerns.

pub mod animation;
pub mod artwork;
pub mod core;
pub mod prompt;
pub mod session;

// Re-export commonly used types
pub use animation::{
    clock::{CYCLE_LEN, color_at},
    frames::{AnimationFrame, export_frames},
};
pub use artwork::{ArtBlock, ArtworkDocument, FontId};
pub use self::core::{color::Rgb, error::DomainError, model::Model};
pub use prompt::template::{
    CURRENT_YEAR, Substitutions, USER_QUERY, default_system_template, default_user_template,
    resolve,
};
pub use session::{state::SessionState, stream::StreamEvent};
