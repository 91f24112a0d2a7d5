//! Text rendering adapters

pub mod block_font;
