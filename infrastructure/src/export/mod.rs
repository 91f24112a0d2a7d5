//! Frame export adapters

pub mod gif;
