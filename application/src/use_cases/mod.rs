//! Use cases orchestrating the domain through the ports

pub mod animate;
pub mod chat;
pub mod generate_art;
pub mod models;
