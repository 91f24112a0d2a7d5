//! Prompt templates for the chat flow

pub mod template;
