//! HTTP handlers for the server.

pub mod designer;
pub mod saved;
pub mod styles;
