//! # Error Types
//!
//! This module defines error types used throughout the qrstyle library.

use thiserror::Error;

/// Main error type for qrstyle operations
#[derive(Debug, Error)]
pub enum QrStyleError {
    /// QR encoding or drawing failed
    #[error("Render error: {0}")]
    Render(String),

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// A color string could not be parsed
    #[error("Invalid color '{0}': expected #rgb, #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    /// An option value is not one the renderer understands
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// HTTP server error (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
