//! # qrstyle - Styled QR Code Designer
//!
//! qrstyle lets you configure how a QR code looks (size, margin, dot and
//! corner shapes, solid or gradient colors, a logo overlay), see a live
//! preview, and export the result. It provides:
//!
//! - **Form state**: one setter per field, clamped to slider bounds
//! - **Options synthesis**: the renderer configuration built from the form
//! - **Rendering**: a `qrcode` + `image` renderer with SVG, PNG, JPEG and WebP output
//! - **Designer**: rebuild-on-change lifecycle, download and save actions
//! - **Server**: an HTTP form with a JSON API
//!
//! ## Quick Start
//!
//! ```
//! use qrstyle::{Designer, form::FormEdit, style::{Color, DotType}};
//!
//! let mut designer = Designer::new(|content: &str| println!("saved {}", content));
//! designer.mount();
//!
//! designer.update(FormEdit::DotStyle(DotType::Rounded));
//! designer.update(FormEdit::BackgroundColor(Color::rgb(250, 250, 240)));
//!
//! if let Some(file) = designer.download()? {
//!     assert_eq!(file.file_name, "qr-code.png");
//! }
//! # Ok::<(), qrstyle::QrStyleError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`form`] | Form state store and the color/gradient control |
//! | [`options`] | Renderer configuration |
//! | [`render`] | Renderer traits and the bundled renderer |
//! | [`designer`] | Lifecycle and actions |
//! | [`logo`] | Logo file to data URL |
//! | [`style`] | Colors, gradients, shape variants |
//! | [`server`] | HTTP server |
//! | [`error`] | Error types |

pub mod designer;
pub mod error;
pub mod form;
pub mod logo;
pub mod options;
pub mod render;
pub mod server;
pub mod style;

// Re-exports for convenience
pub use designer::Designer;
pub use error::QrStyleError;
pub use options::QrOptions;
