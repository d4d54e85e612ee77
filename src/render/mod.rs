//! # Rendering Module
//!
//! The designer treats rendering as an opaque collaborator: it hands a
//! [`QrOptions`] to a [`RendererFactory`], gets a [`Renderer`] back, asks it
//! to append its output to a [`RenderTarget`], and later asks it for a
//! download. Nothing else crosses the boundary.
//!
//! The bundled implementation, [`StyledRenderer`], encodes with the `qrcode`
//! crate and draws with `image`.
//!
//! ## Modules
//!
//! - [`layout`]: module matrix to positioned shapes
//! - [`shapes`]: geometric primitives
//! - [`paint`]: solid and gradient fills
//! - [`raster`]: RGBA backend and PNG/JPEG/WebP encoding
//! - [`svg`]: SVG backend
//! - [`target`]: the mount point
//!
//! ## Usage Example
//!
//! ```
//! use qrstyle::form::FormState;
//! use qrstyle::options::QrOptions;
//! use qrstyle::render::{DownloadOptions, Renderer, RenderTarget, StyledRenderer};
//!
//! let options = QrOptions::from_form(&FormState::default());
//! let renderer = StyledRenderer::new(&options)?;
//!
//! let mut target = RenderTarget::new();
//! renderer.append(&mut target)?;
//! assert!(target.current().is_some());
//!
//! let download = renderer.download(&DownloadOptions::default())?;
//! assert_eq!(download.file_name, "qr-code.png");
//! # Ok::<(), qrstyle::QrStyleError>(())
//! ```

pub mod layout;
pub mod logo;
pub mod paint;
pub mod raster;
pub mod shapes;
pub mod svg;
pub mod target;

pub use target::{MountedNode, RenderTarget, TargetStats};

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QrStyleError;
use crate::options::{QrOptions, RenderType};
use layout::Scene;

/// Export file type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileExtension {
    #[default]
    Png,
    Jpeg,
    Webp,
    Svg,
}

impl FileExtension {
    pub fn as_str(self) -> &'static str {
        match self {
            FileExtension::Png => "png",
            FileExtension::Jpeg => "jpeg",
            FileExtension::Webp => "webp",
            FileExtension::Svg => "svg",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            FileExtension::Png => "image/png",
            FileExtension::Jpeg => "image/jpeg",
            FileExtension::Webp => "image/webp",
            FileExtension::Svg => "image/svg+xml",
        }
    }

    fn image_format(self) -> Option<ImageFormat> {
        match self {
            FileExtension::Png => Some(ImageFormat::Png),
            FileExtension::Jpeg => Some(ImageFormat::Jpeg),
            FileExtension::Webp => Some(ImageFormat::WebP),
            FileExtension::Svg => None,
        }
    }
}

impl FromStr for FileExtension {
    type Err = QrStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(FileExtension::Png),
            "jpeg" | "jpg" => Ok(FileExtension::Jpeg),
            "webp" => Ok(FileExtension::Webp),
            "svg" => Ok(FileExtension::Svg),
            other => Err(QrStyleError::InvalidOption(format!(
                "unknown file extension '{}' (expected png, jpeg, webp or svg)",
                other
            ))),
        }
    }
}

impl fmt::Display for FileExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to export: base file name and extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadOptions {
    pub name: String,
    pub extension: FileExtension,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            name: "qr-code".to_string(),
            extension: FileExtension::Png,
        }
    }
}

impl DownloadOptions {
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.extension)
    }
}

/// An exported file, ready to be written or sent.
#[derive(Debug, Clone)]
pub struct Download {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// A configured renderer instance.
pub trait Renderer: Send + Sync {
    /// Draw into the target as a new child.
    fn append(&self, target: &mut RenderTarget) -> Result<(), QrStyleError>;

    /// Export the current drawing as a file.
    fn download(&self, options: &DownloadOptions) -> Result<Download, QrStyleError>;
}

/// Builds renderers from options.
pub trait RendererFactory: Send + Sync {
    fn create(&self, options: &QrOptions) -> Result<Box<dyn Renderer>, QrStyleError>;
}

/// Renderer backed by `qrcode` + `image`.
#[derive(Debug)]
pub struct StyledRenderer {
    render_type: RenderType,
    scene: Scene,
}

impl StyledRenderer {
    pub fn new(options: &QrOptions) -> Result<Self, QrStyleError> {
        Ok(Self {
            render_type: options.render_type,
            scene: Scene::build(options)?,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn to_image(&self) -> image::RgbaImage {
        raster::draw(&self.scene)
    }

    pub fn to_svg(&self) -> Result<String, QrStyleError> {
        svg::write(&self.scene)
    }
}

impl Renderer for StyledRenderer {
    fn append(&self, target: &mut RenderTarget) -> Result<(), QrStyleError> {
        let node = match self.render_type {
            RenderType::Svg => MountedNode::Svg(self.to_svg()?),
            RenderType::Canvas => {
                MountedNode::Png(raster::encode(&self.to_image(), ImageFormat::Png)?)
            }
        };
        target.append(node);
        Ok(())
    }

    fn download(&self, options: &DownloadOptions) -> Result<Download, QrStyleError> {
        let bytes = match options.extension.image_format() {
            Some(format) => raster::encode(&self.to_image(), format)?,
            None => self.to_svg()?.into_bytes(),
        };
        Ok(Download {
            file_name: options.file_name(),
            mime: options.extension.mime(),
            bytes,
        })
    }
}

/// Factory for [`StyledRenderer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StyledRendererFactory;

impl RendererFactory for StyledRendererFactory {
    fn create(&self, options: &QrOptions) -> Result<Box<dyn Renderer>, QrStyleError> {
        Ok(Box::new(StyledRenderer::new(options)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormState;

    fn default_renderer() -> StyledRenderer {
        StyledRenderer::new(&QrOptions::from_form(&FormState::default())).unwrap()
    }

    #[test]
    fn test_default_download_is_png() {
        let download = default_renderer().download(&DownloadOptions::default()).unwrap();
        assert_eq!(download.file_name, "qr-code.png");
        assert_eq!(download.mime, "image/png");
        assert_eq!(&download.bytes[..4], b"\x89PNG");
    }

    #[test]
    fn test_svg_download() {
        let options = DownloadOptions {
            name: "qr-code".into(),
            extension: FileExtension::Svg,
        };
        let download = default_renderer().download(&options).unwrap();
        assert_eq!(download.file_name, "qr-code.svg");
        assert!(download.bytes.starts_with(b"<svg"));
    }

    #[test]
    fn test_append_svg_by_default() {
        let mut target = RenderTarget::new();
        default_renderer().append(&mut target).unwrap();
        assert!(matches!(target.current(), Some(MountedNode::Svg(_))));
    }

    #[test]
    fn test_append_canvas_png() {
        let options =
            QrOptions::from_form(&FormState::default()).with_render_type(RenderType::Canvas);
        let mut target = RenderTarget::new();
        StyledRenderer::new(&options).unwrap().append(&mut target).unwrap();
        assert!(matches!(target.current(), Some(MountedNode::Png(_))));
    }

    #[test]
    fn test_png_download_decodes_to_configured_size() {
        let mut form = FormState::default();
        form.set_width(250);
        form.set_height(150);
        let renderer = StyledRenderer::new(&QrOptions::from_form(&form)).unwrap();
        let download = renderer.download(&DownloadOptions::default()).unwrap();
        let img = image::load_from_memory(&download.bytes).unwrap();
        assert_eq!((img.width(), img.height()), (250, 150));
    }

    #[test]
    fn test_extension_parse() {
        assert_eq!("JPG".parse::<FileExtension>().unwrap(), FileExtension::Jpeg);
        assert!("gif".parse::<FileExtension>().is_err());
    }
}
