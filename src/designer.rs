//! # Designer
//!
//! Ties the form state, the renderer and the render target together.
//!
//! The lifecycle is "rebuild on any change": mounting builds the first
//! preview, and every edit that changes a tracked field synthesizes fresh
//! options, creates a new renderer, clears the target and appends the new
//! output. The previous renderer is dropped. Edits that leave a field
//! unchanged, and tab switches inside the color/gradient control, do not
//! rebuild.
//!
//! ## Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use qrstyle::designer::Designer;
//! use qrstyle::form::FormEdit;
//!
//! let saved = Arc::new(Mutex::new(Vec::new()));
//! let sink = saved.clone();
//! let mut designer = Designer::new(move |content: &str| {
//!     sink.lock().unwrap().push(content.to_string());
//! });
//! designer.mount();
//!
//! designer.update(FormEdit::Content("https://rust-lang.org".into()));
//! let png = designer.download()?.expect("mounted designer has a renderer");
//! assert_eq!(png.file_name, "qr-code.png");
//!
//! designer.save();
//! assert_eq!(saved.lock().unwrap().as_slice(), ["https://rust-lang.org"]);
//! # Ok::<(), qrstyle::QrStyleError>(())
//! ```

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::QrStyleError;
use crate::form::{FormEdit, FormState};
use crate::logo;
use crate::options::QrOptions;
use crate::render::{
    Download, DownloadOptions, FileExtension, RenderTarget, Renderer, RendererFactory,
    StyledRendererFactory,
};

/// Receives the content string when the user saves.
pub type SaveCallback = Arc<dyn Fn(&str) + Send + Sync>;

pub struct Designer {
    form: FormState,
    factory: Arc<dyn RendererFactory>,
    renderer: Option<Box<dyn Renderer>>,
    target: RenderTarget,
    on_save: SaveCallback,
    mounted: bool,
    rebuilds: u64,
}

impl Designer {
    /// Designer with default form values and the bundled renderer.
    pub fn new(on_save: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self::with_factory(Arc::new(StyledRendererFactory), Arc::new(on_save))
    }

    pub fn with_factory(factory: Arc<dyn RendererFactory>, on_save: SaveCallback) -> Self {
        Self {
            form: FormState::default(),
            factory,
            renderer: None,
            target: RenderTarget::new(),
            on_save,
            mounted: false,
            rebuilds: 0,
        }
    }

    /// Start from the given form values instead of the defaults.
    pub fn with_form(mut self, form: FormState) -> Self {
        self.form = form;
        self
    }

    /// Build the initial preview. Calling it again forces a rebuild.
    pub fn mount(&mut self) {
        self.mounted = true;
        self.rebuild();
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Options the current renderer was (or would be) built from.
    pub fn options(&self) -> QrOptions {
        QrOptions::from_form(&self.form)
    }

    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    /// Number of rebuilds since creation.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Apply one edit. Returns `true` if the preview was rebuilt.
    pub fn update(&mut self, edit: FormEdit) -> bool {
        let affects_render = edit.affects_render();
        let changed = self.form.apply(edit);
        self.after_change(changed && affects_render)
    }

    /// Run a setter on the form state. Returns `true` if the preview was
    /// rebuilt.
    ///
    /// Only changes that reach the renderer options rebuild, so a setter
    /// that just switches a color/gradient tab leaves the preview alone.
    ///
    /// ```
    /// # use qrstyle::designer::Designer;
    /// let mut designer = Designer::new(|_: &str| {});
    /// designer.mount();
    /// assert!(designer.update_with(|form| form.set_margin(20)));
    /// ```
    pub fn update_with(&mut self, setter: impl FnOnce(&mut FormState) -> bool) -> bool {
        let before = self.options();
        let changed = setter(&mut self.form);
        self.after_change(changed && self.options() != before)
    }

    fn after_change(&mut self, needs_rebuild: bool) -> bool {
        if needs_rebuild && self.mounted {
            self.rebuild();
            true
        } else {
            false
        }
    }

    fn rebuild(&mut self) {
        let options = self.options();
        self.rebuilds += 1;
        self.target.clear();

        match self.factory.create(&options) {
            Ok(renderer) => match renderer.append(&mut self.target) {
                Ok(()) => self.renderer = Some(renderer),
                Err(e) => {
                    // Download must not outlive a preview that never mounted
                    warn!(error = %e, "renderer failed to mount output");
                    self.target.clear();
                    self.renderer = None;
                }
            },
            Err(e) => {
                warn!(error = %e, "could not build renderer");
                self.renderer = None;
            }
        }

        debug!(
            rebuild = self.rebuilds,
            width = options.width,
            height = options.height,
            "preview rebuilt"
        );
    }

    /// Export `qr-code.png`. A designer without a renderer returns `None`.
    pub fn download(&self) -> Result<Option<Download>, QrStyleError> {
        self.download_as(FileExtension::Png)
    }

    pub fn download_as(&self, extension: FileExtension) -> Result<Option<Download>, QrStyleError> {
        let Some(renderer) = &self.renderer else {
            return Ok(None);
        };
        let options = DownloadOptions {
            extension,
            ..DownloadOptions::default()
        };
        renderer.download(&options).map(Some)
    }

    /// Hand the current content to the save callback. Style settings are
    /// not included.
    pub fn save(&self) {
        (self.on_save)(&self.form.content);
    }

    /// Apply the result of a logo read.
    ///
    /// A successful read replaces the logo and rebuilds; a failed one is
    /// ignored and the previous logo stays. Returns `true` on rebuild.
    pub fn ingest_logo(&mut self, read: Result<String, QrStyleError>) -> bool {
        match read {
            Ok(data_url) => self.update(FormEdit::LogoUrl(data_url)),
            Err(e) => {
                debug!(error = %e, "logo read failed, keeping previous logo");
                false
            }
        }
    }

    /// Read a logo file and apply it.
    pub async fn load_logo(&mut self, path: impl AsRef<Path>) -> bool {
        let read = logo::read_data_url(path).await;
        self.ingest_logo(read)
    }
}

impl std::fmt::Debug for Designer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Designer")
            .field("form", &self.form)
            .field("mounted", &self.mounted)
            .field("has_renderer", &self.renderer.is_some())
            .field("rebuilds", &self.rebuilds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FillTab;
    use crate::render::MountedNode;
    use crate::style::DotType;

    /// Builds renderers that cannot mount anything.
    struct UnmountableFactory;

    struct UnmountableRenderer;

    impl RendererFactory for UnmountableFactory {
        fn create(&self, _: &QrOptions) -> Result<Box<dyn Renderer>, QrStyleError> {
            Ok(Box::new(UnmountableRenderer))
        }
    }

    impl Renderer for UnmountableRenderer {
        fn append(&self, target: &mut RenderTarget) -> Result<(), QrStyleError> {
            target.append(MountedNode::Svg("<svg/>".into()));
            Err(QrStyleError::Render("mount failed".into()))
        }

        fn download(&self, options: &DownloadOptions) -> Result<Download, QrStyleError> {
            Ok(Download {
                file_name: options.file_name(),
                mime: options.extension.mime(),
                bytes: Vec::new(),
            })
        }
    }

    fn designer() -> Designer {
        let mut d = Designer::new(|_: &str| {});
        d.mount();
        d
    }

    #[test]
    fn test_mount_builds_once() {
        let d = designer();
        assert_eq!(d.rebuild_count(), 1);
        assert!(d.has_renderer());
        assert_eq!(d.target().stats().children, 1);
    }

    #[test]
    fn test_edits_before_mount_do_not_render() {
        let mut d = Designer::new(|_: &str| {});
        assert!(!d.update(FormEdit::Width(400)));
        assert_eq!(d.rebuild_count(), 0);
        assert_eq!(d.download().unwrap().map(|d| d.file_name), None);
    }

    #[test]
    fn test_changed_edit_rebuilds_once() {
        let mut d = designer();
        assert!(d.update(FormEdit::DotStyle(DotType::Dots)));
        assert_eq!(d.rebuild_count(), 2);
        assert_eq!(d.target().stats().children, 1);
        assert_eq!(d.target().stats().mounts, 2);
    }

    #[test]
    fn test_same_value_does_not_rebuild() {
        let mut d = designer();
        assert!(!d.update(FormEdit::Width(300)));
        assert_eq!(d.rebuild_count(), 1);
    }

    #[test]
    fn test_failed_logo_read_keeps_state() {
        let mut d = designer();
        d.update(FormEdit::LogoUrl("data:image/png;base64,AAAA".into()));
        let before = d.form().logo.url.clone();

        let err = QrStyleError::Io(std::io::Error::other("boom"));
        assert!(!d.ingest_logo(Err(err)));
        assert_eq!(d.form().logo.url, before);
    }

    #[test]
    fn test_unrenderable_content_drops_renderer() {
        let mut d = designer();
        d.update(FormEdit::Content("x".repeat(5000)));
        assert!(!d.has_renderer());
        assert!(d.target().current().is_none());
        assert!(d.download().unwrap().is_none());
    }

    #[test]
    fn test_update_with_tab_switch_does_not_rebuild() {
        let mut d = designer();
        assert!(!d.update_with(|form| form.dots.fill.select_tab(FillTab::Gradient)));
        assert_eq!(d.form().dots.fill.tab, FillTab::Gradient);
        assert_eq!(d.rebuild_count(), 1);

        assert!(d.update_with(|form| form.set_margin(20)));
        assert_eq!(d.rebuild_count(), 2);
    }

    #[test]
    fn test_failed_mount_drops_renderer() {
        let mut d = Designer::with_factory(Arc::new(UnmountableFactory), Arc::new(|_: &str| {}));
        d.mount();
        assert!(!d.has_renderer());
        assert!(d.target().current().is_none());
        assert!(d.download().unwrap().is_none());
    }
}
