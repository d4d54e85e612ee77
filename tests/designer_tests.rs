//! # Designer Tests
//!
//! End-to-end checks of the designer lifecycle against a recording renderer
//! factory, plus a few runs through the bundled renderer.
//!
//! The recording factory keeps every `QrOptions` it was asked to build and
//! every download request it served, so tests can assert on exactly what
//! crossed the renderer boundary.

use image::GenericImageView;
use std::sync::{Arc, Mutex};

use qrstyle::designer::{Designer, SaveCallback};
use qrstyle::error::QrStyleError;
use qrstyle::form::{FillTab, FormEdit};
use qrstyle::options::QrOptions;
use qrstyle::render::{
    Download, DownloadOptions, MountedNode, RenderTarget, Renderer, RendererFactory,
};
use qrstyle::style::{Color, CornerDotType, CornerSquareType, DotType, Gradient, GradientType};

// ============================================================================
// HELPER TYPES
// ============================================================================

#[derive(Default)]
struct Recorder {
    built: Mutex<Vec<QrOptions>>,
    downloads: Mutex<Vec<DownloadOptions>>,
}

struct RecordingFactory(Arc<Recorder>);

struct RecordingRenderer {
    id: usize,
    recorder: Arc<Recorder>,
}

impl RendererFactory for RecordingFactory {
    fn create(&self, options: &QrOptions) -> Result<Box<dyn Renderer>, QrStyleError> {
        let mut built = self.0.built.lock().unwrap();
        built.push(options.clone());
        Ok(Box::new(RecordingRenderer {
            id: built.len(),
            recorder: self.0.clone(),
        }))
    }
}

impl Renderer for RecordingRenderer {
    fn append(&self, target: &mut RenderTarget) -> Result<(), QrStyleError> {
        target.append(MountedNode::Svg(format!("<svg id=\"r{}\"/>", self.id)));
        Ok(())
    }

    fn download(&self, options: &DownloadOptions) -> Result<Download, QrStyleError> {
        self.recorder.downloads.lock().unwrap().push(options.clone());
        Ok(Download {
            file_name: options.file_name(),
            mime: options.extension.mime(),
            bytes: Vec::new(),
        })
    }
}

fn recording_designer() -> (Designer, Arc<Recorder>, Arc<Mutex<Vec<String>>>) {
    let recorder = Arc::new(Recorder::default());
    let saved = Arc::new(Mutex::new(Vec::new()));
    let sink = saved.clone();
    let on_save: SaveCallback = Arc::new(move |content: &str| {
        sink.lock().unwrap().push(content.to_string());
    });
    let designer = Designer::with_factory(Arc::new(RecordingFactory(recorder.clone())), on_save);
    (designer, recorder, saved)
}

fn builds(recorder: &Recorder) -> usize {
    recorder.built.lock().unwrap().len()
}

fn last_built(recorder: &Recorder) -> QrOptions {
    recorder.built.lock().unwrap().last().cloned().unwrap()
}

// ============================================================================
// LIFECYCLE
// ============================================================================

#[test]
fn test_initial_render_on_mount() {
    let (mut designer, recorder, _) = recording_designer();
    assert_eq!(builds(&recorder), 0);

    designer.mount();
    assert_eq!(builds(&recorder), 1);

    let options = last_built(&recorder);
    assert_eq!(options.data, "https://example.com");
    assert_eq!((options.width, options.height), (300, 300));
    assert_eq!(options.margin, 10);
    assert_eq!(options.dot_options.shape, DotType::Square);
    assert_eq!(options.background_options.color, Color::WHITE);
    assert!(options.image.is_empty());
}

#[test]
fn test_every_tracked_field_rebuilds_exactly_once() {
    let (mut designer, recorder, _) = recording_designer();
    designer.mount();

    let red = Color::rgb(255, 0, 0);
    let edits = vec![
        FormEdit::Content("https://rust-lang.org".into()),
        FormEdit::Width(320),
        FormEdit::Height(280),
        FormEdit::Margin(12),
        FormEdit::DotStyle(DotType::Rounded),
        FormEdit::DotColor(red),
        FormEdit::DotGradient(Gradient::linear(red, Color::BLACK)),
        FormEdit::CornerSquareStyle(CornerSquareType::Dot),
        FormEdit::CornerSquareColor(red),
        FormEdit::CornerSquareGradient(Gradient::radial(red, red)),
        FormEdit::CornerDotStyle(CornerDotType::Dot),
        FormEdit::CornerDotColor(red),
        FormEdit::CornerDotGradient(Gradient::radial(Color::BLACK, red)),
        FormEdit::BackgroundColor(Color::rgb(240, 240, 240)),
        FormEdit::LogoUrl("data:image/png;base64,AAAA".into()),
        FormEdit::LogoSize(0.3),
        FormEdit::LogoRemoveBackground(true),
    ];

    for (i, edit) in edits.into_iter().enumerate() {
        let label = format!("{:?}", edit);
        assert!(designer.update(edit), "{} did not rebuild", label);
        assert_eq!(builds(&recorder), i + 2, "{} rebuilt more than once", label);
        assert_eq!(designer.target().children().len(), 1);
    }
}

#[test]
fn test_remount_replaces_output() {
    let (mut designer, _, _) = recording_designer();
    designer.mount();
    designer.update(FormEdit::Margin(0));

    let children = designer.target().children();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0], MountedNode::Svg("<svg id=\"r2\"/>".into()));
}

#[test]
fn test_tab_switch_does_not_rebuild_or_clear_values() {
    let (mut designer, recorder, _) = recording_designer();
    designer.mount();

    let blue = Color::rgb(0, 0, 255);
    designer.update(FormEdit::DotColor(blue));
    let built = builds(&recorder);

    assert!(!designer.update(FormEdit::DotTab(FillTab::Gradient)));
    assert_eq!(builds(&recorder), built);

    let options = last_built(&recorder);
    assert_eq!(options.dot_options.color, blue);
    assert!(options.dot_options.gradient.is_some());
}

#[test]
fn test_gradient_stops_survive_any_edit_sequence() {
    let (mut designer, recorder, _) = recording_designer();
    designer.mount();

    let mut gradient = Gradient::default();
    for step in 0..20u16 {
        gradient = match step % 4 {
            0 => gradient.with_kind(GradientType::Radial),
            1 => gradient.with_rotation(step * 20),
            2 => gradient.with_start_color(Color::rgb(step as u8 * 10, 0, 0)),
            _ => gradient.with_end_color(Color::rgb(0, step as u8 * 10, 0)),
        };
        designer.update(FormEdit::CornerDotGradient(gradient));

        let stops = *last_built(&recorder)
            .corner_dot_options
            .gradient
            .unwrap()
            .color_stops();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].offset, 0.0);
        assert_eq!(stops[1].offset, 1.0);
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

#[test]
fn test_download_requests_qr_code_png() {
    let (mut designer, recorder, _) = recording_designer();
    designer.mount();

    let file = designer.download().unwrap().unwrap();
    assert_eq!(file.file_name, "qr-code.png");

    let downloads = recorder.downloads.lock().unwrap();
    assert_eq!(downloads.len(), 1);
    assert_eq!(downloads[0].name, "qr-code");
    assert_eq!(downloads[0].extension.as_str(), "png");
}

#[test]
fn test_download_without_renderer_is_noop() {
    let (designer, recorder, _) = recording_designer();
    assert!(designer.download().unwrap().is_none());
    assert!(recorder.downloads.lock().unwrap().is_empty());
}

#[test]
fn test_save_passes_content_only() {
    let (mut designer, _, saved) = recording_designer();
    designer.mount();
    designer.update(FormEdit::Content("hello".into()));
    designer.update(FormEdit::DotStyle(DotType::Dots));
    designer.save();

    assert_eq!(saved.lock().unwrap().as_slice(), ["hello"]);
}

// ============================================================================
// LOGO INGESTION
// ============================================================================

#[tokio::test]
async fn test_logo_upload_sets_data_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logo.png");
    image::RgbaImage::from_pixel(8, 8, image::Rgba([200, 30, 30, 255]))
        .save(&path)
        .unwrap();

    let (mut designer, recorder, _) = recording_designer();
    designer.mount();
    assert!(designer.load_logo(&path).await);

    assert!(designer.form().logo.url.starts_with("data:"));
    assert!(last_built(&recorder).image.starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn test_missing_logo_file_leaves_state() {
    let (mut designer, recorder, _) = recording_designer();
    designer.mount();
    designer.update(FormEdit::LogoUrl("data:image/png;base64,AAAA".into()));
    let built = builds(&recorder);

    assert!(!designer.load_logo("/no/such/logo.png").await);
    assert_eq!(designer.form().logo.url, "data:image/png;base64,AAAA");
    assert_eq!(builds(&recorder), built);
}

#[tokio::test]
async fn test_last_logo_read_wins() {
    let (mut designer, _, _) = recording_designer();
    designer.mount();

    let first = qrstyle::logo::encode_data_url(b"first", "image/png");
    let second = qrstyle::logo::encode_data_url(b"second", "image/png");
    designer.ingest_logo(Ok(first));
    designer.ingest_logo(Ok(second.clone()));
    assert_eq!(designer.form().logo.url, second);
}

// ============================================================================
// BUNDLED RENDERER
// ============================================================================

#[test]
fn test_bundled_renderer_png_matches_form() {
    let mut designer = Designer::new(|_: &str| {});
    designer.mount();
    designer.update(FormEdit::Width(200));
    designer.update(FormEdit::Height(260));
    designer.update(FormEdit::BackgroundColor(Color::rgb(10, 20, 30)));

    let file = designer.download().unwrap().unwrap();
    let img = image::load_from_memory(&file.bytes).unwrap();
    assert_eq!(img.dimensions(), (200, 260));
    assert_eq!(img.get_pixel(0, 0), image::Rgba([10, 20, 30, 255]));
}

#[test]
fn test_bundled_renderer_logo_overlay() {
    let mut logo_png = Vec::new();
    image::RgbaImage::from_pixel(16, 16, image::Rgba([0, 128, 255, 255]))
        .write_to(&mut std::io::Cursor::new(&mut logo_png), image::ImageFormat::Png)
        .unwrap();

    let mut designer = Designer::new(|_: &str| {});
    designer.mount();
    designer.update(FormEdit::LogoUrl(qrstyle::logo::encode_data_url(
        &logo_png,
        "image/png",
    )));
    designer.update(FormEdit::LogoSize(0.3));

    let file = designer.download().unwrap().unwrap();
    let img = image::load_from_memory(&file.bytes).unwrap();
    // The logo sits in the middle of the code
    assert_eq!(img.get_pixel(150, 150), image::Rgba([0, 128, 255, 255]));
}

#[test]
fn test_bundled_renderer_every_shape_renders() {
    let mut designer = Designer::new(|_: &str| {});
    designer.mount();
    for &dot in DotType::ALL {
        for &square in CornerSquareType::ALL {
            for &corner_dot in CornerDotType::ALL {
                designer.update(FormEdit::DotStyle(dot));
                designer.update(FormEdit::CornerSquareStyle(square));
                designer.update(FormEdit::CornerDotStyle(corner_dot));
                assert!(designer.has_renderer());
                assert!(designer.target().current().is_some());
            }
        }
    }
}
