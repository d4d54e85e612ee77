//! # qrstyle CLI
//!
//! Command-line interface for the QR designer.
//!
//! ## Usage
//!
//! ```bash
//! # Start the web designer
//! qrstyle serve --listen 0.0.0.0:8080
//!
//! # Render qr-code.png into the current directory
//! qrstyle render --data https://example.com
//!
//! # Rounded dots with a red-to-blue gradient and a logo, as SVG
//! qrstyle render --dot-style rounded --gradient '#ff0000:#0000ff' \
//!     --logo logo.png --format svg --out build/
//!
//! # Print the synthesized renderer options as JSON
//! qrstyle options --corner-square-style extra-rounded
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use qrstyle::{
    Designer, QrStyleError,
    form::FormState,
    render::FileExtension,
    server::{self, ServerConfig},
    style::{Color, CornerDotType, CornerSquareType, DotType, Gradient, GradientType},
};

/// qrstyle - Styled QR code designer
#[derive(Parser, Debug)]
#[command(name = "qrstyle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the web designer
    Serve {
        /// Address to listen on
        #[arg(long, env = "QRSTYLE_LISTEN", default_value = "0.0.0.0:8080")]
        listen: String,
    },

    /// Render a QR code to a file
    Render {
        #[command(flatten)]
        style: StyleArgs,

        /// Output directory
        #[arg(long, value_name = "DIR", default_value = ".")]
        out: PathBuf,

        /// File format (png, jpeg, webp, svg)
        #[arg(long, default_value = "png")]
        format: FileExtension,
    },

    /// Print the renderer options as JSON
    Options {
        #[command(flatten)]
        style: StyleArgs,
    },
}

/// Form fields, one flag each.
#[derive(Args, Debug)]
struct StyleArgs {
    /// Content to encode
    #[arg(long, default_value = qrstyle::form::DEFAULT_CONTENT)]
    data: String,

    /// Image width in pixels (100-500)
    #[arg(long, default_value = "300")]
    width: u32,

    /// Image height in pixels (100-500)
    #[arg(long, default_value = "300")]
    height: u32,

    /// Quiet zone in pixels (0-50)
    #[arg(long, default_value = "10")]
    margin: u32,

    /// square, dots or rounded
    #[arg(long, default_value = "square")]
    dot_style: DotType,

    /// Dot color
    #[arg(long, default_value = "#000000")]
    dot_color: Color,

    /// square, dot or extra-rounded
    #[arg(long, default_value = "square")]
    corner_square_style: CornerSquareType,

    /// square or dot
    #[arg(long, default_value = "square")]
    corner_dot_style: CornerDotType,

    /// Background color
    #[arg(long, default_value = "#ffffff")]
    background: Color,

    /// Gradient for all elements as START:END colors
    #[arg(long, value_name = "START:END")]
    gradient: Option<String>,

    /// linear or radial
    #[arg(long, default_value = "linear")]
    gradient_type: GradientType,

    /// Gradient rotation in degrees (0-360)
    #[arg(long, default_value = "0")]
    rotation: u16,

    /// Logo image file
    #[arg(long, value_name = "FILE")]
    logo: Option<PathBuf>,

    /// Logo size as a fraction of the code (0.1-0.5)
    #[arg(long, default_value = "0.2")]
    logo_size: f32,

    /// Knock out the logo's background color
    #[arg(long)]
    remove_logo_background: bool,
}

impl StyleArgs {
    fn form(&self) -> Result<FormState, QrStyleError> {
        let mut form = FormState::default();
        form.set_content(self.data.clone());
        form.set_width(self.width);
        form.set_height(self.height);
        form.set_margin(self.margin);
        form.set_dot_style(self.dot_style);
        form.set_corner_square_style(self.corner_square_style);
        form.set_corner_dot_style(self.corner_dot_style);
        form.set_background_color(self.background);
        form.set_logo_size(self.logo_size);
        form.set_logo_remove_background(self.remove_logo_background);

        // Without --gradient, each element's gradient runs between its own
        // solid color so the solid color is what shows.
        let gradient = match &self.gradient {
            Some(spec) => {
                let (start, end) = spec.split_once(':').ok_or_else(|| {
                    QrStyleError::InvalidOption(format!(
                        "gradient '{}' must be START:END, e.g. #ff0000:#0000ff",
                        spec
                    ))
                })?;
                Some(Gradient::new(
                    self.gradient_type,
                    self.rotation,
                    start.parse()?,
                    end.parse()?,
                ))
            }
            None => None,
        };

        let dots = gradient.unwrap_or_else(|| {
            Gradient::new(self.gradient_type, self.rotation, self.dot_color, self.dot_color)
        });
        let corners = gradient.unwrap_or(dots);
        form.set_dot_color(self.dot_color);
        form.set_corner_square_color(self.dot_color);
        form.set_corner_dot_color(self.dot_color);
        form.set_dot_gradient(dots);
        form.set_corner_square_gradient(corners);
        form.set_corner_dot_gradient(corners);

        Ok(form)
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,qrstyle=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), QrStyleError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { listen } => {
            server::serve(ServerConfig {
                listen_addr: listen,
            })
            .await?;
        }
        Commands::Render { style, out, format } => {
            let mut designer = Designer::new(|_: &str| {}).with_form(style.form()?);
            if let Some(path) = &style.logo {
                // A logo that cannot be read is skipped, as in the web form
                designer.load_logo(path).await;
                if designer.form().logo.url.is_empty() {
                    println!("Could not read logo {}, rendering without it", path.display());
                }
            }
            designer.mount();

            let file = designer.download_as(format)?.ok_or_else(|| {
                QrStyleError::Render(format!("cannot encode '{}' as a QR code", style.data))
            })?;

            tokio::fs::create_dir_all(&out).await?;
            let path = out.join(&file.file_name);
            tokio::fs::write(&path, &file.bytes).await?;
            println!("Saved to {}", path.display());
        }
        Commands::Options { style } => {
            let mut designer = Designer::new(|_: &str| {}).with_form(style.form()?);
            if let Some(path) = &style.logo {
                designer.load_logo(path).await;
            }
            let json = serde_json::to_string_pretty(&designer.options())
                .map_err(|e| QrStyleError::InvalidOption(e.to_string()))?;
            println!("{}", json);
        }
    }

    Ok(())
}
