//! # HTTP Server for the QR Designer
//!
//! Serves the designer form and a JSON API. Each browser tab opens its own
//! designer session; the form sends single-field edits and shows the
//! preview the server mounted.
//!
//! ## Usage
//!
//! ```bash
//! qrstyle serve --listen 0.0.0.0:8080
//! ```
//!
//! Then open http://localhost:8080 in a browser.
//!
//! ## API
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/api/designer` | Open a session |
//! | GET | `/api/designer/:id` | State and options |
//! | PATCH | `/api/designer/:id` | Apply `{"edits": [...]}` |
//! | DELETE | `/api/designer/:id` | Close a session |
//! | GET | `/api/designer/:id/preview` | Mounted SVG/PNG |
//! | POST | `/api/designer/:id/logo` | Multipart logo upload |
//! | GET | `/api/designer/:id/download` | `qr-code.png` attachment |
//! | POST | `/api/designer/:id/save` | Save the content |
//! | GET | `/api/saved` | Saved contents |
//! | GET | `/api/styles` | Shape variants and slider bounds |

mod handlers;
mod state;
mod static_files;

pub use state::{AppState, SavedCode, ServerConfig};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::QrStyleError;
use state::SESSION_EXPIRATION_SECS;

/// Logos above this size are rejected by the upload route.
const MAX_LOGO_BYTES: usize = 10 * 1024 * 1024;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Frontend
        .route("/", get(static_files::index_handler))
        .route("/assets/*path", get(static_files::asset_handler))
        // Designer API
        .route("/api/designer", post(handlers::designer::create))
        .route(
            "/api/designer/:id",
            get(handlers::designer::get)
                .patch(handlers::designer::update)
                .delete(handlers::designer::close),
        )
        .route(
            "/api/designer/:id/preview",
            get(handlers::designer::preview),
        )
        .route(
            "/api/designer/:id/logo",
            post(handlers::designer::upload_logo).layer(DefaultBodyLimit::max(MAX_LOGO_BYTES)),
        )
        .route(
            "/api/designer/:id/download",
            get(handlers::designer::download),
        )
        .route("/api/designer/:id/save", post(handlers::designer::save))
        // Catalogs
        .route("/api/saved", get(handlers::saved::list))
        .route("/api/styles", get(handlers::styles::catalog))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use qrstyle::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), qrstyle::QrStyleError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), QrStyleError> {
    let app_state = Arc::new(AppState::new(config.clone()));

    // Spawn background session cleanup task
    tokio::spawn(cleanup_sessions(app_state.clone()));

    let app = router(app_state);

    info!(listen = %config.listen_addr, "qrstyle HTTP server starting");
    println!(
        "Open http://{}/ in your browser to design a QR code",
        config.listen_addr
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            QrStyleError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| QrStyleError::Server(format!("Server error: {}", e)))?;

    Ok(())
}

/// Background task to drop idle designer sessions.
async fn cleanup_sessions(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(Duration::from_secs(60));
    let expiration = Duration::from_secs(SESSION_EXPIRATION_SECS);

    loop {
        interval.tick().await;
        let now = Instant::now();

        let mut sessions = state.sessions.write().await;
        let before = sessions.len();
        // A session locked by a request is in use, so it stays
        sessions.retain(|_, s| match s.try_lock() {
            Ok(session) => now.duration_since(session.last_accessed) < expiration,
            Err(_) => true,
        });
        let after = sessions.len();
        if before != after {
            info!(
                expired = before - after,
                remaining = after,
                "cleaned up designer sessions"
            );
        }
    }
}
