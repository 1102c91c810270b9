//! Frontend serving — built SPA assets with index.html fallback.
//!
//! The default handler serves files from the configured build directory at
//! runtime. With `--features embedded-frontend`, the static/ directory is
//! instead baked into the binary at compile time (the folder must exist at
//! build time; a `.gitkeep` is sufficient for an API-only build).

use super::handlers::GatewayState;
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use std::path::{Component, Path, PathBuf};

/// Message returned when the SPA entry file is missing.
const NOT_BUILT_DETAIL: &str = "Frontend not built. Please run 'npm run build' first.";

/// Axum fallback handler serving the built frontend from disk.
///
/// - An exact file under the build directory is served with its MIME type.
/// - Anything else falls back to index.html for SPA client-side routing.
/// - 404 only when index.html itself is missing.
pub async fn serve_spa(State(state): State<GatewayState>, uri: Uri) -> Response {
    let dist = Path::new(&state.frontend_path);
    let requested = uri.path().trim_start_matches('/');

    if !requested.is_empty() {
        if let Some(path) = resolve_asset(dist, requested) {
            if let Ok(data) = tokio::fs::read(&path).await {
                return serve_file(requested, &data);
            }
        }
    }

    match tokio::fs::read(dist.join("index.html")).await {
        Ok(data) => {
            tracing::info!("Serving frontend for path: /{}", requested);
            serve_file("index.html", &data)
        }
        Err(_) => {
            tracing::error!("Frontend not built. index.html missing.");
            (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "detail": NOT_BUILT_DETAIL })),
            )
                .into_response()
        }
    }
}

/// Join a requested path onto the build directory, rejecting traversal out
/// of it. Returns None for paths containing `..` or absolute components.
fn resolve_asset(dist: &Path, requested: &str) -> Option<PathBuf> {
    let relative = Path::new(requested);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(dist.join(relative))
}

/// Build an HTTP response with the correct Content-Type for the given file path.
fn serve_file(path: &str, data: &[u8]) -> Response {
    let mime = mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime)
        .body(Body::from(data.to_vec()))
        .unwrap()
}

// ============================================================================
// Embedded variant
// ============================================================================

/// Embedded frontend assets compiled from the static/ directory.
#[cfg(feature = "embedded-frontend")]
#[derive(rust_embed::RustEmbed)]
#[folder = "static/"]
struct FrontendAssets;

/// Axum fallback handler serving embedded frontend assets.
#[cfg(feature = "embedded-frontend")]
pub async fn serve_embedded(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    if !path.is_empty() {
        if let Some(file) = FrontendAssets::get(path) {
            return serve_file(path, &file.data);
        }
    }

    match FrontendAssets::get("index.html") {
        Some(file) => serve_file("index.html", &file.data),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "detail": NOT_BUILT_DETAIL })),
        )
            .into_response(),
    }
}
