//! Bootstrap assets — the embedded browser client served over HTTP.
//!
//! Uses `rust-embed` to bake the `web/` directory into the binary. The
//! responder is GET-only and restricted to the handful of types the
//! bootstrap needs (HTML, CSS, script); anything else is refused.

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "web/"]
struct WebAssets;

const ALLOWED_EXTENSIONS: &[&str] = &["html", "css", "js"];

/// Build an axum `Router` serving the embedded client.
///
/// Register this **after** `/ws` and `/health` so those routes take
/// priority over the catch-all.
pub fn asset_router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/{*path}", get(static_handler))
}

async fn index_handler() -> Response {
    serve_file("index.html")
}

async fn static_handler(Path(path): Path<String>) -> Response {
    serve_file(&path)
}

fn extension_allowed(path: &str) -> bool {
    std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext))
}

fn serve_file(path: &str) -> Response {
    if !extension_allowed(path) {
        return (StatusCode::UNSUPPORTED_MEDIA_TYPE, "unsupported file type").into_response();
    }
    match WebAssets::get(path) {
        Some(asset) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref())],
                asset.data.into_owned(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_allowlist() {
        assert!(extension_allowed("index.html"));
        assert!(extension_allowed("easel.css"));
        assert!(extension_allowed("easel.js"));
        assert!(!extension_allowed("secrets.json"));
        assert!(!extension_allowed("binary.wasm"));
        assert!(!extension_allowed("no-extension"));
    }

    #[test]
    fn test_embedded_bootstrap_files_exist() {
        assert!(WebAssets::get("index.html").is_some());
        assert!(WebAssets::get("easel.css").is_some());
        assert!(WebAssets::get("easel.js").is_some());
    }
}
