//! Static file serving using rust-embed

use axum::{
    body::Body,
    extract::Path,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

/// Embedded assets from src/web/assets/
#[derive(RustEmbed)]
#[folder = "src/web/assets/"]
pub struct Assets;

/// Serve an embedded asset by relative path
pub fn serve_asset(path: &str) -> Response {
    let path = path.trim_start_matches('/');
    let Some(content) = Assets::get(path) else {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    };

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let mut response = Body::from(content.data.into_owned()).into_response();
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    response
}

/// `GET /assets/{*path}`
pub async fn asset(Path(path): Path<String>) -> Response {
    serve_asset(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_assets_embedded() {
        let css = serve_asset("style.css");
        assert_eq!(css.status(), StatusCode::OK);
        assert_eq!(
            css.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/css"
        );

        let js = serve_asset("/app.js");
        assert_eq!(js.status(), StatusCode::OK);
    }

    #[test]
    fn test_missing_asset() {
        assert_eq!(serve_asset("nope.txt").status(), StatusCode::NOT_FOUND);
        assert_eq!(serve_asset("").status(), StatusCode::NOT_FOUND);
    }
}
