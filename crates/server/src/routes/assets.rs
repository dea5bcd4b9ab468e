//! Static assets compiled into the binary.

use axum::{
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::IntoResponse,
};

const STYLE_CSS: &str = include_str!("../../static/style.css");
const ESTIMATE_JS: &str = include_str!("../../static/estimate.js");

const ASSET_CACHE_CONTROL: &str = "public, max-age=3600";

/// Serve the stylesheet.
pub async fn style_css() -> impl IntoResponse {
    (
        [
            (CONTENT_TYPE, "text/css; charset=utf-8"),
            (CACHE_CONTROL, ASSET_CACHE_CONTROL),
        ],
        STYLE_CSS,
    )
}

/// Serve the live estimate script.
pub async fn estimate_js() -> impl IntoResponse {
    (
        [
            (CONTENT_TYPE, "text/javascript; charset=utf-8"),
            (CACHE_CONTROL, ASSET_CACHE_CONTROL),
        ],
        ESTIMATE_JS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_script_ignores_login_redirect() {
        assert!(ESTIMATE_JS.contains(r#"redirect: "manual""#));
        assert!(ESTIMATE_JS.contains("opaqueredirect"));
    }

    #[test]
    fn test_estimate_script_targets_fragment_url() {
        assert!(ESTIMATE_JS.contains("data-estimate-url"));
    }
}
