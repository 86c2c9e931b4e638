//! Application page handler
//!
//! Answers the page route with `index.html` rendered from the template
//! directory. The template receives exactly three context values:
//!
//! - `static`  - URL prefix for build assets
//! - `base_url` - the application's mounted base path
//! - `token`   - the access token for this server process
//!
//! A missing template or a missing token is a server error; neither is
//! recovered here.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use super::router::RequestContext;
use crate::http::{self, response::build_html_response};
use crate::logger;
use crate::settings::Settings;
use crate::template::{Context, TemplateLoader};

/// Template name resolved for every page request
const PAGE_TEMPLATE: &str = "index.html";

/// Serve the rendered application page
pub async fn serve_page(
    ctx: &RequestContext<'_>,
    settings: &Settings,
    templates: &TemplateLoader,
) -> Response<Full<Bytes>> {
    let Some(token) = settings.token() else {
        logger::log_error("Missing 'token' setting, cannot render page");
        return http::build_500_response();
    };

    let template = match templates.resolve(PAGE_TEMPLATE).await {
        Ok(t) => t,
        Err(e) => {
            logger::log_error(&format!("Failed to load page template: {e}"));
            return http::build_500_response();
        }
    };

    let mut context = Context::new();
    context.insert("static", settings.static_prefix());
    context.insert("base_url", settings.base_url());
    context.insert("token", token);

    build_html_response(template.render(&context), ctx.is_head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn get_ctx() -> RequestContext<'static> {
        RequestContext {
            path: "/example",
            is_head: false,
            if_none_match: None,
            range_header: None,
        }
    }

    async fn body_string(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_page_renders_settings_into_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("index.html"),
            "<script src=\"{{ static }}bundle.js\"></script>\
             <body data-base-url=\"{{ base_url }}\" data-token=\"{{ token }}\">",
        )
        .unwrap();

        let settings = Settings::new("/", "/example", Some("deadbeef".to_string()));
        let templates = TemplateLoader::new(dir.path());

        let response = serve_page(&get_ctx(), &settings, &templates).await;
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );

        let body = body_string(response).await;
        assert!(body.contains("src=\"/example/bundle.js\""));
        assert!(body.contains("data-base-url=\"/\""));
        assert!(body.contains("data-token=\"deadbeef\""));
    }

    #[tokio::test]
    async fn test_missing_template_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::new("/", "/example", Some("deadbeef".to_string()));
        let templates = TemplateLoader::new(dir.path());

        let response = serve_page(&get_ctx(), &settings, &templates).await;
        assert_eq!(response.status(), 500);
    }

    #[tokio::test]
    async fn test_missing_token_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "{{ token }}").unwrap();

        let settings = Settings::new("/", "/example", None);
        let templates = TemplateLoader::new(dir.path());

        let response = serve_page(&get_ctx(), &settings, &templates).await;
        assert_eq!(response.status(), 500);
    }

    #[tokio::test]
    async fn test_head_request_has_empty_body() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "{{ token }}").unwrap();

        let settings = Settings::new("/", "/example", Some("deadbeef".to_string()));
        let templates = TemplateLoader::new(dir.path());

        let ctx = RequestContext {
            is_head: true,
            ..get_ctx()
        };
        let response = serve_page(&ctx, &settings, &templates).await;
        assert_eq!(response.status(), 200);
        // Content-Length still reflects the rendered page
        assert_eq!(response.headers().get("content-length").unwrap(), "8");
        assert!(body_string(response).await.is_empty());
    }
}
