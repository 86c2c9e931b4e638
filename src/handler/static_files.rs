//! Build-directory asset serving
//!
//! Serves pre-built static artifacts for any path under the page prefix.
//! Resolution is confined to the build directory: `..` components are
//! stripped up front and the canonicalized result must stay inside the
//! canonicalized root, or the request is answered 404.

use std::path::{Path, PathBuf};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::fs;

use super::router::RequestContext;
use crate::http::{self, cache, mime, range::RangeParseResult};
use crate::logger;

/// Serve a request path from the build directory behind a route entry
pub async fn serve_directory(
    ctx: &RequestContext<'_>,
    dir: &Path,
    route_prefix: &str,
    index_files: &[String],
) -> Response<Full<Bytes>> {
    match load_from_directory(dir, ctx.path, route_prefix, index_files).await {
        Some((content, content_type)) => build_asset_response(
            &content,
            content_type,
            ctx.if_none_match.as_deref(),
            ctx.is_head,
            ctx.range_header.as_deref(),
        ),
        None => http::build_404_response(),
    }
}

/// Load an asset from the build directory, with index-file fallback
///
/// Returns the file bytes and inferred Content-Type, or None when the path
/// does not resolve to a file inside the directory.
pub async fn load_from_directory(
    build_dir: &Path,
    path: &str,
    route_prefix: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash; any parent-traversing component is an outright
    // reject, never a rewrite (filenames may legitimately contain dots)
    let clean_path = path.trim_start_matches('/');
    if clean_path.split(['/', '\\']).any(|part| part == "..") {
        logger::log_warning(&format!("Path traversal attempt blocked: {path}"));
        return None;
    }

    // Remove route prefix from path
    let prefix_clean = route_prefix.trim_matches('/');
    let relative_path = if prefix_clean.is_empty() {
        clean_path
    } else {
        clean_path
            .strip_prefix(&format!("{prefix_clean}/"))
            .unwrap_or(clean_path)
    };

    let mut file_path = build_dir.join(relative_path);

    // Confinement root; a missing build directory means nothing is served
    let build_dir_canonical = match build_dir.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Build directory not found or inaccessible '{}': {e}",
                build_dir.display()
            ));
            return None;
        }
    };

    // Directory paths fall back to index files
    if file_path.is_dir() || relative_path.is_empty() || relative_path.ends_with('/') {
        file_path = find_index_file(&file_path, index_files)?;
    }

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&build_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read asset '{}': {}",
                file_path_canonical.display(),
                e
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(
        file_path_canonical
            .extension()
            .and_then(|e| e.to_str()),
    );

    Some((content, content_type))
}

/// First configured index file that exists under a directory path
fn find_index_file(dir_path: &Path, index_files: &[String]) -> Option<PathBuf> {
    index_files
        .iter()
        .map(|name| dir_path.join(name))
        .find(|candidate| candidate.is_file())
}

/// Build asset response with `ETag` and Range support
fn build_asset_response(
    data: &[u8],
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
    range_header: Option<&str>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);
    let total_size = data.len();

    // Check if client has cached version
    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    // Check for Range request
    match http::parse_range_header(range_header, total_size) {
        RangeParseResult::Valid(range) => {
            let start = range.start;
            let end = range.end_position(total_size);

            let body = if is_head {
                Bytes::new()
            } else {
                Bytes::from(data[start..=end].to_vec())
            };

            return http::response::build_partial_response(
                body,
                content_type,
                &etag,
                start,
                end,
                total_size,
                is_head,
            );
        }
        RangeParseResult::NotSatisfiable => {
            return http::build_416_response(total_size);
        }
        RangeParseResult::None => {
            // No Range header or malformed, return full content
        }
    }

    // Full response
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(data.to_owned())
    };

    http::response::build_cached_response(body, content_type, &etag, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
            range_header: None,
        }
    }

    fn index_files() -> Vec<String> {
        vec!["index.html".to_string(), "index.htm".to_string()]
    }

    #[tokio::test]
    async fn test_asset_round_trip_is_byte_exact() {
        let dir = tempfile::tempdir().unwrap();
        let payload: Vec<u8> = (0u8..=255).collect();
        std::fs::write(dir.path().join("app.wasm"), &payload).unwrap();

        let response = serve_directory(
            &ctx("/example/app.wasm"),
            dir.path(),
            "/example/",
            &index_files(),
        )
        .await;
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/wasm"
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes.as_ref(), payload.as_slice());
    }

    #[tokio::test]
    async fn test_missing_asset_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let response = serve_directory(
            &ctx("/example/missing.js"),
            dir.path(),
            "/example/",
            &index_files(),
        )
        .await;
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_traversal_never_leaves_build_dir() {
        let outer = tempfile::tempdir().unwrap();
        std::fs::write(outer.path().join("secret.txt"), "leaked").unwrap();
        let build = outer.path().join("build");
        std::fs::create_dir(&build).unwrap();

        for path in [
            "/example/../secret.txt",
            "/example/../../etc/passwd",
            "/example/..%2F..%2Fsecret.txt",
        ] {
            let loaded =
                load_from_directory(&build, path, "/example/", &index_files()).await;
            assert!(loaded.is_none(), "path {path} must not resolve");
        }
    }

    #[tokio::test]
    async fn test_dotted_filename_is_served_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f..oo.js"), "dotted").unwrap();
        std::fs::write(dir.path().join("foo.js"), "plain").unwrap();

        // A name containing consecutive dots is a real file, not traversal
        let (content, _) = load_from_directory(
            dir.path(),
            "/example/f..oo.js",
            "/example/",
            &index_files(),
        )
        .await
        .unwrap();
        assert_eq!(content, b"dotted");

        // And when the dotted name does not exist, nothing else is served
        let loaded = load_from_directory(
            dir.path(),
            "/example/f..bar.js",
            "/example/",
            &index_files(),
        )
        .await;
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_directory_path_falls_back_to_index_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/index.html"), "<p>docs</p>").unwrap();

        let (content, content_type) = load_from_directory(
            dir.path(),
            "/example/docs/",
            "/example/",
            &index_files(),
        )
        .await
        .unwrap();
        assert_eq!(content, b"<p>docs</p>");
        assert_eq!(content_type, "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn test_etag_match_yields_304() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("style.css"), "body{}").unwrap();

        let first = serve_directory(
            &ctx("/example/style.css"),
            dir.path(),
            "/example/",
            &index_files(),
        )
        .await;
        let etag = first.headers().get("etag").unwrap().to_str().unwrap().to_string();

        let revalidation = RequestContext {
            path: "/example/style.css",
            is_head: false,
            if_none_match: Some(etag),
            range_header: None,
        };
        let second =
            serve_directory(&revalidation, dir.path(), "/example/", &index_files()).await;
        assert_eq!(second.status(), 304);
    }

    #[tokio::test]
    async fn test_range_request_yields_partial_content() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bundle.js"), "0123456789").unwrap();

        let request = RequestContext {
            path: "/example/bundle.js",
            is_head: false,
            if_none_match: None,
            range_header: Some("bytes=2-5".to_string()),
        };
        let response =
            serve_directory(&request, dir.path(), "/example/", &index_files()).await;
        assert_eq!(response.status(), 206);
        assert_eq!(
            response.headers().get("content-range").unwrap(),
            "bytes 2-5/10"
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes.as_ref(), b"2345");
    }
}
