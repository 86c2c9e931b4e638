//! Filesystem template loader
//!
//! Resolves template names against a fixed root directory. Resolution is
//! confined to that root: parent-traversing or absolute names are rejected
//! up front, and the canonicalized result is verified to stay inside the
//! canonicalized root before anything is read.

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::fs;

use super::context::Context;
use crate::logger;

/// Template resolution/loading failure
#[derive(Debug)]
pub enum TemplateError {
    /// Name does not resolve to a file under the loader root (includes
    /// confinement rejections, which are reported identically on purpose)
    NotFound(String),
    /// The file exists but could not be read
    Unreadable(String, std::io::Error),
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(name) => write!(f, "template not found: {name}"),
            Self::Unreadable(name, e) => write!(f, "template '{name}' unreadable: {e}"),
        }
    }
}

impl std::error::Error for TemplateError {}

/// Loader rooted at a template directory
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    root: PathBuf,
}

impl TemplateLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory this loader resolves against
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a template name to a loaded [`Template`]
    ///
    /// Confinement invariant: the returned template always comes from a
    /// file inside the loader root. Names that try to step outside are
    /// answered with `NotFound`, never served.
    pub async fn resolve(&self, name: &str) -> Result<Template, TemplateError> {
        if !is_safe_name(name) {
            logger::log_warning(&format!("Rejected unsafe template name: {name:?}"));
            return Err(TemplateError::NotFound(name.to_string()));
        }

        let root = match self.root.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                logger::log_warning(&format!(
                    "Template directory '{}' not found or inaccessible: {e}",
                    self.root.display()
                ));
                return Err(TemplateError::NotFound(name.to_string()));
            }
        };

        let Ok(path) = root.join(name).canonicalize() else {
            return Err(TemplateError::NotFound(name.to_string()));
        };
        if !path.starts_with(&root) {
            logger::log_warning(&format!(
                "Template path escape blocked: {} -> {}",
                name,
                path.display()
            ));
            return Err(TemplateError::NotFound(name.to_string()));
        }
        if !path.is_file() {
            return Err(TemplateError::NotFound(name.to_string()));
        }

        let source = fs::read_to_string(&path)
            .await
            .map_err(|e| TemplateError::Unreadable(name.to_string(), e))?;

        Ok(Template {
            name: name.to_string(),
            source,
        })
    }
}

/// Reject names that are empty, absolute, or contain a parent component
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !Path::new(name).is_absolute()
        && !name.split(['/', '\\']).any(|part| part == "..")
}

/// A loaded template, ready to render
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    source: String,
}

impl Template {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Substitute `{{ name }}` placeholders from the context
    ///
    /// Placeholders with no context value render empty, matching the
    /// lenient-undefined behavior of the engine the page was written for.
    /// `{{` without a closing `}}` is emitted literally.
    pub fn render(&self, context: &Context) -> String {
        let mut out = String::with_capacity(self.source.len());
        let mut rest = self.source.as_str();

        while let Some(open) = rest.find("{{") {
            out.push_str(&rest[..open]);
            let after = &rest[open + 2..];
            match after.find("}}") {
                Some(close) => {
                    let key = after[..close].trim();
                    if let Some(value) = context.get(key) {
                        out.push_str(value);
                    }
                    rest = &after[close + 2..];
                }
                None => {
                    out.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }

        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(source: &str) -> Template {
        Template {
            name: "index.html".to_string(),
            source: source.to_string(),
        }
    }

    #[test]
    fn test_render_substitutes_values() {
        let mut ctx = Context::new();
        ctx.insert("base_url", "/");
        ctx.insert("token", "s3cret");
        let html = template("<body data-base=\"{{ base_url }}\" data-token=\"{{ token }}\">")
            .render(&ctx);
        assert_eq!(html, "<body data-base=\"/\" data-token=\"s3cret\">");
    }

    #[test]
    fn test_render_unknown_placeholder_is_empty() {
        let html = template("a{{ nope }}b").render(&Context::new());
        assert_eq!(html, "ab");
    }

    #[test]
    fn test_render_unterminated_placeholder_is_literal() {
        let html = template("start {{ broken").render(&Context::new());
        assert_eq!(html, "start {{ broken");
    }

    #[test]
    fn test_render_repeated_placeholder() {
        let mut ctx = Context::new();
        ctx.insert("static", "/example/");
        let html = template("{{ static }}a.js {{ static }}b.css").render(&ctx);
        assert_eq!(html, "/example/a.js /example/b.css");
    }

    #[test]
    fn test_unsafe_names_rejected() {
        assert!(!is_safe_name(""));
        assert!(!is_safe_name("/etc/passwd"));
        assert!(!is_safe_name("../outside.html"));
        assert!(!is_safe_name("sub/../../outside.html"));
        assert!(is_safe_name("index.html"));
        assert!(is_safe_name("pages/index.html"));
    }

    #[tokio::test]
    async fn test_resolve_and_render() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "hello {{ token }}").unwrap();

        let loader = TemplateLoader::new(dir.path());
        let tpl = loader.resolve("index.html").await.unwrap();
        assert_eq!(tpl.name(), "index.html");

        let mut ctx = Context::new();
        ctx.insert("token", "t0k");
        assert_eq!(tpl.render(&ctx), "hello t0k");
    }

    #[tokio::test]
    async fn test_resolve_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let loader = TemplateLoader::new(dir.path());
        match loader.resolve("index.html").await {
            Err(TemplateError::NotFound(name)) => assert_eq!(name, "index.html"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_traversal_is_blocked() {
        let outer = tempfile::tempdir().unwrap();
        std::fs::write(outer.path().join("secret.html"), "leaked").unwrap();
        let inner = outer.path().join("templates");
        std::fs::create_dir(&inner).unwrap();

        let loader = TemplateLoader::new(&inner);
        assert!(matches!(
            loader.resolve("../secret.html").await,
            Err(TemplateError::NotFound(_))
        ));
    }
}
