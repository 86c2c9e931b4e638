//! Route table types and resolution
//!
//! Patterns come in two shapes, mirroring the application's original route
//! pair (a literal page path and a wildcard beneath it): `Exact` matches the
//! whole path, `Prefix` matches any path beneath it. Resolution consults
//! every `Exact` entry before any `Prefix` entry, so the literal-vs-wildcard
//! outcome never depends on registration order; within a shape, first match
//! wins.

use std::path::{Path, PathBuf};

/// Path-matching rule for a route entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePattern {
    /// Matches the request path exactly
    Exact(String),
    /// Matches any request path starting with this prefix
    Prefix(String),
}

impl RoutePattern {
    /// Check whether a request path satisfies this pattern
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(p) => path == p,
            Self::Prefix(p) => path.starts_with(p.as_str()),
        }
    }

    const fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }
}

/// What a matched route dispatches to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    /// The rendered application page
    Page,
    /// Files served verbatim from a build directory
    Assets { dir: PathBuf },
    /// HTTP 302 to another path
    Redirect { target: String },
}

/// One entry in the route table
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pattern: RoutePattern,
    target: RouteTarget,
}

impl RouteEntry {
    pub const fn new(pattern: RoutePattern, target: RouteTarget) -> Self {
        Self { pattern, target }
    }

    pub const fn target(&self) -> &RouteTarget {
        &self.target
    }

    /// The prefix the asset handler strips from the request path
    ///
    /// Exact entries strip nothing; they do not carry a sub-path.
    pub fn strip_prefix(&self) -> &str {
        match &self.pattern {
            RoutePattern::Exact(_) => "",
            RoutePattern::Prefix(p) => p,
        }
    }
}

/// Ordered route table, immutable after startup
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub const fn new(entries: Vec<RouteEntry>) -> Self {
        Self { entries }
    }

    /// The standard table for an application mounted at `page_url`
    ///
    /// - `page_url` and `page_url/` render the page (the original route
    ///   accepts the trailing slash)
    /// - anything else under `page_url/` is a build-directory asset
    /// - `/` redirects to `page_url` (the `default_url` behavior)
    pub fn for_app(page_url: &str, build_dir: &Path) -> Self {
        let page_url = page_url.trim_end_matches('/');
        let mut entries = vec![
            RouteEntry::new(RoutePattern::Exact(page_url.to_string()), RouteTarget::Page),
            RouteEntry::new(
                RoutePattern::Exact(format!("{page_url}/")),
                RouteTarget::Page,
            ),
            RouteEntry::new(
                RoutePattern::Prefix(format!("{page_url}/")),
                RouteTarget::Assets {
                    dir: build_dir.to_path_buf(),
                },
            ),
        ];
        if page_url != "/" && !page_url.is_empty() {
            entries.push(RouteEntry::new(
                RoutePattern::Exact("/".to_string()),
                RouteTarget::Redirect {
                    target: page_url.to_string(),
                },
            ));
        }
        Self::new(entries)
    }

    /// Find the entry serving a request path
    ///
    /// Exact entries win over prefix entries regardless of their position
    /// in the table; ties within a shape go to the earlier registration.
    pub fn resolve(&self, path: &str) -> Option<&RouteEntry> {
        self.entries
            .iter()
            .find(|e| e.pattern.is_exact() && e.pattern.matches(path))
            .or_else(|| self.entries.iter().find(|e| e.pattern.matches(path)))
    }
}
