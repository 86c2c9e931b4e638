//! Render context: the named values substituted into a template.

use std::collections::HashMap;

/// String key/value map handed to [`Template::render`](super::Template::render)
#[derive(Debug, Default, Clone)]
pub struct Context {
    values: HashMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a context value, replacing any previous value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Look up a context value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut ctx = Context::new();
        ctx.insert("token", "abc123");
        assert_eq!(ctx.get("token"), Some("abc123"));
        assert_eq!(ctx.get("missing"), None);
    }

    #[test]
    fn test_insert_replaces() {
        let mut ctx = Context::new();
        ctx.insert("base_url", "/");
        ctx.insert("base_url", "/lab/");
        assert_eq!(ctx.get("base_url"), Some("/lab/"));
    }
}
