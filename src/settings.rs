//! Application settings
//!
//! The immutable per-process settings the page handler renders into the
//! template: base URL, page URL, and the access token. Constructed once at
//! startup and injected through `AppState`; nothing mutates it afterwards.

use rand::RngCore;

/// Token length in bytes before hex encoding (48 hex chars on the wire)
const TOKEN_BYTES: usize = 24;

/// Immutable request-visible settings
#[derive(Debug, Clone)]
pub struct Settings {
    base_url: String,
    page_url: String,
    token: Option<String>,
}

impl Settings {
    pub fn new(
        base_url: impl Into<String>,
        page_url: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        let page_url: String = page_url.into();
        Self {
            base_url: base_url.into(),
            page_url: page_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    /// The path the application is mounted under, e.g. `/`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The page's own path, e.g. `/example`
    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    /// The access token, if one is configured or was generated at startup
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// URL prefix for build assets; templates append the asset name
    pub fn static_prefix(&self) -> String {
        format!("{}/", self.page_url)
    }

    /// Ready-to-open page link for the startup banner
    pub fn page_link(&self, host: &str, port: u16) -> String {
        match &self.token {
            Some(token) => format!("http://{host}:{port}{}?token={token}", self.page_url),
            None => format!("http://{host}:{port}{}", self.page_url),
        }
    }
}

/// Generate a fresh access token from the OS RNG
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_prefix_ends_with_slash() {
        let settings = Settings::new("/", "/example", None);
        assert_eq!(settings.static_prefix(), "/example/");
    }

    #[test]
    fn test_page_url_trailing_slash_normalized() {
        let settings = Settings::new("/", "/example/", None);
        assert_eq!(settings.page_url(), "/example");
    }

    #[test]
    fn test_empty_token_treated_as_absent() {
        let settings = Settings::new("/", "/example", Some(String::new()));
        assert_eq!(settings.token(), None);
    }

    #[test]
    fn test_page_link_carries_token() {
        let settings = Settings::new("/", "/example", Some("abc".to_string()));
        assert_eq!(
            settings.page_link("127.0.0.1", 8888),
            "http://127.0.0.1:8888/example?token=abc"
        );
    }

    #[test]
    fn test_generate_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token());
    }
}
