//! Page template support
//!
//! A filesystem-backed template loader rooted at a single directory, plus a
//! minimal substitution renderer. The application page needs exactly three
//! context values (`static`, `base_url`, `token`), so the renderer handles
//! `{{ name }}` placeholders and nothing more.

mod context;
mod loader;

pub use context::Context;
pub use loader::{Template, TemplateError, TemplateLoader};
