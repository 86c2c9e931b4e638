//! Request handler module
//!
//! Dispatch pipeline plus the two application handlers: the rendered page
//! and the build-directory assets.

pub mod page;
pub mod router;
pub mod static_files;

pub use router::handle_request;
