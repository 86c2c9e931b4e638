//! HTTP protocol layer
//!
//! Protocol-level building blocks shared by the page and asset handlers:
//! response builders, MIME lookup, ETag handling, and Range parsing.
//! Nothing in here knows about routes or application state.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

pub use range::parse_range_header;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_416_response, build_500_response, build_options_response, build_redirect_response,
};
