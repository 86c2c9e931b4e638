//! Request routing
//!
//! The route table: ordered pattern → target entries, built once at startup
//! and immutable for the process lifetime.

mod table;

pub use table::{RouteEntry, RoutePattern, RouteTable, RouteTarget};
