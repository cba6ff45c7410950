//! HTTP handlers for the listing endpoints.

pub mod listing;
pub use listing::*;
