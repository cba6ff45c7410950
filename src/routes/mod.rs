//! Route construction: listing endpoints plus common service routes.

pub mod common;
pub mod listing;
pub use common::*;
pub use listing::*;
