//! ListingService: count-then-fetch engine. ContainerService: fractional
//! ordering of page-builder containers.

mod listing;
mod ordering;
pub use listing::ListingService;
pub use ordering::{moved_key, Container, ContainerService, MoveDirection, ORDER_STEP};
