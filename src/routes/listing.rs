//! Listing routes: a single parameterized GET route; handlers resolve the
//! resource by its logical name. Only GET is bound.

use crate::handlers::listing::list;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn listing_routes(state: AppState) -> Router {
    Router::new().route("/:resource", get(list)).with_state(state)
}
