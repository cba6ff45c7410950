//! Listing SDK: registry-driven paginated listing backend.
//!
//! Register resource descriptors (logical name, table, allowed columns,
//! search predicate, order), mount them as GET JSON endpoints, and reorder
//! page-builder containers with fractional sort keys.

pub mod dialect;
pub mod error;
pub mod handlers;
pub mod naming;
pub mod registry;
pub mod routes;
pub mod search;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use dialect::{Dialect, PostgresDialect};
pub use error::{AppError, ConfigError};
pub use registry::{ListingConfig, Registry, Resource, SearchSpec};
pub use routes::{common_routes, common_routes_with_ready};
pub use search::{ListEnvelope, ListParams, DEFAULT_PAGE_SIZE};
pub use service::{Container, ContainerService, ListingService};
pub use state::AppState;
pub use store::{ensure_container_table, ensure_database_exists};
