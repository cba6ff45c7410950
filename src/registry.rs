//! Resource descriptors and the registry that binds them to routes.
//!
//! `register` only appends; all validation (unique logical names, sane
//! search templates) happens at `mount`, which is a startup-time step. A
//! duplicate name is a configuration error, never a runtime condition.

use crate::dialect::{Dialect, PostgresDialect};
use crate::error::ConfigError;
use crate::naming;
use crate::routes::listing_routes;
use crate::state::AppState;
use axum::Router;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// How a free-text search term is turned into a predicate.
#[derive(Clone, Debug)]
pub enum SearchSpec {
    /// No search support; the `search` parameter is ignored.
    None,
    /// Verbatim SQL fragment with exactly one `?` placeholder, e.g.
    /// `"name ILIKE ? OR code ILIKE ?"` is rejected; `"name ILIKE ?"` is not.
    /// The term is wrapped `%term%` and bound where the placeholder sits.
    Template(String),
    /// Single column matched case-insensitively via the dialect.
    Column(String),
    /// Single column matched exactly; the term is bound as-is, no wildcards.
    Exact(String),
}

/// Registered binding of a logical name to a table, its queryable columns,
/// and its filter/order defaults. Immutable after mount.
#[derive(Clone, Debug)]
pub struct Resource {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub search: SearchSpec,
    /// Static WHERE fragments, ANDed in. Trusted registration-time input.
    pub conditions: Vec<String>,
    /// Verbatim ORDER BY expression, e.g. "id desc". Trusted.
    pub order_by: Option<String>,
    /// When false, `pages` is reported as 0 in every envelope.
    pub paging: bool,
}

impl Resource {
    /// Descriptor for a type name: logical name and table derived by
    /// pluralization ("OrderItem" -> "order-items" / "order_items").
    pub fn new(type_name: &str) -> Self {
        Resource {
            name: naming::logical_name(type_name),
            table: naming::table_name(type_name),
            columns: Vec::new(),
            search: SearchSpec::None,
            conditions: Vec::new(),
            order_by: None,
            paging: true,
        }
    }

    /// Override the derived logical name (and thus the route segment).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Override the derived table name.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Allowed columns: the projection boundary. Only these are selected.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Search predicate template with one `?` placeholder.
    pub fn search_template(mut self, template: impl Into<String>) -> Self {
        self.search = SearchSpec::Template(template.into());
        self
    }

    /// Search a single column case-insensitively.
    pub fn search_column(mut self, column: impl Into<String>) -> Self {
        self.search = SearchSpec::Column(column.into());
        self
    }

    /// Search a single column by exact match (codes, SKUs, enum values).
    pub fn search_exact(mut self, column: impl Into<String>) -> Self {
        self.search = SearchSpec::Exact(column.into());
        self
    }

    /// Add a static SQL condition, e.g. `"deleted_at IS NULL"`.
    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    /// Set the ORDER BY expression applied to every fetch.
    pub fn order_by(mut self, order: impl Into<String>) -> Self {
        self.order_by = Some(order.into());
        self
    }

    /// Enable or disable page-count reporting (default enabled).
    pub fn paging(mut self, enabled: bool) -> Self {
        self.paging = enabled;
        self
    }
}

/// Explicit configuration for the registry; no ambient globals.
pub struct ListingConfig {
    /// Route prefix the listing endpoints are nested under.
    pub prefix: String,
    /// When true, permissive CORS headers are set on every response.
    pub cors: bool,
}

impl Default for ListingConfig {
    fn default() -> Self {
        ListingConfig {
            prefix: "/api/v1".into(),
            cors: false,
        }
    }
}

/// Descriptors resolved and validated at mount time; shared with handlers.
pub struct MountedResources {
    by_name: HashMap<String, Resource>,
    pub dialect: Arc<dyn Dialect>,
}

impl MountedResources {
    pub fn by_name(&self, name: &str) -> Option<&Resource> {
        self.by_name.get(name)
    }
}

pub struct Registry {
    config: ListingConfig,
    dialect: Arc<dyn Dialect>,
    resources: Vec<Resource>,
}

impl Registry {
    pub fn new(config: ListingConfig) -> Self {
        Registry {
            config,
            dialect: Arc::new(PostgresDialect),
            resources: Vec::new(),
        }
    }

    /// Select a non-default storage dialect.
    pub fn with_dialect(mut self, dialect: Arc<dyn Dialect>) -> Self {
        self.dialect = dialect;
        self
    }

    /// Append a descriptor. Duplicates are detected at mount, not here.
    pub fn register(&mut self, resource: Resource) -> &mut Self {
        self.resources.push(resource);
        self
    }

    /// Mount-time validation, pool-free: unique logical names, non-empty
    /// column lists, sane search templates. Returns the by-name lookup the
    /// handlers use.
    fn resolve(&self) -> Result<HashMap<String, Resource>, ConfigError> {
        let mut by_name: HashMap<String, Resource> = HashMap::new();
        for r in &self.resources {
            if r.columns.is_empty() {
                return Err(ConfigError::EmptyColumns(r.name.clone()));
            }
            if let SearchSpec::Template(t) = &r.search {
                if t.matches('?').count() != 1 {
                    return Err(ConfigError::BadSearchTemplate {
                        resource: r.name.clone(),
                        template: t.clone(),
                    });
                }
            }
            if by_name.insert(r.name.clone(), r.clone()).is_some() {
                return Err(ConfigError::DuplicateResource(r.name.clone()));
            }
        }
        Ok(by_name)
    }

    /// Validate all descriptors and bind a GET listing route per resource at
    /// `{prefix}/{logicalName}`. Mounting again re-derives the same bindings.
    pub fn mount(&self, pool: PgPool) -> Result<Router, ConfigError> {
        let by_name = self.resolve()?;
        let mounted = MountedResources {
            by_name,
            dialect: Arc::clone(&self.dialect),
        };
        let state = AppState {
            pool,
            resources: Arc::new(mounted),
        };
        for r in &self.resources {
            tracing::info!(resource = %r.name, table = %r.table, "mounting listing endpoint at {}/{}", self.config.prefix, r.name);
        }
        let mut router = Router::new().nest(&self.config.prefix, listing_routes(state));
        if self.config.cors {
            router = router.layer(permissive_cors());
        }
        Ok(router)
    }
}

fn permissive_cors() -> CorsLayer {
    use axum::http::{header, Method};
    CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
