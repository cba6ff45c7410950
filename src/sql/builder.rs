//! Builds the count and fetch queries for one listing call.

use crate::dialect::{quoted, Dialect};
use crate::registry::{Resource, SearchSpec};
use crate::search::ListParams;
use serde_json::Value;

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// WHERE assembly shared by count and fetch: static conditions verbatim,
/// then the search predicate bound as a parameter (wrapped `%term%` for
/// contains-style specs, as-is for exact match). Empty keyword or
/// SearchSpec::None adds no predicate.
fn push_where(q: &mut QueryBuf, resource: &Resource, dialect: &dyn Dialect, keyword: &str) {
    let mut parts: Vec<String> = resource.conditions.clone();
    if !keyword.is_empty() {
        match &resource.search {
            SearchSpec::None => {}
            SearchSpec::Template(t) => {
                let n = q.push_param(Value::String(format!("%{}%", keyword)));
                parts.push(t.replacen('?', &dialect.placeholder(n), 1));
            }
            SearchSpec::Column(c) => {
                let n = q.push_param(Value::String(format!("%{}%", keyword)));
                parts.push(dialect.contains(c, n));
            }
            SearchSpec::Exact(c) => {
                let n = q.push_param(Value::String(keyword.to_string()));
                parts.push(dialect.exact(c, n));
            }
        }
    }
    if !parts.is_empty() {
        q.sql.push_str(" WHERE ");
        q.sql.push_str(&parts.join(" AND "));
    }
}

/// Total over the filtered set: same filter as the fetch, no limit/offset.
pub fn count_query(resource: &Resource, dialect: &dyn Dialect, keyword: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {}",
        dialect.count_expr(),
        quoted(&resource.table)
    );
    push_where(&mut q, resource, dialect, keyword);
    q
}

/// Paginated fetch: projection restricted to the descriptor's allowed
/// columns, optional verbatim ORDER BY, LIMIT = pageSize,
/// OFFSET = (page - 1) * pageSize.
pub fn select_query(resource: &Resource, dialect: &dyn Dialect, params: &ListParams) -> QueryBuf {
    let mut q = QueryBuf::new();
    let cols = resource
        .columns
        .iter()
        .map(|c| quoted(c))
        .collect::<Vec<_>>()
        .join(", ");
    q.sql = format!("SELECT {} FROM {}", cols, quoted(&resource.table));
    push_where(&mut q, resource, dialect, &params.keyword);
    if let Some(order) = &resource.order_by {
        q.sql.push_str(" ORDER BY ");
        q.sql.push_str(order);
    }
    q.sql
        .push_str(&dialect.limit_offset(params.limit(), params.offset()));
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::PostgresDialect;
    use crate::registry::Resource;

    fn categories() -> Resource {
        Resource::new("Category").columns(["id", "name"])
    }

    fn params(page: u64, page_size: u64, keyword: &str) -> ListParams {
        ListParams {
            page,
            page_size,
            keyword: keyword.into(),
        }
    }

    #[test]
    fn select_without_filters() {
        let q = select_query(&categories(), &PostgresDialect, &params(1, 20, ""));
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"name\" FROM \"categories\" LIMIT 20 OFFSET 0"
        );
        assert!(q.params.is_empty());
    }

    #[test]
    fn select_second_page_offset() {
        let q = select_query(&categories(), &PostgresDialect, &params(2, 3, ""));
        assert!(q.sql.ends_with(" LIMIT 3 OFFSET 3"));
    }

    #[test]
    fn search_template_binds_wildcarded_term() {
        let r = categories().search_template("name ILIKE ?");
        let q = select_query(&r, &PostgresDialect, &params(1, 20, "bob"));
        assert!(q.sql.contains(" WHERE name ILIKE $1"));
        assert_eq!(q.params, vec![serde_json::json!("%bob%")]);
    }

    #[test]
    fn search_column_uses_dialect_contains() {
        let r = categories().search_column("name");
        let q = select_query(&r, &PostgresDialect, &params(1, 20, "bob"));
        assert!(q.sql.contains(" WHERE \"name\" ILIKE $1"));
        assert_eq!(q.params, vec![serde_json::json!("%bob%")]);
    }

    #[test]
    fn search_exact_binds_term_without_wildcards() {
        let r = categories().search_exact("name");
        let q = select_query(&r, &PostgresDialect, &params(1, 20, "Books"));
        assert!(q.sql.contains(" WHERE \"name\" = $1"));
        assert_eq!(q.params, vec![serde_json::json!("Books")]);
    }

    #[test]
    fn empty_keyword_adds_no_predicate() {
        let r = categories().search_template("name ILIKE ?");
        let q = select_query(&r, &PostgresDialect, &params(1, 20, ""));
        assert!(!q.sql.contains("WHERE"));
        assert!(q.params.is_empty());
    }

    #[test]
    fn static_conditions_are_anded_with_search() {
        let r = categories()
            .condition("deleted_at IS NULL")
            .search_column("name");
        let q = select_query(&r, &PostgresDialect, &params(1, 20, "x"));
        assert!(q
            .sql
            .contains(" WHERE deleted_at IS NULL AND \"name\" ILIKE $1"));
    }

    #[test]
    fn order_clause_applied_verbatim() {
        let r = categories().order_by("id desc");
        let q = select_query(&r, &PostgresDialect, &params(1, 20, ""));
        assert!(q.sql.contains(" ORDER BY id desc LIMIT 20 OFFSET 0"));
    }

    #[test]
    fn count_ignores_pagination_and_order() {
        let r = categories().order_by("id desc").search_column("name");
        let q = count_query(&r, &PostgresDialect, "bob");
        assert_eq!(
            q.sql,
            "SELECT COUNT(*) FROM \"categories\" WHERE \"name\" ILIKE $1"
        );
        assert_eq!(q.params.len(), 1);
    }
}
