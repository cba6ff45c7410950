//! Storage capability interface: the small set of SQL fragments that differ
//! per backend (placeholder syntax, case-insensitive match). Selected at
//! registry construction, not per request.

/// Quote identifier (safe: identifiers come from registration, not requests).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub trait Dialect: Send + Sync {
    /// Positional bind placeholder for the n-th parameter (1-based).
    fn placeholder(&self, n: usize) -> String;

    /// `column = $n` exact-match predicate.
    fn exact(&self, column: &str, n: usize) -> String {
        format!("{} = {}", quoted(column), self.placeholder(n))
    }

    /// Case-insensitive contains predicate; the bound value carries the
    /// wildcard markers.
    fn contains(&self, column: &str, n: usize) -> String;

    /// LIMIT/OFFSET clause.
    fn limit_offset(&self, limit: u64, offset: u64) -> String {
        format!(" LIMIT {} OFFSET {}", limit, offset)
    }

    /// Count expression for the total query.
    fn count_expr(&self) -> &'static str {
        "COUNT(*)"
    }
}

/// PostgreSQL: `$n` placeholders, ILIKE for case-insensitive match.
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn placeholder(&self, n: usize) -> String {
        format!("${}", n)
    }

    fn contains(&self, column: &str, n: usize) -> String {
        format!("{} ILIKE {}", quoted(column), self.placeholder(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_fragments() {
        let d = PostgresDialect;
        assert_eq!(d.placeholder(3), "$3");
        assert_eq!(d.exact("id", 1), "\"id\" = $1");
        assert_eq!(d.contains("name", 2), "\"name\" ILIKE $2");
        assert_eq!(d.limit_offset(20, 40), " LIMIT 20 OFFSET 40");
    }
}
