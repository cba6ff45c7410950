//! Generic paginated fetch against PostgreSQL.

use crate::dialect::Dialect;
use crate::error::AppError;
use crate::registry::Resource;
use crate::search::{ListEnvelope, ListParams};
use crate::sql::{count_query, select_query, PgBindValue};
use serde_json::Value;
use sqlx::PgPool;

pub struct ListingService;

impl ListingService {
    /// Run one listing call: count over the filtered set first, then the
    /// paginated fetch with the same filter. The two reads share no
    /// transaction; read skew under concurrent writes is accepted.
    pub async fn search(
        pool: &PgPool,
        dialect: &dyn Dialect,
        resource: &Resource,
        params: &ListParams,
    ) -> Result<ListEnvelope, AppError> {
        let count = count_query(resource, dialect, &params.keyword);
        tracing::debug!(sql = %count.sql, params = ?count.params, "count");
        let mut cq = sqlx::query_scalar::<_, i64>(&count.sql);
        for p in &count.params {
            cq = cq.bind(PgBindValue::from_json(p));
        }
        let total = cq.fetch_one(pool).await?;

        let fetch = select_query(resource, dialect, params);
        tracing::debug!(sql = %fetch.sql, params = ?fetch.params, "fetch");
        let mut q = sqlx::query(&fetch.sql);
        for p in &fetch.params {
            q = q.bind(PgBindValue::from_json(p));
        }
        let rows = q.fetch_all(pool).await?;
        let data = rows.iter().map(row_to_json).collect();
        Ok(ListEnvelope::assemble(data, total, params, resource.paging))
    }
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        let v = cell_to_value(row, name);
        map.insert(name.to_string(), v);
    }
    Value::Object(map)
}

fn cell_to_value(row: &sqlx::postgres::PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(u)) = row.try_get::<Option<uuid::Uuid>, _>(name) {
        return Value::String(u.to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<serde_json::Value>, _>(name) {
        return j;
    }
    Value::Null
}
