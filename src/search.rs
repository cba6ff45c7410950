//! Search request parsing and the listing response envelope.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Upper bound for parsed page/pageSize and derived offsets: the largest
/// value PostgreSQL accepts for LIMIT/OFFSET (bigint). Values past it are
/// absurd rather than malformed, so they clamp instead of erroring, same as
/// the leniency rule for unparsable numerics.
const MAX_PAGE_VALUE: u64 = i64::MAX as u64;

/// One listing call's parameters, parsed from the query string.
/// Malformed or non-positive numerics fall back to defaults rather than
/// rejecting the request.
#[derive(Clone, Debug)]
pub struct ListParams {
    pub page: u64,
    pub page_size: u64,
    pub keyword: String,
}

impl Default for ListParams {
    fn default() -> Self {
        ListParams {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            keyword: String::new(),
        }
    }
}

impl ListParams {
    /// Parse `page`, `pageSize`, `search` from raw query parameters.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let page = params
            .get("page")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_PAGE)
            .min(MAX_PAGE_VALUE);
        let page_size = params
            .get("pageSize")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_VALUE);
        let keyword = params.get("search").cloned().unwrap_or_default();
        ListParams {
            page,
            page_size,
            keyword,
        }
    }

    /// Saturating: absurdly large page/pageSize degrade to an empty page past
    /// the data instead of overflowing.
    pub fn offset(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.page_size)
            .min(MAX_PAGE_VALUE)
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

/// Wire envelope for one listing response.
/// `pages` is 0 when pagination reporting is disabled for the resource.
/// `current` is page * pageSize capped at total; downstream UIs depend on
/// this exact arithmetic, so it is not a "last row index".
#[derive(Serialize, Debug)]
pub struct ListEnvelope {
    pub data: Vec<Value>,
    pub total: i64,
    pub pages: i64,
    pub current: i64,
}

impl ListEnvelope {
    pub fn assemble(data: Vec<Value>, total: i64, params: &ListParams, paging: bool) -> Self {
        let page_size = i64::try_from(params.page_size).unwrap_or(i64::MAX);
        let pages = if paging && page_size > 0 && total > 0 {
            total / page_size + i64::from(total % page_size != 0)
        } else {
            0
        };
        let current = i64::try_from(params.page.saturating_mul(params.page_size))
            .unwrap_or(i64::MAX)
            .min(total);
        ListEnvelope {
            data,
            total,
            pages,
            current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_when_absent() {
        let p = ListParams::from_query(&query(&[]));
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 20);
        assert_eq!(p.keyword, "");
    }

    #[test]
    fn malformed_and_nonpositive_normalize() {
        let p = ListParams::from_query(&query(&[("page", "abc"), ("pageSize", "0")]));
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 20);
        let p = ListParams::from_query(&query(&[("page", "-3"), ("pageSize", "-1")]));
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 20);
    }

    #[test]
    fn explicit_values_and_offset() {
        let p = ListParams::from_query(&query(&[("page", "2"), ("pageSize", "3"), ("search", "bob")]));
        assert_eq!(p.page, 2);
        assert_eq!(p.page_size, 3);
        assert_eq!(p.keyword, "bob");
        assert_eq!(p.offset(), 3);
        assert_eq!(p.limit(), 3);
    }

    #[test]
    fn envelope_page_count_is_ceiling() {
        let p = ListParams {
            page: 1,
            page_size: 3,
            keyword: String::new(),
        };
        let e = ListEnvelope::assemble(vec![], 5, &p, true);
        assert_eq!(e.pages, 2);
        let e = ListEnvelope::assemble(vec![], 6, &p, true);
        assert_eq!(e.pages, 2);
        let e = ListEnvelope::assemble(vec![], 7, &p, true);
        assert_eq!(e.pages, 3);
    }

    #[test]
    fn envelope_pages_zero_when_paging_disabled() {
        let e = ListEnvelope::assemble(vec![], 5, &ListParams::default(), false);
        assert_eq!(e.pages, 0);
    }

    #[test]
    fn current_is_capped_at_total() {
        let p = ListParams {
            page: 2,
            page_size: 3,
            keyword: String::new(),
        };
        let e = ListEnvelope::assemble(vec![], 5, &p, true);
        assert_eq!(e.current, 5);
        let p = ListParams {
            page: 1,
            page_size: 3,
            keyword: String::new(),
        };
        let e = ListEnvelope::assemble(vec![], 5, &p, true);
        assert_eq!(e.current, 3);
    }

    #[test]
    fn huge_page_values_saturate_instead_of_overflowing() {
        let p = ListParams::from_query(&query(&[
            ("page", "18446744073709551615"),
            ("pageSize", "20"),
        ]));
        assert_eq!(p.page, i64::MAX as u64);
        assert_eq!(p.offset(), i64::MAX as u64);
        let e = ListEnvelope::assemble(vec![], 5, &p, true);
        assert_eq!(e.current, 5);
        assert_eq!(e.pages, 1);

        let p = ListParams::from_query(&query(&[
            ("page", "18446744073709551615"),
            ("pageSize", "18446744073709551615"),
        ]));
        assert_eq!(p.offset(), i64::MAX as u64);
        let e = ListEnvelope::assemble(vec![], 5, &p, true);
        assert_eq!(e.current, 5);
        assert_eq!(e.pages, 1);
    }

    #[test]
    fn envelope_serializes_wire_fields() {
        let e = ListEnvelope::assemble(vec![serde_json::json!({"id": 1})], 1, &ListParams::default(), true);
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["total"], 1);
        assert_eq!(v["pages"], 1);
        assert_eq!(v["current"], 1);
        assert_eq!(v["data"][0]["id"], 1);
    }
}
