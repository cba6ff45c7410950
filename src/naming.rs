//! Logical-name derivation: type names become kebab-case pluralized route
//! segments, snake_case pluralized table names.

/// Convert a CamelCase identifier to kebab-case.
/// e.g. "OrderItem" -> "order-item", "Category" -> "category"
pub fn to_kebab_case(s: &str) -> String {
    delimited_lowercase(s, '-')
}

/// Convert a CamelCase identifier to snake_case.
/// e.g. "OrderItem" -> "order_item", "createdAt" -> "created_at"
pub fn to_snake_case(s: &str) -> String {
    delimited_lowercase(s, '_')
}

fn delimited_lowercase(s: &str, sep: char) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push(sep);
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Pluralize an English noun: consonant+y -> ies; s/x/z/ch/sh -> es; else +s.
pub fn pluralize(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    let lower = s.to_ascii_lowercase();
    if let Some(stem) = s.strip_suffix('y') {
        let before_y = stem.chars().last();
        if before_y.map(|c| !is_vowel(c)).unwrap_or(false) {
            return format!("{}ies", stem);
        }
    }
    if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{}es", s);
    }
    format!("{}s", s)
}

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Last `::` segment of a (possibly fully qualified) type name.
fn bare_type_name(type_name: &str) -> &str {
    type_name.rsplit("::").next().unwrap_or(type_name)
}

/// Default logical name for a type: kebab-case pluralized.
/// e.g. "Category" -> "categories", "shop::OrderItem" -> "order-items"
pub fn logical_name(type_name: &str) -> String {
    pluralize(&to_kebab_case(bare_type_name(type_name)))
}

/// Default table name for a type: snake_case pluralized.
/// e.g. "OrderItem" -> "order_items"
pub fn table_name(type_name: &str) -> String {
    pluralize(&to_snake_case(bare_type_name(type_name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_and_snake() {
        assert_eq!(to_kebab_case("OrderItem"), "order-item");
        assert_eq!(to_snake_case("OrderItem"), "order_item");
        assert_eq!(to_kebab_case("Category"), "category");
        assert_eq!(to_snake_case("createdAt"), "created_at");
    }

    #[test]
    fn pluralization_rules() {
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("bus"), "buses");
        assert_eq!(pluralize("branch"), "branches");
        assert_eq!(pluralize("dish"), "dishes");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("page"), "pages");
    }

    #[test]
    fn derived_names() {
        assert_eq!(logical_name("Category"), "categories");
        assert_eq!(logical_name("OrderItem"), "order-items");
        assert_eq!(logical_name("shop::models::OrderItem"), "order-items");
        assert_eq!(table_name("OrderItem"), "order_items");
        assert_eq!(table_name("Category"), "categories");
    }
}
