use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Fields every create request must carry, in the order they are reported when missing.
pub const REQUIRED_FIELDS: [&str; 5] = ["title", "description", "price", "image", "stock"];

/// A single field value. Products are schema-less, so a value is whatever JSON
/// scalar the client sent; numbers keep their integer/float representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl FieldValue {
    /// Filter semantics: case-insensitive substring for text, numeric equality
    /// for numbers when the filter parses as one, no match otherwise.
    pub fn matches_filter(&self, filter: &str) -> bool {
        match self {
            FieldValue::Text(text) => text.to_lowercase().contains(&filter.to_lowercase()),
            FieldValue::Number(n) => match (n.as_f64(), parse_number(filter)) {
                (Some(value), Some(expected)) => value == expected,
                _ => false,
            },
            FieldValue::Null | FieldValue::Bool(_) => false,
        }
    }

    fn as_integer(&self) -> Option<u64> {
        match self {
            FieldValue::Text(text) => leading_integer(text),
            FieldValue::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f.trunc() as u64)
            }),
            FieldValue::Null | FieldValue::Bool(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Reads the leading run of ASCII digits, skipping leading whitespace ("07" → 7, "12abc" → 12).
/// A run too long for `u64` saturates to `u64::MAX`.
fn leading_integer(raw: &str) -> Option<u64> {
    let digits = raw.trim_start().as_bytes();
    let run = digits.iter().take_while(|b| b.is_ascii_digit()).count();
    if run == 0 {
        return None;
    }
    Some(digits[..run].iter().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    }))
}

/// Request payload for create/update: field name → value, in the order the client sent them.
pub type ProductFields = IndexMap<String, FieldValue>;

/// Core product entity: an open record keyed by a string `id`.
/// Field order is preserved so the backing file round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Product(IndexMap<String, FieldValue>);

impl Product {
    /// Builds a new record with `id` first, followed by `fields`.
    /// A client-supplied `id` is dropped in favour of the allocated one.
    pub fn with_id(id: String, fields: ProductFields) -> Self {
        let mut record = IndexMap::with_capacity(fields.len() + 1);
        record.insert("id".to_string(), FieldValue::Text(id));
        record.extend(fields.into_iter().filter(|(key, _)| key != "id"));
        Self(record)
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    /// The `id` field, when it is stored as text.
    pub fn id(&self) -> Option<&str> {
        match self.0.get("id") {
            Some(FieldValue::Text(id)) => Some(id),
            _ => None,
        }
    }

    /// Strict string equality on `id`.
    pub fn has_id(&self, id: &str) -> bool {
        self.id() == Some(id)
    }

    /// Shallow merge: supplied fields overwrite, everything else is retained.
    /// Existing keys keep their position; new keys are appended.
    pub fn merge(&mut self, fields: ProductFields) {
        for (key, value) in fields {
            self.0.insert(key, value);
        }
    }

    /// True when every filter matches (AND semantics). A missing field never matches.
    pub fn matches(&self, filters: &ProductFilters) -> bool {
        filters.iter().all(|(field, expected)| {
            self.0
                .get(field)
                .is_some_and(|value| value.matches_filter(expected))
        })
    }
}

impl From<ProductFields> for Product {
    fn from(fields: ProductFields) -> Self {
        Self(fields)
    }
}

/// Names of required fields absent from `fields`, in canonical order.
pub fn missing_required_fields(fields: &ProductFields) -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .filter(|field| !fields.contains_key(**field))
        .map(|field| field.to_string())
        .collect()
}

/// Next id: highest integer-parsable existing id plus one, zero-padded to two digits.
/// `None` once an existing id has reached `u64::MAX`.
pub fn next_id(products: &[Product]) -> Option<String> {
    let max = products
        .iter()
        .filter_map(|p| p.get("id").and_then(FieldValue::as_integer))
        .max()
        .unwrap_or(0);
    max.checked_add(1).map(|next| format!("{:02}", next))
}

// ── Query parameters ──────────────────────────────────────────────────────────

/// Query-string filters: field name → expected value, applied conjunctively.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ProductFilters(IndexMap<String, String>);

impl ProductFilters {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ProductFilters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
