//! Search results
//!
//! Rows arrive as flat JSON objects whose field set depends on the resource
//! type. They are kept as ordered (name, display value) pairs.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// One result row: field names with their display strings, in wire order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    fields: Vec<(String, String)>,
}

impl SearchResult {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        Self {
            fields: object
                .iter()
                .map(|(k, v)| (k.clone(), display_value(v)))
                .collect(),
        }
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Display form of a JSON value
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Results of the most recent search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResultSet {
    /// Nothing searched yet, or cleared by a new dispatch
    #[default]
    NotSearched,
    /// The backend explicitly reported no matches (`"results": null`)
    NoMatches,
    /// Rows in the order received (possibly empty)
    Rows(Vec<SearchResult>),
}

impl ResultSet {
    pub fn rows(&self) -> &[SearchResult] {
        match self {
            Self::Rows(rows) => rows,
            _ => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponseBody {
    #[serde(deserialize_with = "present_or_null")]
    results: Option<Vec<Map<String, Value>>>,
}

/// `null` is accepted, but the key itself is required
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// Parse a search response body.
///
/// `results` must be present and hold an array of objects or `null`.
pub fn parse_results(body: &str) -> serde_json::Result<ResultSet> {
    let body: SearchResponseBody = serde_json::from_str(body)?;
    Ok(match body.results {
        Some(rows) => ResultSet::Rows(rows.iter().map(SearchResult::from_json_object).collect()),
        None => ResultSet::NoMatches,
    })
}
