//! Search query model
//!
//! Holds the three user-editable query fields, the dispatch gate, and the
//! projection of a query onto the backend's request parameters.
//!
//! - [`codec`] - composite `type[:subtype]` selector values

pub mod codec;

pub use codec::{decode, encode, selector_choices, IdentitySubtype, ResourceKind, SelectorChoice};

/// Whether a search term may be sent to the backend.
///
/// Empty and whitespace-only terms are rejected; dispatching them is a no-op.
pub fn is_dispatchable(term: &str) -> bool {
    !term.trim().is_empty()
}

/// Current query state, mirrored into the location on every change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub resource_type: String,
    pub subtype: String,
}

impl SearchQuery {
    pub fn new(term: &str, resource_type: &str, subtype: &str) -> Self {
        Self {
            term: term.to_string(),
            resource_type: resource_type.to_string(),
            subtype: subtype.to_string(),
        }
    }

    /// Encoded selector value for the picker
    pub fn selector(&self) -> String {
        encode(&self.resource_type, &self.subtype)
    }

    /// Apply a picker selection
    pub fn set_selector(&mut self, value: &str) {
        let (resource_type, subtype) = decode(value);
        self.resource_type = resource_type;
        self.subtype = subtype;
    }

    pub fn clear_selector(&mut self) {
        self.resource_type.clear();
        self.subtype.clear();
    }

    pub fn kind(&self) -> Option<ResourceKind> {
        ResourceKind::parse(&self.resource_type)
    }

    /// Parameters for one search request.
    ///
    /// The type is sent only when recognized, the subtype only when the type
    /// takes subtypes. Anything else counts as "no filter".
    pub fn request_params(&self) -> SearchParams {
        let kind = self.kind();
        let subtype = match kind {
            Some(kind) if kind.accepts_subtypes() && !self.subtype.is_empty() => {
                Some(self.subtype.clone())
            },
            _ => None,
        };

        if kind.is_none() && !self.resource_type.is_empty() {
            tracing::debug!("Ignoring unknown resource type '{}'", self.resource_type);
        }

        SearchParams {
            resource_name: self.term.clone(),
            resource_type: kind.map(|k| k.as_str().to_string()),
            resource_subtype: subtype,
        }
    }
}

/// Query parameters of `GET /api/search`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub resource_name: String,
    pub resource_type: Option<String>,
    pub resource_subtype: Option<String>,
}

impl SearchParams {
    /// Ordered (name, value) pairs, omitting absent filters
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![("resource_name", self.resource_name.as_str())];
        if let Some(ref t) = self.resource_type {
            pairs.push(("resource_type", t.as_str()));
        }
        if let Some(ref s) = self.resource_subtype {
            pairs.push(("resource_subtype", s.as_str()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_dispatchable() {
        assert!(!is_dispatchable(""));
        assert!(!is_dispatchable("   "));
        assert!(!is_dispatchable("\t\n"));
        assert!(is_dispatchable("i-1234"));
        assert!(is_dispatchable("  bucket "));
    }

    #[test]
    fn test_params_without_subtype() {
        let query = SearchQuery::new("bucket-1", "s3", "");
        let params = query.request_params();
        assert_eq!(
            params.pairs(),
            vec![("resource_name", "bucket-1"), ("resource_type", "s3")]
        );
    }

    #[test]
    fn test_params_with_identity_subtype() {
        let query = SearchQuery::new("alice", "iam", "user");
        let params = query.request_params();
        assert_eq!(params.resource_type.as_deref(), Some("iam"));
        assert_eq!(params.resource_subtype.as_deref(), Some("user"));
    }

    #[test]
    fn test_params_drop_unknown_type() {
        let query = SearchQuery::new("x", "vpc", "");
        assert_eq!(query.request_params().pairs(), vec![("resource_name", "x")]);
    }

    #[test]
    fn test_params_drop_subtype_for_non_identity() {
        let query = SearchQuery::new("x", "dns", "user");
        let params = query.request_params();
        assert_eq!(params.resource_type.as_deref(), Some("dns"));
        assert!(params.resource_subtype.is_none());
    }

    #[test]
    fn test_selector_round_trip_through_query() {
        let mut query = SearchQuery::default();
        query.set_selector("iam:key");
        assert_eq!(query.resource_type, "iam");
        assert_eq!(query.subtype, "key");
        assert_eq!(query.selector(), "iam:key");

        query.set_selector("ec2");
        assert_eq!(query.subtype, "");

        query.clear_selector();
        assert_eq!(query.selector(), "");
    }
}
