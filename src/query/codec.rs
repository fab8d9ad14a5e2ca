//! Composite filter codec
//!
//! The type picker offers a single choice per entry, so a resource type and
//! its optional subtype travel together as one string: `type` or
//! `type:subtype`.

/// Separator between type and subtype in a selector value
const SUBTYPE_SEPARATOR: char = ':';

/// Resource types understood by the search backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    StorageBucket,
    Dns,
    LoadBalancer,
    ComputeInstance,
    Identity,
    ElasticAddress,
    ContentDistribution,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::StorageBucket,
        ResourceKind::Dns,
        ResourceKind::LoadBalancer,
        ResourceKind::ComputeInstance,
        ResourceKind::Identity,
        ResourceKind::ElasticAddress,
        ResourceKind::ContentDistribution,
    ];

    /// Wire name sent as `resource_type`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StorageBucket => "s3",
            Self::Dns => "dns",
            Self::LoadBalancer => "loadbalancer",
            Self::ComputeInstance => "ec2",
            Self::Identity => "iam",
            Self::ElasticAddress => "elastic_ip",
            Self::ContentDistribution => "cloudfront",
        }
    }

    /// Parse a wire name. Unknown names yield `None` ("no type filter").
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::StorageBucket => "S3 Bucket",
            Self::Dns => "DNS (Hosted Zone or Record)",
            Self::LoadBalancer => "Load Balancer",
            Self::ComputeInstance => "EC2 Instance (by IP, DNS, or Tags)",
            Self::Identity => "IAM",
            Self::ElasticAddress => "Elastic IP",
            Self::ContentDistribution => "CloudFront Distribution (by ID or Domain name)",
        }
    }

    /// Only identity entities are split into subtypes
    pub fn accepts_subtypes(&self) -> bool {
        matches!(self, Self::Identity)
    }

    pub fn subtypes(&self) -> &'static [IdentitySubtype] {
        if self.accepts_subtypes() {
            &IdentitySubtype::ALL
        } else {
            &[]
        }
    }
}

/// Subtypes of the identity resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentitySubtype {
    Key,
    User,
}

impl IdentitySubtype {
    pub const ALL: [IdentitySubtype; 2] = [IdentitySubtype::Key, IdentitySubtype::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sub| sub.as_str() == s)
    }

    fn display_name(&self) -> &'static str {
        match self {
            Self::Key => "IAM (Access Key)",
            Self::User => "IAM (User)",
        }
    }
}

/// Encode a (type, subtype) pair into a selector value
pub fn encode(resource_type: &str, subtype: &str) -> String {
    if subtype.is_empty() {
        resource_type.to_string()
    } else {
        format!("{}{}{}", resource_type, SUBTYPE_SEPARATOR, subtype)
    }
}

/// Decode a selector value, splitting on the first `:`
pub fn decode(value: &str) -> (String, String) {
    match value.split_once(SUBTYPE_SEPARATOR) {
        Some((resource_type, subtype)) => (resource_type.to_string(), subtype.to_string()),
        None => (value.to_string(), String::new()),
    }
}

/// One entry of the type picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorChoice {
    /// Encoded selector value (`type` or `type:subtype`)
    pub value: String,
    pub label: &'static str,
}

/// All selectable filters in display order. Identity appears once per subtype.
pub fn selector_choices() -> Vec<SelectorChoice> {
    let mut choices = Vec::new();
    for kind in ResourceKind::ALL {
        if kind.accepts_subtypes() {
            for sub in kind.subtypes() {
                choices.push(SelectorChoice {
                    value: encode(kind.as_str(), sub.as_str()),
                    label: sub.display_name(),
                });
            }
        } else {
            choices.push(SelectorChoice {
                value: encode(kind.as_str(), ""),
                label: kind.display_name(),
            });
        }
    }
    choices
}

/// Human-readable label for an encoded selector value
pub fn label_for(value: &str) -> Option<&'static str> {
    selector_choices()
        .into_iter()
        .find(|choice| choice.value == value)
        .map(|choice| choice.label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_without_subtype() {
        assert_eq!(encode("s3", ""), "s3");
        assert_eq!(encode("", ""), "");
    }

    #[test]
    fn test_encode_with_subtype() {
        assert_eq!(encode("iam", "user"), "iam:user");
    }

    #[test]
    fn test_decode_splits_on_first_colon() {
        assert_eq!(decode("iam:key"), ("iam".to_string(), "key".to_string()));
        assert_eq!(decode("a:b:c"), ("a".to_string(), "b:c".to_string()));
        assert_eq!(decode("dns"), ("dns".to_string(), String::new()));
    }

    #[test]
    fn test_round_trip_all_known_pairs() {
        for kind in ResourceKind::ALL {
            let (t, s) = decode(&encode(kind.as_str(), ""));
            assert_eq!((t.as_str(), s.as_str()), (kind.as_str(), ""));

            for sub in kind.subtypes() {
                let (t, s) = decode(&encode(kind.as_str(), sub.as_str()));
                assert_eq!((t.as_str(), s.as_str()), (kind.as_str(), sub.as_str()));
            }
        }
    }

    #[test]
    fn test_unknown_type_decodes_without_error() {
        let (t, s) = decode("vpc");
        assert_eq!(t, "vpc");
        assert!(s.is_empty());
        assert!(ResourceKind::parse(&t).is_none());
    }

    #[test]
    fn test_selector_choices_cover_identity_subtypes() {
        let values: Vec<String> = selector_choices().into_iter().map(|c| c.value).collect();
        assert_eq!(
            values,
            vec![
                "s3",
                "dns",
                "loadbalancer",
                "ec2",
                "iam:key",
                "iam:user",
                "elastic_ip",
                "cloudfront"
            ]
        );
    }

    #[test]
    fn test_label_for() {
        assert_eq!(label_for("iam:user"), Some("IAM (User)"));
        assert_eq!(label_for("iam"), None);
        assert_eq!(label_for("s3"), Some("S3 Bucket"));
    }
}
