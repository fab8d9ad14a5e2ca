//! Typed view of result rows
//!
//! Each backend resource type returns a known set of fields. A row is
//! classified once into one of these shapes so the details pane can name the
//! resource; rows matching none of them are kept as [`ResourceRecord::Other`].
//! Field names are accepted in both the backend's snake_case and PascalCase.

use super::result::SearchResult;
use crate::query::ResourceKind;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Fields shared by every result
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Origin {
    #[serde(default, alias = "Account")]
    pub account: String,
    #[serde(default, alias = "Profile")]
    pub profile: String,
    #[serde(default, alias = "Region")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BucketRecord {
    #[serde(flatten)]
    pub origin: Origin,
    #[serde(alias = "BucketName")]
    pub bucket_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstanceRecord {
    #[serde(flatten)]
    pub origin: Origin,
    #[serde(alias = "InstanceId", alias = "instanceId")]
    pub instance_id: String,
    #[serde(default, alias = "InstanceName")]
    pub instance_name: String,
    #[serde(alias = "PrivateIpAddress")]
    pub private_ip_address: String,
    #[serde(default, alias = "PrivateDnsName")]
    pub private_dns_name: String,
    #[serde(default, alias = "PublicIpAddress")]
    pub public_ip_address: String,
    #[serde(default, alias = "PublicDnsName")]
    pub public_dns_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoadBalancerRecord {
    #[serde(flatten)]
    pub origin: Origin,
    #[serde(alias = "LoadBalancerName")]
    pub load_balancer_name: String,
    #[serde(default, alias = "LoadBalancerDnsName")]
    pub load_balancer_dns_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DnsRecord {
    #[serde(flatten)]
    pub origin: Origin,
    #[serde(default, alias = "HostedZoneName")]
    pub hosted_zone_name: String,
    #[serde(alias = "DnsRecordName")]
    pub dns_record_name: String,
    #[serde(default, alias = "DnsRecordType")]
    pub dns_record_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IamUserRecord {
    #[serde(flatten)]
    pub origin: Origin,
    #[serde(alias = "UserName")]
    pub user_name: String,
    /// Present for access key searches
    #[serde(default, alias = "AccessKey")]
    pub access_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ElasticIpRecord {
    #[serde(flatten)]
    pub origin: Origin,
    #[serde(alias = "PublicIp")]
    pub public_ip: String,
    #[serde(default, alias = "InstanceId")]
    pub instance_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DistributionRecord {
    #[serde(flatten)]
    pub origin: Origin,
    #[serde(default, alias = "DistributionArn")]
    pub distribution_arn: String,
    #[serde(alias = "DistributionId")]
    pub distribution_id: String,
    #[serde(default, alias = "DomainName")]
    pub domain_name: String,
}

/// A classified result row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRecord {
    Instance(InstanceRecord),
    Bucket(BucketRecord),
    LoadBalancer(LoadBalancerRecord),
    Dns(DnsRecord),
    IamUser(IamUserRecord),
    ElasticIp(ElasticIpRecord),
    Distribution(DistributionRecord),
    Other,
}

impl ResourceRecord {
    /// Classify a row by the fields it carries
    pub fn classify(row: &SearchResult) -> Self {
        let object: Map<String, Value> = row
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();

        // Instance before elastic IP: both carry an instance id
        try_shape(&object, Self::Instance)
            .or_else(|| try_shape(&object, Self::Bucket))
            .or_else(|| try_shape(&object, Self::LoadBalancer))
            .or_else(|| try_shape(&object, Self::Dns))
            .or_else(|| try_shape(&object, Self::IamUser))
            .or_else(|| try_shape(&object, Self::ElasticIp))
            .or_else(|| try_shape(&object, Self::Distribution))
            .unwrap_or(Self::Other)
    }

    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            Self::Instance(_) => Some(ResourceKind::ComputeInstance),
            Self::Bucket(_) => Some(ResourceKind::StorageBucket),
            Self::LoadBalancer(_) => Some(ResourceKind::LoadBalancer),
            Self::Dns(_) => Some(ResourceKind::Dns),
            Self::IamUser(_) => Some(ResourceKind::Identity),
            Self::ElasticIp(_) => Some(ResourceKind::ElasticAddress),
            Self::Distribution(_) => Some(ResourceKind::ContentDistribution),
            Self::Other => None,
        }
    }

    /// Primary identifier shown in the details title
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Self::Instance(r) => Some(&r.instance_id),
            Self::Bucket(r) => Some(&r.bucket_name),
            Self::LoadBalancer(r) => Some(&r.load_balancer_name),
            Self::Dns(r) => Some(&r.dns_record_name),
            Self::IamUser(r) => Some(r.access_key.as_deref().unwrap_or(&r.user_name)),
            Self::ElasticIp(r) => Some(&r.public_ip),
            Self::Distribution(r) => Some(&r.distribution_id),
            Self::Other => None,
        }
    }

    pub fn origin(&self) -> Option<&Origin> {
        match self {
            Self::Instance(r) => Some(&r.origin),
            Self::Bucket(r) => Some(&r.origin),
            Self::LoadBalancer(r) => Some(&r.origin),
            Self::Dns(r) => Some(&r.origin),
            Self::IamUser(r) => Some(&r.origin),
            Self::ElasticIp(r) => Some(&r.origin),
            Self::Distribution(r) => Some(&r.origin),
            Self::Other => None,
        }
    }

    /// Title for the details pane, e.g. `S3 Bucket a (account 1)`
    pub fn title(&self) -> String {
        let (Some(kind), Some(id)) = (self.kind(), self.identifier()) else {
            return "Resource".to_string();
        };
        let label = match self {
            Self::IamUser(r) if r.access_key.is_some() => "IAM (Access Key)",
            Self::IamUser(_) => "IAM (User)",
            _ => kind.display_name(),
        };
        match self.origin().map(|o| o.account.as_str()) {
            Some(account) if !account.is_empty() => {
                format!("{} {} (account {})", label, id, account)
            },
            _ => format!("{} {}", label, id),
        }
    }
}

fn try_shape<T, F>(object: &Map<String, Value>, wrap: F) -> Option<ResourceRecord>
where
    T: DeserializeOwned,
    F: FnOnce(T) -> ResourceRecord,
{
    serde_json::from_value(Value::Object(object.clone()))
        .ok()
        .map(wrap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_bucket_pascal_case() {
        let row = SearchResult::from_pairs([("Account", "1"), ("BucketName", "a")]);
        let record = ResourceRecord::classify(&row);
        assert_eq!(record.kind(), Some(ResourceKind::StorageBucket));
        assert_eq!(record.identifier(), Some("a"));
        assert_eq!(record.title(), "S3 Bucket a (account 1)");
    }

    #[test]
    fn test_classify_instance_not_elastic_ip() {
        let row = SearchResult::from_pairs([
            ("account", "1"),
            ("profile", "dev"),
            ("region", "us-east-1"),
            ("instance_id", "i-1234"),
            ("instance_name", "web"),
            ("private_ip_address", "10.0.0.1"),
            ("public_ip_address", "1.2.3.4"),
        ]);
        let record = ResourceRecord::classify(&row);
        assert_eq!(record.kind(), Some(ResourceKind::ComputeInstance));
        assert_eq!(record.identifier(), Some("i-1234"));
        assert_eq!(
            record.origin().and_then(|o| o.region.as_deref()),
            Some("us-east-1")
        );
    }

    #[test]
    fn test_classify_elastic_ip() {
        let row = SearchResult::from_pairs([
            ("account", "1"),
            ("public_ip", "1.2.3.4"),
            ("instance_id", "i-1"),
        ]);
        assert_eq!(
            ResourceRecord::classify(&row).kind(),
            Some(ResourceKind::ElasticAddress)
        );
    }

    #[test]
    fn test_classify_access_key() {
        let row = SearchResult::from_pairs([
            ("account", "1"),
            ("user_name", "alice"),
            ("access_key", "AKIA123"),
        ]);
        let record = ResourceRecord::classify(&row);
        assert_eq!(record.identifier(), Some("AKIA123"));
        assert!(record.title().starts_with("IAM (Access Key) AKIA123"));
    }

    #[test]
    fn test_classify_unknown_shape() {
        let row = SearchResult::from_pairs([("vpc_id", "vpc-1"), ("cidr_block", "10.0.0.0/16")]);
        let record = ResourceRecord::classify(&row);
        assert_eq!(record, ResourceRecord::Other);
        assert_eq!(record.title(), "Resource");
    }
}
