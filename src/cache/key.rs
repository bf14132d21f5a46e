//! Cache and in-flight lookup keys
//!
//! A `ResourceKey` scopes a cached listing or detail record to a resource
//! kind plus the account/region it was fetched under. Equality is
//! structural, so the same logical request always lands on the same entry
//! regardless of which caller built the key.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Category of remote entity the dashboard can browse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Compute functions (list + per-function detail + invoke)
    Functions,
    /// Container services
    Containers,
    /// Object-store buckets
    Buckets,
}

impl ResourceKind {
    /// All browsable kinds, for registry construction and config iteration.
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Functions,
        ResourceKind::Containers,
        ResourceKind::Buckets,
    ];

    /// Default freshness window for cached entries of this kind.
    ///
    /// Function listings churn with deploys; buckets and services are
    /// comparatively stable.
    pub fn default_ttl(self) -> Duration {
        match self {
            ResourceKind::Functions => Duration::from_secs(2 * 60),
            ResourceKind::Containers => Duration::from_secs(5 * 60),
            ResourceKind::Buckets => Duration::from_secs(10 * 60),
        }
    }

    /// Default deadline for a fetch of this kind.
    ///
    /// Listings page through the provider API and get a wider budget than
    /// single-record lookups would need.
    pub fn default_deadline(self) -> Duration {
        match self {
            ResourceKind::Functions => Duration::from_secs(30),
            ResourceKind::Containers => Duration::from_secs(30),
            ResourceKind::Buckets => Duration::from_secs(15),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Functions => "functions",
            ResourceKind::Containers => "containers",
            ResourceKind::Buckets => "buckets",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "functions" => Ok(ResourceKind::Functions),
            "containers" => Ok(ResourceKind::Containers),
            "buckets" => Ok(ResourceKind::Buckets),
            other => Err(format!("unknown resource kind: {other}")),
        }
    }
}

/// Immutable composite key identifying one cacheable fetch.
///
/// `extra` is `None` for a list fetch and carries the resource name for a
/// detail fetch, so the two never collide in the cache or in-flight table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    pub kind: ResourceKind,
    pub account: String,
    pub region: String,
    pub extra: Option<String>,
}

impl ResourceKey {
    pub fn list(kind: ResourceKind, account: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            kind,
            account: account.into(),
            region: region.into(),
            extra: None,
        }
    }

    pub fn detail(
        kind: ResourceKind,
        account: impl Into<String>,
        region: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            account: account.into(),
            region: region.into(),
            extra: Some(name.into()),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.extra {
            Some(extra) => write!(
                f,
                "{}/{}/{}/{}",
                self.kind, self.account, self.region, extra
            ),
            None => write!(f, "{}/{}/{}", self.kind, self.account, self.region),
        }
    }
}

/// Parameters narrowing a fetch beyond kind + session.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// Specific resource name for a detail fetch; `None` lists the kind.
    pub name: Option<String>,
    /// Request payload for an invoke operation.
    pub payload: Option<Vec<u8>>,
}

impl Scope {
    pub fn list() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            payload: None,
        }
    }

    pub fn invoke(name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            name: Some(name.into()),
            payload: Some(payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_equality_is_structural() {
        let a = ResourceKey::list(ResourceKind::Functions, "123456789012", "us-east-1");
        let b = ResourceKey::list(ResourceKind::Functions, "123456789012", "us-east-1");
        assert_eq!(a, b);
    }

    #[test]
    fn test_list_and_detail_keys_differ() {
        let list = ResourceKey::list(ResourceKind::Functions, "acct", "us-east-1");
        let detail = ResourceKey::detail(ResourceKind::Functions, "acct", "us-east-1", "orders");
        assert_ne!(list, detail);
    }

    #[test]
    fn test_keys_differ_across_regions() {
        let east = ResourceKey::list(ResourceKind::Buckets, "acct", "us-east-1");
        let west = ResourceKey::list(ResourceKind::Buckets, "acct", "us-west-2");
        assert_ne!(east, west);
    }

    #[test]
    fn test_keys_differ_across_kinds() {
        let fns = ResourceKey::list(ResourceKind::Functions, "acct", "us-east-1");
        let buckets = ResourceKey::list(ResourceKind::Buckets, "acct", "us-east-1");
        assert_ne!(fns, buckets);
    }

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in ResourceKind::ALL {
            let parsed: ResourceKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_kind_parse_rejects_unknown() {
        assert!("queues".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_display_includes_extra() {
        let key = ResourceKey::detail(ResourceKind::Functions, "acct", "eu-west-1", "orders");
        assert_eq!(key.to_string(), "functions/acct/eu-west-1/orders");
    }
}
