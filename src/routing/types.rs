//! Shared routing types.

use serde::{Deserialize, Serialize};

use crate::classify::Department;

// ── Directory ───────────────────────────────────────────────────────

/// Department → recipient address, supplied by the caller.
///
/// Entries are optional; a missing entry resolves to `None` and is handed to
/// the dispatcher as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentDirectory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing: Option<String>,
    /// Only consulted under [`MarketingRoute::Dedicated`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl DepartmentDirectory {
    /// Build from `ROUTE_SUPPORT`, `ROUTE_SALES`, `ROUTE_BILLING`,
    /// `ROUTE_MARKETING` and `ROUTE_DEFAULT`. Empty values count as unset.
    pub fn from_env() -> Self {
        let var = |key: &str| {
            std::env::var(key)
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Self {
            support: var("ROUTE_SUPPORT"),
            sales: var("ROUTE_SALES"),
            billing: var("ROUTE_BILLING"),
            marketing: var("ROUTE_MARKETING"),
            default: var("ROUTE_DEFAULT"),
        }
    }

    pub fn with_support(mut self, address: impl Into<String>) -> Self {
        self.support = Some(address.into());
        self
    }

    pub fn with_sales(mut self, address: impl Into<String>) -> Self {
        self.sales = Some(address.into());
        self
    }

    pub fn with_billing(mut self, address: impl Into<String>) -> Self {
        self.billing = Some(address.into());
        self
    }

    pub fn with_marketing(mut self, address: impl Into<String>) -> Self {
        self.marketing = Some(address.into());
        self
    }

    pub fn with_default(mut self, address: impl Into<String>) -> Self {
        self.default = Some(address.into());
        self
    }
}

// ── Marketing policy ────────────────────────────────────────────────

/// How the built-in mapping treats `marketing`.
///
/// The built-in mapping has no marketing branch, so marketing mail lands on
/// the `default` address. `Dedicated` opts into the directory's
/// `marketing` slot instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketingRoute {
    #[default]
    Default,
    /// Use `directory.marketing`, then `directory.default` if that is unset.
    Dedicated,
}

impl From<bool> for MarketingRoute {
    fn from(dedicated: bool) -> Self {
        if dedicated {
            MarketingRoute::Dedicated
        } else {
            MarketingRoute::Default
        }
    }
}

// ── Custom routing ──────────────────────────────────────────────────

/// Caller-supplied override for recipient resolution.
///
/// When present it replaces the built-in mapping entirely; its result is
/// returned verbatim.
pub trait RoutingPolicy: Send + Sync {
    fn resolve(&self, department: Department, directory: &DepartmentDirectory) -> Option<String>;
}

impl<F> RoutingPolicy for F
where
    F: Fn(Department, &DepartmentDirectory) -> Option<String> + Send + Sync,
{
    fn resolve(&self, department: Department, directory: &DepartmentDirectory) -> Option<String> {
        self(department, directory)
    }
}

// ── Decision ────────────────────────────────────────────────────────

/// Outcome of routing one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub department: Department,
    /// `None` when the directory had no entry for the resolved slot.
    pub recipient: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_deserializes_partial_json() {
        let directory: DepartmentDirectory =
            serde_json::from_str(r#"{"sales":"a@x.com","default":"d@x.com"}"#).unwrap();
        assert_eq!(directory.sales.as_deref(), Some("a@x.com"));
        assert_eq!(directory.default.as_deref(), Some("d@x.com"));
        assert!(directory.support.is_none());
        assert!(directory.marketing.is_none());
    }

    #[test]
    fn builder_sets_slots() {
        let directory = DepartmentDirectory::default()
            .with_support("s@x.com")
            .with_billing("b@x.com");
        assert_eq!(directory.support.as_deref(), Some("s@x.com"));
        assert_eq!(directory.billing.as_deref(), Some("b@x.com"));
        assert!(directory.sales.is_none());
    }

    #[test]
    fn marketing_route_from_bool() {
        assert_eq!(MarketingRoute::from(true), MarketingRoute::Dedicated);
        assert_eq!(MarketingRoute::from(false), MarketingRoute::Default);
        assert_eq!(MarketingRoute::default(), MarketingRoute::Default);
    }

    #[test]
    fn closures_are_routing_policies() {
        let policy = |_: Department, _: &DepartmentDirectory| Some("x@y.com".to_string());
        let directory = DepartmentDirectory::default();
        assert_eq!(
            policy.resolve(Department::Billing, &directory).as_deref(),
            Some("x@y.com")
        );
    }
}
