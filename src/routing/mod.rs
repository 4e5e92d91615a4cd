//! Department → recipient routing.

pub mod router;
pub mod types;

pub use router::{Router, resolve_builtin, route};
pub use types::{DepartmentDirectory, MarketingRoute, RoutingDecision, RoutingPolicy};
