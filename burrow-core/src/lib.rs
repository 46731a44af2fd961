//! burrow-core: framework-agnostic multi-tenant core for Burrow.
//!
//! Every request to a Burrow deployment belongs to exactly one tenant, and
//! every tenant owns an isolated data partition. This crate holds the pieces
//! that decide which tenant a request belongs to and which URL table should
//! govern its dispatch; the HTTP wiring lives in `burrow-axum`.

pub mod config;
pub mod directory;
pub mod errors;
pub mod partition;
pub mod resolver;
pub mod routing;
pub mod tenant;

pub use config::{BurrowConfig, BurrowConfigSnapshot};
pub use directory::{MemoryDirectory, TenantDirectory};
pub use errors::{BurrowError, ErrorKind};
pub use partition::{MemoryPartitionStore, PartitionContext, PartitionStore, PUBLIC_PARTITION};
pub use resolver::{
    normalize_hostname, Resolution, ResolveError, TenantResolver, PUBLIC_CLAIM, TENANT_HEADER,
};
pub use routing::{RoutingSelector, Topology, UrlTableId};
pub use tenant::{Domain, Tenant, TenantBinding};
