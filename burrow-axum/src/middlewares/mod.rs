pub mod tenancy;

pub use tenancy::{TenancyLayer, TenancyService};
