//! burrow-axum: axum integration for Burrow.
//!
//! Wires the burrow-core tenant resolver into a tower middleware, dispatches
//! requests to the URL table the routing selector picked, and maps structured
//! errors onto HTTP responses.

pub mod app;
pub mod middlewares;
pub mod state;
mod error;

pub use app::{BurrowApp, Dispatcher};
pub use error::BurrowAxumError;
pub use state::TenancyState;
