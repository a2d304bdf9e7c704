//! Order lifecycle core: placing orders against a product catalogue and
//! moving them through a constrained sequence of statuses.
//!
//! - [`domain`]: statuses, the expectedness matrix, transitions and events
//! - [`ports`]: collaborator traits (persistence, catalogue, dispatch)
//! - [`services`]: the place / update / cancel / get entry points
//! - [`adapters`]: in-memory collaborators and a retrying dispatcher

pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod services;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use app::OrderLifecycle;
pub use config::OrderLifecycleConfig;
