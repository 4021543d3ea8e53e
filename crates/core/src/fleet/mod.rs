//! Fleet iteration across accounts and principals

pub mod ports;
pub mod runner;

pub use ports::{AllowList, Fleet};
pub use runner::{FleetRunner, RunSummary};
