//! # KeyRotor Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The rotation decision engine and lifecycle executor
//! - The secure distribution pipeline and notification dispatcher
//! - The fleet runner and run log
//! - Port/adapter interfaces (traits) for every external collaborator
//!
//! ## Architecture Principles
//! - Only depends on `keyrotor-domain`
//! - No cloud, subprocess, or filesystem code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod distribution;
pub mod fleet;
pub mod notify;
pub mod rotation;
pub mod runlog;

// Re-export specific items to avoid ambiguity
pub use distribution::ports::{Encryptor, ObjectStore, RecipientDirectory, WorkingDir};
pub use distribution::DistributionPipeline;
pub use fleet::ports::{AllowList, Fleet};
pub use fleet::runner::{FleetRunner, RunSummary};
pub use notify::ports::Transport;
pub use notify::NotificationDispatcher;
pub use rotation::executor::{ExecutionReport, LifecycleExecutor};
pub use rotation::planner::plan_rotation;
pub use rotation::ports::IdentityProvider;
pub use runlog::RunLog;
