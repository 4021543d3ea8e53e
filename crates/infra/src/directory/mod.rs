//! Account registry: allow-list and recipient lookup

pub mod registry;

pub use registry::AccountRegistry;
