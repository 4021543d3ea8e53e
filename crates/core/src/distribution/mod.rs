//! Secure distribution of newly issued credentials

pub mod pipeline;
pub mod ports;

pub use pipeline::DistributionPipeline;
pub use ports::{Encryptor, ObjectStore, RecipientDirectory, WorkingDir};
