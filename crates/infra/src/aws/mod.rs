//! AWS adapters for the core ports

pub mod iam;
pub mod s3;
pub mod ses;
pub mod sts;

pub use iam::IamIdentityProvider;
pub use s3::S3ObjectStore;
pub use ses::{LogTransport, SesTransport};
pub use sts::StsFleet;
