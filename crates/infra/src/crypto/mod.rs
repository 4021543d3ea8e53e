//! Encryption adapters

pub mod gpg;

pub use gpg::GpgEncryptor;
