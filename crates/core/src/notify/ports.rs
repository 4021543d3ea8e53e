//! Port interface for the notification transport

use async_trait::async_trait;
use keyrotor_domain::Result;

/// Trait for delivering a message to a set of recipients
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, recipients: &[String], subject: &str, body: &str) -> Result<()>;
}
