//! Notification transports: SES and the non-production log sink

use async_trait::async_trait;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use aws_sdk_sesv2::Client;
use keyrotor_core::Transport;
use keyrotor_domain::{Result, RotationError};
use tracing::info;

/// Transport sending real mail through SES
pub struct SesTransport {
    client: Client,
    sender: String,
}

impl SesTransport {
    /// Create a transport sending from the given address
    pub fn new(client: Client, sender: impl Into<String>) -> Self {
        Self { client, sender: sender.into() }
    }
}

#[async_trait]
impl Transport for SesTransport {
    async fn send(&self, recipients: &[String], subject: &str, body: &str) -> Result<()> {
        let destination =
            Destination::builder().set_to_addresses(Some(recipients.to_vec())).build();
        let subject_content = Content::builder().data(subject).build().map_err(|err| {
            RotationError::Notification(format!("invalid subject content: {}", err))
        })?;
        let body_content = Content::builder().data(body).build().map_err(|err| {
            RotationError::Notification(format!("invalid body content: {}", err))
        })?;
        let message = Message::builder()
            .subject(subject_content)
            .body(Body::builder().text(body_content).build())
            .build();
        let content = EmailContent::builder().simple(message).build();

        self.client
            .send_email()
            .from_email_address(&self.sender)
            .destination(destination)
            .content(content)
            .send()
            .await
            .map_err(|err| RotationError::Notification(format!("send failed: {}", err)))?;
        Ok(())
    }
}

/// Transport sink for non-production runs
///
/// Messages land in the log with the same content production would send,
/// so a rehearsal's notification surface matches the real thing.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransport;

#[async_trait]
impl Transport for LogTransport {
    async fn send(&self, recipients: &[String], subject: &str, body: &str) -> Result<()> {
        info!(recipients = ?recipients, subject, body, "notification echoed to log sink");
        Ok(())
    }
}
