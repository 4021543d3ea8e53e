//! IAM identity-provider adapter
//!
//! Implements the `IdentityProvider` port against the AWS IAM API. The
//! adapter is scoped to one account; the fleet hands out one instance per
//! account it enters.

use async_trait::async_trait;
use aws_sdk_iam::types::AccessKeyMetadata;
use aws_sdk_iam::Client;
use chrono::{DateTime, Utc};
use keyrotor_core::IdentityProvider;
use keyrotor_domain::{Inventory, IssuedKey, KeyRecord, Principal, Result, RotationError};
use tracing::debug;

/// IAM-backed identity provider for one account
pub struct IamIdentityProvider {
    client: Client,
    account: String,
}

impl IamIdentityProvider {
    /// Create a provider over an account-scoped IAM client
    pub fn new(client: Client, account: impl Into<String>) -> Self {
        Self { client, account: account.into() }
    }

    fn to_record(&self, meta: &AccessKeyMetadata, principal: &Principal) -> Result<KeyRecord> {
        let id = meta.access_key_id().ok_or_else(|| {
            RotationError::Provider(format!("key metadata for {} is missing an id", principal))
        })?;
        let created = meta.create_date().ok_or_else(|| {
            RotationError::Provider(format!("key {} is missing a creation date", id))
        })?;
        Ok(KeyRecord {
            id: id.to_string(),
            account: principal.account.clone(),
            principal: principal.name.clone(),
            created_at: smithy_to_chrono(created)?,
        })
    }
}

#[async_trait]
impl IdentityProvider for IamIdentityProvider {
    async fn list_principals(&self) -> Result<Vec<Principal>> {
        let mut principals = Vec::new();
        let mut pages = self.client.list_users().into_paginator().items().send();
        while let Some(user) = pages.next().await {
            let user = user.map_err(|err| {
                RotationError::Provider(format!("user listing failed: {}", err))
            })?;
            principals.push(Principal::new(&self.account, user.user_name()));
        }
        debug!(account = %self.account, count = principals.len(), "listed principals");
        Ok(principals)
    }

    async fn list_keys(&self, principal: &Principal) -> Result<Inventory> {
        let output = self
            .client
            .list_access_keys()
            .user_name(&principal.name)
            .send()
            .await
            .map_err(|err| {
                RotationError::Provider(format!("key listing failed for {}: {}", principal, err))
            })?;
        let records = output
            .access_key_metadata()
            .iter()
            .map(|meta| self.to_record(meta, principal))
            .collect::<Result<Vec<_>>>()?;
        Ok(Inventory::new(records))
    }

    async fn create_key(&self, principal: &Principal) -> Result<IssuedKey> {
        let output = self
            .client
            .create_access_key()
            .user_name(&principal.name)
            .send()
            .await
            .map_err(|err| {
                RotationError::Provider(format!("key creation failed for {}: {}", principal, err))
            })?;
        let key = output.access_key().ok_or_else(|| {
            RotationError::Provider(format!("key creation for {} returned no key", principal))
        })?;
        let created_at = match key.create_date() {
            Some(created) => smithy_to_chrono(created)?,
            None => Utc::now(),
        };
        Ok(IssuedKey {
            record: KeyRecord {
                id: key.access_key_id().to_string(),
                account: principal.account.clone(),
                principal: principal.name.clone(),
                created_at,
            },
            secret: key.secret_access_key().to_string(),
        })
    }

    async fn delete_key(&self, principal: &Principal, key_id: &str) -> Result<()> {
        self.client
            .delete_access_key()
            .user_name(&principal.name)
            .access_key_id(key_id)
            .send()
            .await
            .map_err(|err| {
                RotationError::Provider(format!(
                    "key deletion failed for {} ({}): {}",
                    principal, key_id, err
                ))
            })?;
        Ok(())
    }
}

fn smithy_to_chrono(value: &aws_sdk_iam::primitives::DateTime) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos())
        .ok_or_else(|| RotationError::Provider(format!("invalid provider timestamp {}", value)))
}
