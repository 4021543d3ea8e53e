//! STS-backed fleet: role assumption per account
//!
//! In fleet mode every registry account is entered through its rotation
//! role; in single-account mode the ambient credentials are used as-is.

use std::sync::Arc;

use async_trait::async_trait;
use aws_config::SdkConfig;
use keyrotor_core::{Fleet, IdentityProvider};
use keyrotor_domain::{Account, Result, RotationError};
use tracing::info;

use super::iam::IamIdentityProvider;

const SESSION_NAME: &str = "keyrotor-rotation";

/// Fleet entering accounts via STS role assumption
pub struct StsFleet {
    accounts: Vec<Account>,
    base_config: SdkConfig,
}

impl StsFleet {
    /// Fleet over the given registry accounts
    pub fn new(accounts: Vec<Account>, base_config: SdkConfig) -> Self {
        Self { accounts, base_config }
    }

    /// Single-account fleet using the ambient credentials
    pub fn single(account: Account, base_config: SdkConfig) -> Self {
        Self::new(vec![account], base_config)
    }

    async fn assumed_client(&self, account: &Account, role_arn: &str) -> Result<aws_sdk_iam::Client> {
        let sts = aws_sdk_sts::Client::new(&self.base_config);
        let assumed = sts
            .assume_role()
            .role_arn(role_arn)
            .role_session_name(SESSION_NAME)
            .send()
            .await
            .map_err(|err| {
                RotationError::Provider(format!(
                    "role assumption failed for {}: {}",
                    account.name, err
                ))
            })?;
        let credentials = assumed.credentials().ok_or_else(|| {
            RotationError::Provider(format!(
                "role assumption for {} returned no credentials",
                account.name
            ))
        })?;
        let provider = aws_sdk_iam::config::Credentials::new(
            credentials.access_key_id(),
            credentials.secret_access_key(),
            Some(credentials.session_token().to_string()),
            None,
            "keyrotor-sts",
        );
        let config = aws_sdk_iam::config::Builder::from(&self.base_config)
            .credentials_provider(provider)
            .build();
        info!(account = %account.name, role = role_arn, "assumed rotation role");
        Ok(aws_sdk_iam::Client::from_conf(config))
    }
}

#[async_trait]
impl Fleet for StsFleet {
    async fn accounts(&self) -> Result<Vec<Account>> {
        Ok(self.accounts.clone())
    }

    async fn provider_for(&self, account: &Account) -> Result<Arc<dyn IdentityProvider>> {
        let client = match &account.role_arn {
            Some(role_arn) => self.assumed_client(account, role_arn).await?,
            None => aws_sdk_iam::Client::new(&self.base_config),
        };
        Ok(Arc::new(IamIdentityProvider::new(client, &account.name)))
    }
}
