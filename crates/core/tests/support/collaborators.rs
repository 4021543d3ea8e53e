//! Mock collaborator implementations for testing
//!
//! Provides in-memory mocks for every core port, enabling deterministic
//! tests without cloud, subprocess, or filesystem dependencies.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use keyrotor_core::fleet::ports::{AllowList, Fleet};
use keyrotor_core::{
    Encryptor, IdentityProvider, ObjectStore, RecipientDirectory, Transport, WorkingDir,
};
use keyrotor_domain::{
    Account, ArtifactLocation, Inventory, IssuedKey, KeyRecord, Principal, RecipientSpec,
    Result as DomainResult, RotationError,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory mock for `IdentityProvider`.
///
/// Holds one account's principals and their key sets, mints predictable
/// key ids, and can be told to refuse deletes for a given principal.
#[derive(Default)]
pub struct MockIdentityProvider {
    account: String,
    principals: Vec<String>,
    keys: Mutex<HashMap<String, Vec<KeyRecord>>>,
    counter: AtomicUsize,
    fail_delete_for: Option<String>,
    created: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
}

impl MockIdentityProvider {
    pub fn new(account: &str) -> Self {
        Self { account: account.to_string(), ..Self::default() }
    }

    /// Convenience helper seeding one principal with its key records.
    pub fn with_principal(mut self, name: &str, keys: Vec<KeyRecord>) -> Self {
        self.principals.push(name.to_string());
        lock(&self.keys).insert(name.to_string(), keys);
        self
    }

    /// Make provider-side deletes fail for the given principal.
    pub fn failing_delete_for(mut self, name: &str) -> Self {
        self.fail_delete_for = Some(name.to_string());
        self
    }

    /// Current key set for a principal, in observation order.
    pub fn keys_of(&self, name: &str) -> Vec<KeyRecord> {
        lock(&self.keys).get(name).cloned().unwrap_or_default()
    }

    /// Key ids minted so far.
    pub fn created(&self) -> Vec<String> {
        lock(&self.created).clone()
    }

    /// Key ids removed so far.
    pub fn deleted(&self) -> Vec<String> {
        lock(&self.deleted).clone()
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn list_principals(&self) -> DomainResult<Vec<Principal>> {
        Ok(self
            .principals
            .iter()
            .map(|name| Principal::new(&self.account, name))
            .collect())
    }

    async fn list_keys(&self, principal: &Principal) -> DomainResult<Inventory> {
        Ok(Inventory::new(self.keys_of(&principal.name)))
    }

    async fn create_key(&self, principal: &Principal) -> DomainResult<IssuedKey> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let record = KeyRecord {
            id: format!("AKIANEW{}", n),
            account: principal.account.clone(),
            principal: principal.name.clone(),
            created_at: Utc::now(),
        };
        lock(&self.keys).entry(principal.name.clone()).or_default().push(record.clone());
        lock(&self.created).push(record.id.clone());
        Ok(IssuedKey { record, secret: format!("secret-{}", n) })
    }

    async fn delete_key(&self, principal: &Principal, key_id: &str) -> DomainResult<()> {
        if self.fail_delete_for.as_deref() == Some(principal.name.as_str()) {
            return Err(RotationError::Provider("delete refused by provider".to_string()));
        }
        let mut keys = lock(&self.keys);
        let records = keys
            .get_mut(&principal.name)
            .ok_or_else(|| RotationError::Provider(format!("unknown principal {}", principal)))?;
        let before = records.len();
        records.retain(|record| record.id != key_id);
        if records.len() == before {
            return Err(RotationError::Provider(format!("unknown key {}", key_id)));
        }
        lock(&self.deleted).push(key_id.to_string());
        Ok(())
    }
}

/// In-memory mock for `ObjectStore`.
#[derive(Default)]
pub struct MockObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    pub fail_delete: AtomicBool,
}

impl MockObjectStore {
    pub fn object_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = lock(&self.objects).keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        lock(&self.objects).get(key).cloned()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> DomainResult<ArtifactLocation> {
        lock(&self.objects).insert(key.to_string(), bytes);
        Ok(ArtifactLocation { bucket: "test-bucket".to_string(), key: key.to_string() })
    }

    async fn get(&self, key: &str) -> DomainResult<Vec<u8>> {
        lock(&self.objects)
            .get(key)
            .cloned()
            .ok_or_else(|| RotationError::Storage(format!("no such object {}", key)))
    }

    async fn delete(&self, key: &str) -> DomainResult<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(RotationError::Storage("delete failed".to_string()));
        }
        lock(&self.objects).remove(key);
        Ok(())
    }
}

/// In-memory mock for `Encryptor`. Prefixes the plaintext so tests can
/// tell ciphertext from plaintext.
#[derive(Default)]
pub struct MockEncryptor {
    pub fail: AtomicBool,
}

#[async_trait]
impl Encryptor for MockEncryptor {
    async fn encrypt(
        &self,
        plaintext: &[u8],
        _recipients: &RecipientSpec,
    ) -> DomainResult<Vec<u8>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(RotationError::Distribution("encryption failed".to_string()));
        }
        let mut out = b"PGP:".to_vec();
        out.extend_from_slice(plaintext);
        Ok(out)
    }
}

/// A message captured by `MockTransport`.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// In-memory mock for `Transport`.
#[derive(Default)]
pub struct MockTransport {
    sent: Mutex<Vec<SentMessage>>,
    pub fail: AtomicBool,
}

impl MockTransport {
    pub fn sent(&self) -> Vec<SentMessage> {
        lock(&self.sent).clone()
    }

    pub fn subjects(&self) -> Vec<String> {
        lock(&self.sent).iter().map(|message| message.subject.clone()).collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, recipients: &[String], subject: &str, body: &str) -> DomainResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(RotationError::Notification("transport unavailable".to_string()));
        }
        lock(&self.sent).push(SentMessage {
            recipients: recipients.to_vec(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// In-memory account directory implementing both `RecipientDirectory` and
/// `AllowList`.
#[derive(Default)]
pub struct MockDirectory {
    emails: HashMap<String, Vec<String>>,
    recipients: HashMap<String, RecipientSpec>,
    allowed: Vec<String>,
    excluded: Vec<String>,
}

impl MockDirectory {
    /// Register a managed principal with addresses and encryption keys.
    pub fn with_member(
        mut self,
        name: &str,
        emails: Vec<&str>,
        recipients: Option<RecipientSpec>,
    ) -> Self {
        self.allowed.push(name.to_string());
        self.emails
            .insert(name.to_string(), emails.into_iter().map(String::from).collect());
        if let Some(spec) = recipients {
            self.recipients.insert(name.to_string(), spec);
        }
        self
    }

    /// Register a principal that is skipped without an operations alert.
    pub fn with_excluded(mut self, name: &str) -> Self {
        self.excluded.push(name.to_string());
        self
    }
}

#[async_trait]
impl RecipientDirectory for MockDirectory {
    async fn emails_for(&self, principal: &Principal) -> DomainResult<Vec<String>> {
        Ok(self.emails.get(&principal.name).cloned().unwrap_or_default())
    }

    async fn encryption_recipients_for(
        &self,
        principal: &Principal,
    ) -> DomainResult<Option<RecipientSpec>> {
        Ok(self.recipients.get(&principal.name).cloned())
    }
}

#[async_trait]
impl AllowList for MockDirectory {
    async fn is_allowed(&self, principal: &Principal) -> DomainResult<bool> {
        Ok(self.allowed.iter().any(|name| name == &principal.name))
    }

    async fn is_excluded(&self, principal: &Principal) -> DomainResult<bool> {
        Ok(self.excluded.iter().any(|name| name == &principal.name))
    }
}

/// In-memory mock for `WorkingDir`.
#[derive(Default)]
pub struct MockWorkingDir {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MockWorkingDir {
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = lock(&self.files).keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl WorkingDir for MockWorkingDir {
    async fn write(&self, name: &str, bytes: &[u8]) -> DomainResult<String> {
        lock(&self.files).insert(name.to_string(), bytes.to_vec());
        Ok(format!("/scratch/{}", name))
    }

    async fn remove(&self, name: &str) -> DomainResult<()> {
        lock(&self.files).remove(name);
        Ok(())
    }

    async fn sweep(&self) -> DomainResult<usize> {
        let mut files = lock(&self.files);
        let removed = files
            .keys()
            .filter(|name| name.ends_with(".csv") || name.ends_with(".gpg"))
            .count();
        files.retain(|name, _| !name.ends_with(".csv") && !name.ends_with(".gpg"));
        Ok(removed)
    }
}

/// Single-account mock for `Fleet`. Accounts without a registered
/// provider fail role assumption.
#[derive(Default)]
pub struct MockFleet {
    accounts: Vec<Account>,
    providers: HashMap<String, Arc<MockIdentityProvider>>,
}

impl MockFleet {
    pub fn with_account(mut self, account: Account, provider: Arc<MockIdentityProvider>) -> Self {
        self.providers.insert(account.name.clone(), provider);
        self.accounts.push(account);
        self
    }

    pub fn with_unreachable_account(mut self, account: Account) -> Self {
        self.accounts.push(account);
        self
    }
}

#[async_trait]
impl Fleet for MockFleet {
    async fn accounts(&self) -> DomainResult<Vec<Account>> {
        Ok(self.accounts.clone())
    }

    async fn provider_for(
        &self,
        account: &Account,
    ) -> DomainResult<Arc<dyn IdentityProvider>> {
        self.providers
            .get(&account.name)
            .cloned()
            .map(|provider| provider as Arc<dyn IdentityProvider>)
            .ok_or_else(|| {
                RotationError::Provider(format!("role assumption failed for {}", account.name))
            })
    }
}
