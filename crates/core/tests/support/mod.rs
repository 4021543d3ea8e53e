//! Shared test support: mock collaborators and a wired-up harness

pub mod collaborators;

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use keyrotor_core::{
    DistributionPipeline, FleetRunner, LifecycleExecutor, NotificationDispatcher, RunLog,
};
use keyrotor_domain::{Account, Config, KeyRecord, RecipientSpec};

use collaborators::{
    MockDirectory, MockEncryptor, MockFleet, MockIdentityProvider, MockObjectStore, MockTransport,
    MockWorkingDir,
};

/// A key record in the harness's default account.
pub fn key(principal: &str, id: &str, offset_days: i64) -> KeyRecord {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().unwrap();
    KeyRecord {
        id: id.to_string(),
        account: "prod".to_string(),
        principal: principal.to_string(),
        created_at: base + Duration::days(offset_days),
    }
}

/// Recipient spec with a team key plus one principal key.
pub fn recipients() -> RecipientSpec {
    RecipientSpec::new(vec!["ops@example.com".to_string(), "owner@example.com".to_string()])
}

/// Production-shaped config for the test account.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.run.dry_run = false;
    config.run.console_echo = false;
    config.run.account = "prod".to_string();
    config.storage.bucket = "test-bucket".to_string();
    config.notify.ops_address = "ops@example.com".to_string();
    config.notify.sender = "noreply@example.com".to_string();
    config
}

/// Fully wired rotation pipeline over mock collaborators.
pub struct Harness {
    pub provider: Arc<MockIdentityProvider>,
    pub store: Arc<MockObjectStore>,
    pub encryptor: Arc<MockEncryptor>,
    pub transport: Arc<MockTransport>,
    pub workdir: Arc<MockWorkingDir>,
    pub run_log: Arc<RunLog>,
    pub runner: FleetRunner,
}

/// Wire the full pipeline for a single mock account.
pub fn harness(
    provider: MockIdentityProvider,
    directory: MockDirectory,
    config: Config,
) -> Harness {
    let provider = Arc::new(provider);
    let fleet = MockFleet::default().with_account(Account::ambient("prod"), provider.clone());
    harness_with_fleet(fleet, provider, directory, config)
}

/// Wire the full pipeline over a caller-assembled fleet.
pub fn harness_with_fleet(
    fleet: MockFleet,
    provider: Arc<MockIdentityProvider>,
    directory: MockDirectory,
    config: Config,
) -> Harness {
    let directory = Arc::new(directory);
    let store = Arc::new(MockObjectStore::default());
    let encryptor = Arc::new(MockEncryptor::default());
    let transport = Arc::new(MockTransport::default());
    let workdir = Arc::new(MockWorkingDir::default());
    let run_log = Arc::new(RunLog::new());

    let pipeline = DistributionPipeline::new(
        store.clone(),
        encryptor.clone(),
        directory.clone(),
        workdir.clone(),
    );
    let notifier = Arc::new(NotificationDispatcher::new(
        transport.clone(),
        directory.clone(),
        config.notify.ops_address.clone(),
    ));
    let executor = LifecycleExecutor::new(
        pipeline,
        notifier,
        store.clone(),
        workdir.clone(),
        run_log.clone(),
        config.run.dry_run,
        config.notify.notify_ops_on_missing,
    );
    let runner = FleetRunner::new(
        Arc::new(fleet),
        directory,
        executor,
        store.clone(),
        workdir.clone(),
        run_log.clone(),
        config,
    );

    Harness { provider, store, encryptor, transport, workdir, run_log, runner }
}
