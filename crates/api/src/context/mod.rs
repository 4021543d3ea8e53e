//! Application context - dependency injection container

use std::sync::Arc;

use keyrotor_core::{
    AllowList, DistributionPipeline, Encryptor, Fleet, FleetRunner, LifecycleExecutor,
    NotificationDispatcher, ObjectStore, RecipientDirectory, RunLog, Transport, WorkingDir,
};
use keyrotor_domain::constants::REGISTRY_OBJECT_KEY;
use keyrotor_domain::{Account, Config, Result, RotationError};
use keyrotor_infra::{
    AccountRegistry, GpgEncryptor, LogTransport, S3ObjectStore, ScratchDir, SesTransport, StsFleet,
};

/// Application context - holds the fully wired fleet runner
pub struct AppContext {
    pub config: Config,
    pub runner: FleetRunner,
}

impl AppContext {
    /// Wire every adapter and service from the given configuration.
    pub async fn new(config: Config) -> Result<Self> {
        let aws = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        let store: Arc<dyn ObjectStore> = Arc::new(S3ObjectStore::new(
            aws_sdk_s3::Client::new(&aws),
            config.storage.bucket.clone(),
        ));

        // Account registry: local file, or the copy kept in the bucket.
        let registry = if config.storage.registry_from_bucket {
            let bytes = store.get(REGISTRY_OBJECT_KEY).await?;
            AccountRegistry::from_json(&bytes)?
        } else {
            AccountRegistry::from_file(&config.storage.registry_path)?
        };
        let registry = Arc::new(registry);

        let fleet: Arc<dyn Fleet> = if config.run.fleet {
            Arc::new(StsFleet::new(registry.accounts(), aws.clone()))
        } else {
            if config.run.account.is_empty() {
                return Err(RotationError::Config(
                    "single-account mode requires an account name".to_string(),
                ));
            }
            Arc::new(StsFleet::single(Account::ambient(&config.run.account), aws.clone()))
        };

        // Non-production runs route every message to the log sink with
        // production-identical content.
        let transport: Arc<dyn Transport> = if config.run.dry_run {
            Arc::new(LogTransport)
        } else {
            Arc::new(SesTransport::new(
                aws_sdk_sesv2::Client::new(&aws),
                config.notify.sender.clone(),
            ))
        };

        let encryptor: Arc<dyn Encryptor> = Arc::new(GpgEncryptor::new());
        let workdir: Arc<dyn WorkingDir> =
            Arc::new(ScratchDir::new(config.storage.working_dir.clone()));
        let directory: Arc<dyn RecipientDirectory> = registry.clone();
        let allow_list: Arc<dyn AllowList> = registry.clone();
        let run_log = Arc::new(RunLog::new());

        let pipeline = DistributionPipeline::new(
            store.clone(),
            encryptor,
            directory.clone(),
            workdir.clone(),
        );
        let notifier = Arc::new(NotificationDispatcher::new(
            transport,
            directory,
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
            fleet,
            allow_list,
            executor,
            store,
            workdir,
            run_log,
            config.clone(),
        );

        Ok(Self { config, runner })
    }
}
