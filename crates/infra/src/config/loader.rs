//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `KEYROTOR_BUCKET`: artifact bucket (required)
//! - `KEYROTOR_OPS_ADDRESS`: operations alert address (required)
//! - `KEYROTOR_ACCOUNT`: account name for single-account mode
//! - `KEYROTOR_DRY_RUN`: suppress provider mutations (default: true)
//! - `KEYROTOR_CONSOLE_ECHO`: echo logs to stdout (default: true)
//! - `KEYROTOR_FLEET`: loop every registry account (default: false)
//! - `KEYROTOR_REGISTRY_FROM_BUCKET`: fetch the registry from the bucket
//! - `KEYROTOR_UPLOAD_LOGS`: upload the run log at run end
//! - `KEYROTOR_REGISTRY_PATH`: local registry path
//! - `KEYROTOR_WORKING_DIR`: scratch directory for transient files
//! - `KEYROTOR_LOG_DIR`: directory receiving the rotation log file
//! - `KEYROTOR_SENDER`: from address for notifications
//! - `KEYROTOR_NOTIFY_OPS`: alert operations on missing information
//!
//! ## File Locations
//! The loader probes `config.{json,toml}` and `keyrotor.{json,toml}` in
//! the working directory, its parents (2 levels), and next to the
//! executable.

use std::path::{Path, PathBuf};

use keyrotor_domain::{Config, NotifyConfig, Result, RotationError, RunConfig, StorageConfig};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `RotationError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `KEYROTOR_BUCKET` and `KEYROTOR_OPS_ADDRESS` must be present; every
/// other variable falls back to its default.
///
/// # Errors
/// Returns `RotationError::Config` if required variables are missing or
/// have invalid values.
pub fn load_from_env() -> Result<Config> {
    let bucket = env_var("KEYROTOR_BUCKET")?;
    let ops_address = env_var("KEYROTOR_OPS_ADDRESS")?;

    let run_defaults = RunConfig::default();
    let storage_defaults = StorageConfig::default();
    let notify_defaults = NotifyConfig::default();

    Ok(Config {
        run: RunConfig {
            dry_run: env_bool("KEYROTOR_DRY_RUN", run_defaults.dry_run),
            console_echo: env_bool("KEYROTOR_CONSOLE_ECHO", run_defaults.console_echo),
            fleet: env_bool("KEYROTOR_FLEET", run_defaults.fleet),
            account: env_or("KEYROTOR_ACCOUNT", run_defaults.account),
        },
        storage: StorageConfig {
            bucket,
            registry_from_bucket: env_bool(
                "KEYROTOR_REGISTRY_FROM_BUCKET",
                storage_defaults.registry_from_bucket,
            ),
            upload_logs: env_bool("KEYROTOR_UPLOAD_LOGS", storage_defaults.upload_logs),
            registry_path: env_or("KEYROTOR_REGISTRY_PATH", storage_defaults.registry_path),
            working_dir: env_or("KEYROTOR_WORKING_DIR", storage_defaults.working_dir),
            log_dir: env_or("KEYROTOR_LOG_DIR", storage_defaults.log_dir),
        },
        notify: NotifyConfig {
            ops_address,
            sender: env_or("KEYROTOR_SENDER", notify_defaults.sender),
            notify_ops_on_missing: env_bool(
                "KEYROTOR_NOTIFY_OPS",
                notify_defaults.notify_ops_on_missing,
            ),
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `RotationError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(RotationError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            RotationError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| RotationError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `RotationError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| RotationError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| RotationError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(RotationError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the working directory, its parents (up to 2 levels), and the
/// executable's directory for `config.{json,toml}` and
/// `keyrotor.{json,toml}`.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("keyrotor.json"),
            cwd.join("keyrotor.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
            cwd.join("../../config.json"),
            cwd.join("../../config.toml"),
        ]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("keyrotor.json"),
                exe_dir.join("keyrotor.toml"),
            ]);
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `RotationError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        RotationError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Get an environment variable, falling back to a default.
fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn clear_env() {
        for key in [
            "KEYROTOR_BUCKET",
            "KEYROTOR_OPS_ADDRESS",
            "KEYROTOR_ACCOUNT",
            "KEYROTOR_DRY_RUN",
            "KEYROTOR_CONSOLE_ECHO",
            "KEYROTOR_FLEET",
            "KEYROTOR_REGISTRY_FROM_BUCKET",
            "KEYROTOR_UPLOAD_LOGS",
            "KEYROTOR_REGISTRY_PATH",
            "KEYROTOR_WORKING_DIR",
            "KEYROTOR_LOG_DIR",
            "KEYROTOR_SENDER",
            "KEYROTOR_NOTIFY_OPS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("TEST_BOOL_TRUE_1", "1");
        std::env::set_var("TEST_BOOL_TRUE_YES", "yes");
        std::env::set_var("TEST_BOOL_TRUE_UPPER", "TRUE");
        assert!(env_bool("TEST_BOOL_TRUE_1", false));
        assert!(env_bool("TEST_BOOL_TRUE_YES", false));
        assert!(env_bool("TEST_BOOL_TRUE_UPPER", false));

        std::env::set_var("TEST_BOOL_FALSE_0", "0");
        std::env::set_var("TEST_BOOL_FALSE_OFF", "off");
        assert!(!env_bool("TEST_BOOL_FALSE_0", true));
        assert!(!env_bool("TEST_BOOL_FALSE_OFF", true));

        std::env::remove_var("TEST_BOOL_MISSING");
        assert!(env_bool("TEST_BOOL_MISSING", true));
        assert!(!env_bool("TEST_BOOL_MISSING", false));

        for key in [
            "TEST_BOOL_TRUE_1",
            "TEST_BOOL_TRUE_YES",
            "TEST_BOOL_TRUE_UPPER",
            "TEST_BOOL_FALSE_0",
            "TEST_BOOL_FALSE_OFF",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("KEYROTOR_BUCKET", "key-artifacts");
        std::env::set_var("KEYROTOR_OPS_ADDRESS", "ops@example.com");
        std::env::set_var("KEYROTOR_ACCOUNT", "prod");
        std::env::set_var("KEYROTOR_DRY_RUN", "false");
        std::env::set_var("KEYROTOR_FLEET", "true");
        std::env::set_var("KEYROTOR_UPLOAD_LOGS", "true");
        std::env::set_var("KEYROTOR_WORKING_DIR", "/var/tmp/keyrotor");

        let result = load_from_env();
        assert!(result.is_ok(), "Should load config from env vars, error: {:?}", result.err());

        let config = result.unwrap();
        assert_eq!(config.storage.bucket, "key-artifacts");
        assert_eq!(config.notify.ops_address, "ops@example.com");
        assert_eq!(config.run.account, "prod");
        assert!(!config.run.dry_run);
        assert!(config.run.fleet);
        assert!(config.storage.upload_logs);
        assert_eq!(config.storage.working_dir, "/var/tmp/keyrotor");

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_required_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let result = load_from_env();
        assert!(result.is_err(), "Should fail with missing env var");

        let err = result.unwrap_err();
        assert!(matches!(err, RotationError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_env_applies_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("KEYROTOR_BUCKET", "key-artifacts");
        std::env::set_var("KEYROTOR_OPS_ADDRESS", "ops@example.com");

        let config = load_from_env().unwrap();

        // Destructive operations default to off
        assert!(config.run.dry_run);
        assert!(!config.run.fleet);
        assert!(config.notify.notify_ops_on_missing);

        clear_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let json_content = r#"{
            "run": { "dry_run": false, "console_echo": false, "fleet": true, "account": "" },
            "storage": {
                "bucket": "key-artifacts",
                "registry_from_bucket": true,
                "upload_logs": true,
                "registry_path": "IAMAccountList.json",
                "working_dir": "/var/tmp/keyrotor",
                "log_dir": "/var/log"
            },
            "notify": {
                "ops_address": "ops@example.com",
                "sender": "noreply@example.com",
                "notify_ops_on_missing": false
            }
        }"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = load_from_file(Some(path.clone()));
        assert!(result.is_ok(), "Should load config from JSON file");

        let config = result.unwrap();
        assert_eq!(config.storage.bucket, "key-artifacts");
        assert!(config.run.fleet);
        assert!(!config.notify.notify_ops_on_missing);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let toml_content = r#"
[run]
dry_run = true
console_echo = true
fleet = false
account = "prod"

[storage]
bucket = "key-artifacts"
registry_from_bucket = false
upload_logs = false
registry_path = "IAMAccountList.json"
working_dir = "."
log_dir = "."

[notify]
ops_address = "ops@example.com"
sender = "noreply@example.com"
notify_ops_on_missing = true
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("toml");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = load_from_file(Some(path.clone()));
        assert!(result.is_ok(), "Should load config from TOML file");

        let config = result.unwrap();
        assert_eq!(config.run.account, "prod");
        assert!(config.run.dry_run);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.json")));
        assert!(result.is_err(), "Should fail when file not found");

        let err = result.unwrap_err();
        assert!(matches!(err, RotationError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let invalid_json = r#"{ "this is": "not valid json" "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(invalid_json.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = load_from_file(Some(path.clone()));
        assert!(result.is_err(), "Should fail with invalid JSON");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_config_partial_sections_use_defaults() {
        let json_content = r#"{ "storage": { "bucket": "key-artifacts" } }"#;

        let path = PathBuf::from("test.json");
        let config = parse_config(json_content, &path).unwrap();

        assert_eq!(config.storage.bucket, "key-artifacts");
        assert!(config.run.dry_run, "missing run section should default to dry run");
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let content = "some content";
        let path = PathBuf::from("test.yaml");
        let result = parse_config(content, &path);
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
