use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variables that override the Reddit credentials in the file
const CREDENTIAL_ENV_VARS: [&str; 4] = [
    "REDDIT_CLIENT_ID",
    "REDDIT_CLIENT_SECRET",
    "REDDIT_USERNAME",
    "REDDIT_PASSWORD",
];

/// Loads and parses a configuration file from the given path
///
/// Credentials found in the process environment replace the ones in the
/// file before validation runs.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use threadweb::config::load_config;
///
/// let config = load_config(Path::new("threadweb.toml")).unwrap();
/// println!("Window size: {}", config.crawler.window_size);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let mut config = parse_config(&content)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate(&config)?;

    Ok(config)
}

/// Parses configuration TOML without validating it
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Replaces Reddit credentials with values from `lookup`
///
/// `lookup` receives `REDDIT_CLIENT_ID`, `REDDIT_CLIENT_SECRET`,
/// `REDDIT_USERNAME` and `REDDIT_PASSWORD`; blank values are ignored.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for key in CREDENTIAL_ENV_VARS {
        let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) else {
            continue;
        };

        tracing::debug!("Using {} from the environment", key);
        let reddit = &mut config.reddit;
        match key {
            "REDDIT_CLIENT_ID" => reddit.client_id = value,
            "REDDIT_CLIENT_SECRET" => reddit.client_secret = value,
            "REDDIT_USERNAME" => reddit.username = value,
            _ => reddit.password = value,
        }
    }
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is logged at startup so a crawl report can be traced back to
/// the exact configuration that produced it.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
