use crate::config::types::{
    Config, CrawlerConfig, OutputConfig, RedditConfig, TextConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Longest accepted crawl deadline (one day)
const MAX_CRAWL_TIMEOUT_SECS: u64 = 86_400;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_reddit_config(&config.reddit)?;
    validate_text_config(&config.text)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    if config.window_size < 1 {
        return Err(ConfigError::Validation(
            "window_size must be >= 1".to_string(),
        ));
    }

    if config.crawl_timeout_secs < 1 || config.crawl_timeout_secs > MAX_CRAWL_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "crawl_timeout_secs must be between 1 and {}, got {}",
            MAX_CRAWL_TIMEOUT_SECS, config.crawl_timeout_secs
        )));
    }

    if config.max_tokens_per_identity == Some(0) {
        return Err(ConfigError::Validation(
            "max_tokens_per_identity must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates Reddit endpoints and credentials
fn validate_reddit_config(config: &RedditConfig) -> Result<(), ConfigError> {
    Url::parse(&config.api_base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid api_base_url: {}", e)))?;

    Url::parse(&config.token_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid token_url: {}", e)))?;

    if config.listing_limit < 1 || config.listing_limit > 100 {
        return Err(ConfigError::Validation(format!(
            "listing_limit must be between 1 and 100, got {}",
            config.listing_limit
        )));
    }

    for (name, value) in [
        ("client_id", &config.client_id),
        ("client_secret", &config.client_secret),
        ("username", &config.username),
        ("password", &config.password),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "reddit {} is required (set it in the file or via REDDIT_{})",
                name,
                name.to_uppercase()
            )));
        }
    }

    Ok(())
}

/// Validates tokenizer configuration
fn validate_text_config(config: &TextConfig) -> Result<(), ConfigError> {
    if config.min_token_length < 1 {
        return Err(ConfigError::Validation(
            "min_token_length must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.graph_path.is_empty() {
        return Err(ConfigError::Validation(
            "graph_path cannot be empty".to_string(),
        ));
    }

    if matches!(&config.report_path, Some(path) if path.is_empty()) {
        return Err(ConfigError::Validation(
            "report_path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
