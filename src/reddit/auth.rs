//! OAuth token acquisition for Reddit script apps

use crate::config::RedditConfig;
use crate::ThreadwebError;
use reqwest::Client;
use serde_json::Value;

/// Requests a bearer token with the password grant
///
/// The client id and secret go in HTTP basic auth; the account credentials
/// go in the form body.
///
/// # Returns
///
/// * `Ok(String)` - The access token
/// * `Err(ThreadwebError::Auth)` - Request failed, was rejected, or carried no token
pub async fn fetch_access_token(
    http: &Client,
    config: &RedditConfig,
) -> Result<String, ThreadwebError> {
    tracing::debug!("Requesting access token from {}", config.token_url);

    let response = http
        .post(&config.token_url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&[
            ("grant_type", "password"),
            ("username", config.username.as_str()),
            ("password", config.password.as_str()),
        ])
        .send()
        .await
        .map_err(|e| ThreadwebError::Auth(format!("token request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ThreadwebError::Auth(format!(
            "token request failed with HTTP {}",
            status
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| ThreadwebError::Auth(format!("failed to read token response: {}", e)))?;
    let json: Value = serde_json::from_str(&body)
        .map_err(|e| ThreadwebError::Auth(format!("token response is not JSON: {}", e)))?;

    // Reddit answers bad credentials with 200 and an `error` field
    if let Some(error) = json.get("error") {
        return Err(ThreadwebError::Auth(format!("token request rejected: {}", error)));
    }

    let token = json
        .get("access_token")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            ThreadwebError::Auth("token response did not contain an access_token".to_string())
        })?;

    tracing::info!("Authenticated as {}", config.username);
    Ok(token.to_string())
}
