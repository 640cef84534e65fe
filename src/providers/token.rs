use std::time::Duration;

#[allow(unused_imports)]
use cached::proc_macro::cached;
use serde::Deserialize;
use tracing::debug;

use crate::config::GraphConfig;

/// OAuth2 token response from the Microsoft identity platform.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[allow(dead_code)]
    expires_in: i64,
    #[allow(dead_code)]
    token_type: String,
}

/// Acquires a Graph access token with the client credentials flow.
/// Caches results for 3000 seconds; Entra issues app tokens valid for about an hour.
#[cfg_attr(not(test), cached(time = 3000, result = true))]
pub async fn acquire_token(config: GraphConfig) -> Result<String, String> {
    let token_url = config.token_url();
    debug!("Requesting access token from '{}'", token_url);

    let params = [
        ("grant_type", "client_credentials".to_string()),
        ("client_id", config.client_id.clone()),
        ("client_secret", config.client_secret.clone()),
        ("scope", config.scope()),
    ];

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.timeout_in_ms))
        .build()
        .map_err(|e| format!("Failed to create HTTP client: {}", e))?;
    let response = client
        .post(&token_url)
        .form(&params)
        .send()
        .await
        .map_err(|e| format!("Token request failed: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(format!(
            "Token request failed with status {}: {}",
            status, body
        ));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse token response: {}", e))?;

    debug!("Acquired access token");
    Ok(token.access_token)
}
