use std::collections::HashMap;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Deserialize)]
struct OAuthTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}

/// Exchanges a stored refresh token for a short-lived access token. The
/// OAuth consent itself happens in the helpdesk web app; a failed exchange
/// means the credential is expired or revoked and will keep failing, so
/// there are no retries here: exactly one HTTP call per invocation.
pub async fn resolve_access_token(
    refresh_token: &str,
    client_id: &str,
    client_secret: Option<&str>,
) -> AppResult<String> {
    let mut form = HashMap::from([
        ("grant_type", "refresh_token".to_string()),
        ("refresh_token", refresh_token.to_string()),
        ("client_id", client_id.to_string()),
    ]);

    if let Some(client_secret) = client_secret {
        form.insert("client_secret", client_secret.to_string());
    }

    let response = reqwest::Client::new()
        .post(GOOGLE_TOKEN_ENDPOINT)
        .form(&form)
        .send()
        .await?;

    if response.status().is_success() {
        let payload: OAuthTokenResponse = response.json().await?;
        return Ok(payload.access_token);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(map_token_error(status, &body))
}

/// Every token-endpoint failure surfaces as a credential error: the caller
/// turns it into a "reconnect your mailbox" prompt, never a silent retry.
fn map_token_error(status: StatusCode, body: &str) -> AppError {
    if let Ok(payload) = serde_json::from_str::<OAuthErrorResponse>(body) {
        let error = payload.error.unwrap_or_else(|| "unknown_oauth_error".to_string());
        let description = payload
            .error_description
            .unwrap_or_else(|| "no description".to_string());
        return AppError::Credential(format!(
            "token refresh failed ({status}): {error} ({description})"
        ));
    }

    let body = body.trim();
    if body.is_empty() {
        return AppError::Credential(format!(
            "token refresh failed ({status}): no error details in response body"
        ));
    }

    AppError::Credential(format!("token refresh failed ({status}): {body}"))
}
