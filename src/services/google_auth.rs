//! Shared Google OAuth refresh-token flow for the YouTube and Drive adapters.

use std::env;

use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use super::error::ServiceError;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

#[derive(Clone)]
pub struct GoogleAuth {
    client_id: String,
    client_secret: String,
    refresh_token: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl GoogleAuth {
    pub fn new(client_id: &str, client_secret: &str, refresh_token: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            refresh_token: refresh_token.to_string(),
            http: Client::new(),
        }
    }

    /// Read `<PREFIX>_CLIENT_ID` / `_CLIENT_SECRET` / `_REFRESH_TOKEN`,
    /// falling back to the `YOUTUBE_*` set when the prefixed variable is
    /// absent (both Google services can share one OAuth client).
    pub fn from_env(prefix: &str) -> Self {
        let var = |suffix: &str| {
            env::var(format!("{}_{}", prefix, suffix))
                .or_else(|_| env::var(format!("YOUTUBE_{}", suffix)))
                .unwrap_or_default()
        };

        let client_id = var("CLIENT_ID");
        let client_secret = var("CLIENT_SECRET");
        let refresh_token = var("REFRESH_TOKEN");

        if client_id.is_empty() || refresh_token.is_empty() {
            warn!(
                "{} OAuth credentials not configured; uploads will fail",
                prefix
            );
        }

        Self::new(&client_id, &client_secret, &refresh_token)
    }

    /// Exchange the stored refresh token for a short-lived access token.
    pub async fn access_token(&self) -> Result<String, ServiceError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", self.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let resp = self.http.post(TOKEN_URL).form(&params).send().await?;

        if !resp.status().is_success() {
            let text = resp.text().await?;
            return Err(ServiceError::Api(format!("Token refresh failed: {}", text)));
        }

        let token: TokenResponse = resp.json().await?;
        Ok(token.access_token)
    }
}
