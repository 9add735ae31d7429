use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;

use super::ArmError;
use crate::config::Settings;

/// Tokens are refreshed this long before they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(300);

#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// A bearer token valid for the Resource Manager audience.
    async fn token(&self) -> Result<String, ArmError>;
}

/// A pre-issued token, e.g. from `az account get-access-token`.
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenCredential for StaticToken {
    async fn token(&self) -> Result<String, ArmError> {
        Ok(self.token.clone())
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticToken")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Azure AD client-credentials grant for a service principal.
pub struct ClientSecretCredential {
    http: reqwest::Client,
    authority: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    scope: String,
    cache: Mutex<Option<CachedToken>>,
}

impl ClientSecretCredential {
    pub fn new(
        authority: impl Into<String>,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            authority: authority.into(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: scope.into(),
            cache: Mutex::new(None),
        }
    }

    async fn request_token(&self) -> Result<CachedToken, ArmError> {
        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority.trim_end_matches('/'),
            self.tenant_id
        );

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", self.scope.as_str()),
        ];

        let response = self.http.post(&url).form(&params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<TokenErrorResponse>(&body)
                .ok()
                .map(|e| e.error_description.unwrap_or(e.error))
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("token endpoint returned {}", status.as_u16()));
            return Err(ArmError::Auth { message });
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| ArmError::Auth {
            message: format!("Failed to parse token response: {}", e),
        })?;

        tracing::debug!(expires_in = token.expires_in, "acquired access token");

        Ok(CachedToken {
            token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }
}

#[async_trait]
impl TokenCredential for ClientSecretCredential {
    async fn token(&self) -> Result<String, ArmError> {
        let mut cache = self.cache.lock().await;

        if let Some(cached) = cache.as_ref() {
            if cached.expires_at > Instant::now() + EXPIRY_MARGIN {
                return Ok(cached.token.clone());
            }
        }

        let fresh = self.request_token().await?;
        let token = fresh.token.clone();
        *cache = Some(fresh);
        Ok(token)
    }
}

impl fmt::Debug for ClientSecretCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSecretCredential")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Picks a credential from the resolved settings: an explicit access token
/// wins over a service principal.
pub fn credential_from_settings(settings: &Settings) -> Result<Arc<dyn TokenCredential>, ArmError> {
    if let Some(token) = &settings.access_token {
        return Ok(Arc::new(StaticToken::new(token.clone())));
    }

    match (&settings.tenant_id, &settings.client_id, &settings.client_secret) {
        (Some(tenant_id), Some(client_id), Some(client_secret)) => {
            Ok(Arc::new(ClientSecretCredential::new(
                settings.environment.authority_host(),
                tenant_id.clone(),
                client_id.clone(),
                client_secret.clone(),
                settings.environment.token_scope(),
            )))
        }
        _ => Err(ArmError::Auth {
            message: "No credentials provided. Set AZURE_ACCESS_TOKEN, or AZURE_TENANT_ID, AZURE_CLIENT_ID and AZURE_CLIENT_SECRET"
                .to_string(),
        }),
    }
}
