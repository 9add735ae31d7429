use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::auth::{StaticToken, TokenCredential};
use super::pager::Pager;
use super::poller::Poller;
use super::retry::{RetryPolicy, is_transient};
use super::types::ErrorDetail;
use super::ArmError;
use crate::config::Settings;

const DEFAULT_USER_AGENT: &str = concat!("azrm/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub poll_interval: Duration,
    pub poll_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        let settings = Settings::default();
        Self::from_settings(&settings)
    }
}

impl ClientOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            base_url: settings.environment.resource_manager_endpoint().to_string(),
            poll_interval: settings.poll_interval,
            poll_timeout: settings.poll_timeout,
            retry: RetryPolicy {
                max_retries: settings.max_retries,
                base_delay: settings.retry_base_delay,
            },
        }
    }
}

/// Thin Resource Manager client: bearer auth, `api-version`, expected
/// status codes, transient retries, pagination and LRO polling.
#[derive(Clone)]
pub struct ArmClient {
    http: reqwest::Client,
    credential: Arc<dyn TokenCredential>,
    options: ClientOptions,
}

impl ArmClient {
    pub fn new(
        credential: Arc<dyn TokenCredential>,
        options: ClientOptions,
    ) -> Result<Self, ArmError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ArmError::Network)?;

        Ok(Self {
            http,
            credential,
            options,
        })
    }

    /// NOTE: Primarily used for testing with mock servers.
    pub fn with_base_url(token: String, base_url: String) -> Result<Self, ArmError> {
        let options = ClientOptions {
            base_url,
            ..ClientOptions::default()
        };
        Self::new(Arc::new(StaticToken::new(token)), options)
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn api_base(&self) -> &str {
        &self.options.base_url
    }

    /// Absolute URL for a resource ID (or any ARM path) at `api_version`.
    pub fn resource_url(&self, id: &str, api_version: &str) -> String {
        let separator = if id.contains('?') { '&' } else { '?' };
        format!(
            "{}/{}{}api-version={}",
            self.options.base_url.trim_end_matches('/'),
            id.trim_start_matches('/'),
            separator,
            urlencoding::encode(api_version)
        )
    }

    /// Sends one request, retrying transient failures per the retry policy.
    /// The final response is returned whatever its status.
    pub(crate) async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Response, ArmError> {
        let retry = self.options.retry;
        let mut attempt = 0u32;

        loop {
            let token = self.credential.token().await?;
            let mut request = self.http.request(method.clone(), url).bearer_auth(token);
            if let Some(body) = body {
                request = request.json(body);
            }

            tracing::debug!(%method, %url, attempt, "sending request");

            match request.send().await {
                Ok(response) if is_transient(response.status()) && retry.should_retry(attempt) => {
                    let delay = retry.delay_for(attempt, response.headers());
                    tracing::warn!(
                        status = response.status().as_u16(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "transient response, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Ok(response) => return Ok(response),
                Err(err) if (err.is_connect() || err.is_timeout()) && retry.should_retry(attempt) => {
                    let delay = retry.backoff(attempt);
                    tracing::warn!(error = %err, attempt, "request failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(ArmError::Network(err)),
            }

            attempt += 1;
        }
    }

    /// Passes `response` through if its status is expected, else turns it
    /// into an error carrying the ARM error code and message.
    pub(crate) async fn check_status(
        &self,
        response: Response,
        expected: &[u16],
        id: &str,
    ) -> Result<Response, ArmError> {
        if expected.contains(&response.status().as_u16()) {
            return Ok(response);
        }
        Err(error_from_response(response, id).await)
    }

    pub(crate) async fn get_url_json(&self, url: &str, id: &str) -> Result<Value, ArmError> {
        let response = self.send(Method::GET, url, None).await?;
        let response = self.check_status(response, &[200], id).await?;
        read_json(response).await
    }

    pub async fn get_json(&self, id: &str, api_version: &str) -> Result<Value, ArmError> {
        let url = self.resource_url(id, api_version);
        self.get_url_json(&url, id).await
    }

    pub async fn get<T: DeserializeOwned>(&self, id: &str, api_version: &str) -> Result<T, ArmError> {
        let value = self.get_json(id, api_version).await?;
        serde_json::from_value(value).map_err(|e| ArmError::Decode {
            message: format!("{}: {}", id, e),
        })
    }

    pub async fn exists(&self, id: &str, api_version: &str) -> Result<bool, ArmError> {
        match self.get_json(id, api_version).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub async fn create_or_update<B: Serialize + ?Sized>(
        &self,
        id: &str,
        api_version: &str,
        body: &B,
    ) -> Result<Poller, ArmError> {
        let body = to_value(body)?;
        self.start(Method::PUT, id, api_version, Some(&body), &[200, 201, 202])
            .await
    }

    pub async fn update<B: Serialize + ?Sized>(
        &self,
        id: &str,
        api_version: &str,
        body: &B,
    ) -> Result<Poller, ArmError> {
        let body = to_value(body)?;
        self.start(Method::PATCH, id, api_version, Some(&body), &[200, 202])
            .await
    }

    pub async fn delete(&self, id: &str, api_version: &str) -> Result<Poller, ArmError> {
        self.start(Method::DELETE, id, api_version, None, &[200, 202, 204])
            .await
    }

    /// Action endpoints such as `.../restart` or `.../listKeys`.
    pub async fn post(
        &self,
        path: &str,
        api_version: &str,
        body: Option<&Value>,
    ) -> Result<Poller, ArmError> {
        self.start(Method::POST, path, api_version, body, &[200, 202, 204])
            .await
    }

    async fn start(
        &self,
        method: Method,
        id: &str,
        api_version: &str,
        body: Option<&Value>,
        expected: &[u16],
    ) -> Result<Poller, ArmError> {
        let url = self.resource_url(id, api_version);
        let response = self.send(method.clone(), &url, body).await?;
        let response = self.check_status(response, expected, id).await?;
        Poller::from_response(self.clone(), method, url, id.to_string(), response).await
    }

    pub fn list<T: DeserializeOwned>(&self, path: &str, api_version: &str) -> Pager<T> {
        Pager::new(self.clone(), self.resource_url(path, api_version))
    }

    pub async fn list_all<T: DeserializeOwned>(
        &self,
        path: &str,
        api_version: &str,
    ) -> Result<Vec<T>, ArmError> {
        self.list(path, api_version).collect_all().await
    }

    /// Polls a resource until `properties.provisioningState` is terminal.
    pub async fn wait_for_provisioning_state(
        &self,
        id: &str,
        api_version: &str,
    ) -> Result<Value, ArmError> {
        let url = self.resource_url(id, api_version);
        Poller::provisioning_state(self.clone(), url, id.to_string())
            .poll_until_done()
            .await
            .map(Option::unwrap_or_default)
    }
}

impl std::fmt::Debug for ArmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArmClient")
            .field("base_url", &self.options.base_url)
            .field("credential", &"[REDACTED]")
            .finish()
    }
}

fn to_value<B: Serialize + ?Sized>(body: &B) -> Result<Value, ArmError> {
    serde_json::to_value(body).map_err(|e| ArmError::Decode {
        message: format!("Failed to encode request body: {}", e),
    })
}

pub(crate) async fn error_from_response(response: Response, id: &str) -> ArmError {
    let status = response.status().as_u16();
    if status == 404 {
        return ArmError::NotFound { id: id.to_string() };
    }

    let body = response.text().await.unwrap_or_default();
    let detail = ErrorDetail::from_body(&body);
    tracing::debug!(status, code = %detail.code, "unexpected status");

    ArmError::UnexpectedStatus {
        status,
        code: detail.code,
        message: detail.message,
    }
}

/// Reads a JSON body; an empty body decodes as `null`.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ArmError> {
    let text = response.text().await?;
    let text = if text.trim().is_empty() {
        "null"
    } else {
        text.as_str()
    };
    serde_json::from_str(text).map_err(|e| ArmError::Decode {
        message: format!("Failed to parse response: {}", e),
    })
}
