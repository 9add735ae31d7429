use std::time::Duration;

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde_json::Value;

use super::client::{ArmClient, error_from_response, read_json};
use super::retry::retry_after;
use super::types::{ErrorDetail, OperationStatus, ProvisioningState, provisioning_state};
use super::ArmError;

const AZURE_ASYNC_OPERATION: &str = "azure-asyncoperation";
const LOCATION: &str = "location";

#[derive(Debug)]
enum PollState {
    Done(Option<Value>),
    /// Poll the operation-status URL until its `status` is terminal.
    AsyncOperation {
        url: String,
        location: Option<String>,
    },
    /// Poll the `Location` URL until it stops answering 202.
    Location { url: String },
    /// Re-read the resource until `provisioningState` is terminal.
    ProvisioningState,
}

/// Tracks one long-running operation started by a mutating call.
#[derive(Debug)]
pub struct Poller {
    client: ArmClient,
    method: Method,
    resource_url: String,
    id: String,
    state: PollState,
    delay: Duration,
}

impl Poller {
    pub(crate) async fn from_response(
        client: ArmClient,
        method: Method,
        resource_url: String,
        id: String,
        response: reqwest::Response,
    ) -> Result<Self, ArmError> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body: Value = read_json(response).await?;
        let body = (!body.is_null()).then_some(body);

        let async_operation = header(&headers, AZURE_ASYNC_OPERATION);
        let location = header(&headers, LOCATION);
        let delay = retry_after(&headers).unwrap_or(client.options().poll_interval);
        let mutates_resource = method == Method::PUT || method == Method::PATCH;

        let state = if let Some(url) = async_operation {
            PollState::AsyncOperation { url, location }
        } else if let (Some(url), 201 | 202) = (location, status) {
            PollState::Location { url }
        } else {
            match body.as_ref().and_then(provisioning_state) {
                Some(state) if state.is_terminal() && !state.is_success() => {
                    return Err(operation_failed(&state, None));
                }
                Some(state) if !state.is_terminal() && mutates_resource => {
                    PollState::ProvisioningState
                }
                _ => PollState::Done(body),
            }
        };

        tracing::debug!(%method, status, state = ?state, "started long-running operation");

        Ok(Self {
            client,
            method,
            resource_url,
            id,
            state,
            delay,
        })
    }

    /// Polls an existing resource until its provisioning state settles.
    pub(crate) fn provisioning_state(client: ArmClient, resource_url: String, id: String) -> Self {
        Self {
            client,
            method: Method::GET,
            resource_url,
            id,
            state: PollState::ProvisioningState,
            delay: Duration::ZERO,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, PollState::Done(_))
    }

    /// Blocks until the operation finishes, returning the final resource
    /// body where the operation produces one.
    pub async fn poll_until_done(self) -> Result<Option<Value>, ArmError> {
        let timeout = self.client.options().poll_timeout;
        match tokio::time::timeout(timeout, self.run()).await {
            Ok(result) => result,
            Err(_) => Err(ArmError::PollTimeout {
                timeout_secs: timeout.as_secs(),
            }),
        }
    }

    async fn run(self) -> Result<Option<Value>, ArmError> {
        let Self {
            client,
            method,
            resource_url,
            id,
            state,
            mut delay,
        } = self;
        let interval = client.options().poll_interval;

        match state {
            PollState::Done(body) => Ok(body),

            PollState::AsyncOperation { url, location } => {
                loop {
                    tokio::time::sleep(delay).await;

                    let response = client.send(Method::GET, &url, None).await?;
                    let response = client.check_status(response, &[200, 201, 202], &id).await?;
                    let next_delay = retry_after(response.headers());
                    let operation: OperationStatus = read_json(response).await?;

                    tracing::debug!(status = %operation.status, "polled operation status");

                    if operation.status.is_success() {
                        break;
                    }
                    if operation.status.is_terminal() {
                        return Err(operation_failed(&operation.status, operation.error));
                    }
                    delay = next_delay.unwrap_or(interval);
                }

                if method == Method::PUT || method == Method::PATCH {
                    return client.get_url_json(&resource_url, &id).await.map(Some);
                }

                match (method == Method::POST, location) {
                    (true, Some(location)) => {
                        let response = client.send(Method::GET, &location, None).await?;
                        let response = client.check_status(response, &[200, 204], &id).await?;
                        let body: Value = read_json(response).await?;
                        Ok((!body.is_null()).then_some(body))
                    }
                    _ => Ok(None),
                }
            }

            PollState::Location { url } => loop {
                tokio::time::sleep(delay).await;

                let response = client.send(Method::GET, &url, None).await?;
                match response.status().as_u16() {
                    202 => {
                        delay = retry_after(response.headers()).unwrap_or(interval);
                        tracing::debug!("operation still in progress");
                    }
                    200 | 201 | 204 => {
                        let body: Value = read_json(response).await?;
                        return Ok((!body.is_null()).then_some(body));
                    }
                    404 if method == Method::DELETE => return Ok(None),
                    _ => return Err(error_from_response(response, &id).await),
                }
            },

            PollState::ProvisioningState => loop {
                tokio::time::sleep(delay).await;

                let body = client.get_url_json(&resource_url, &id).await?;
                match provisioning_state(&body) {
                    Some(state) if state.is_success() => return Ok(Some(body)),
                    Some(state) if state.is_terminal() => {
                        return Err(operation_failed(&state, None));
                    }
                    Some(state) => {
                        tracing::debug!(state = %state, "resource still provisioning");
                        delay = interval;
                    }
                    None => return Ok(Some(body)),
                }
            },
        }
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn operation_failed(state: &ProvisioningState, error: Option<ErrorDetail>) -> ArmError {
    let error = error.unwrap_or_default();
    ArmError::OperationFailed {
        status: state.to_string(),
        code: if error.code.is_empty() {
            "OperationFailed".to_string()
        } else {
            error.code
        },
        message: if error.message.is_empty() {
            "the operation did not succeed".to_string()
        } else {
            error.message
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Azure-AsyncOperation",
            HeaderValue::from_static("https://management.azure.com/operations/1"),
        );
        assert_eq!(
            header(&headers, AZURE_ASYNC_OPERATION).as_deref(),
            Some("https://management.azure.com/operations/1")
        );
        assert_eq!(header(&headers, LOCATION), None);
    }

    #[test]
    fn test_header_blank_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("location", HeaderValue::from_static("  "));
        assert_eq!(header(&headers, LOCATION), None);
    }

    #[test]
    fn test_operation_failed_defaults() {
        let err = operation_failed(&ProvisioningState::Canceled, None);
        assert_eq!(
            err.to_string(),
            "long-running operation finished with status Canceled: OperationFailed: the operation did not succeed"
        );
    }

    #[test]
    fn test_operation_failed_uses_error_detail() {
        let detail = ErrorDetail {
            code: "SkuNotAvailable".to_string(),
            message: "The requested size is not available".to_string(),
            ..Default::default()
        };
        let err = operation_failed(&ProvisioningState::Failed, Some(detail));
        match err {
            ArmError::OperationFailed { code, message, .. } => {
                assert_eq!(code, "SkuNotAvailable");
                assert_eq!(message, "The requested size is not available");
            }
            other => panic!("expected OperationFailed, got {:?}", other),
        }
    }
}
