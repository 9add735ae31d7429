use thiserror::Error;

use crate::resourceids::ResourceIdError;

/// Errors raised while talking to Azure Resource Manager.
///
/// SECURITY: messages must NEVER contain bearer tokens or client secrets.
#[derive(Debug, Error)]
pub enum ArmError {
    /// Token acquisition failed or no usable credential was configured
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// The resource does not exist (HTTP 404)
    #[error("resource not found: {id}")]
    NotFound { id: String },

    /// Status code outside the set the operation expects
    #[error("unexpected status {status} with error {code}: {message}")]
    UnexpectedStatus {
        status: u16,
        code: String,
        message: String,
    },

    /// Network-level error (connection failed, timeout, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decoding response: {message}")]
    Decode { message: String },

    #[error("long-running operation finished with status {status}: {code}: {message}")]
    OperationFailed {
        status: String,
        code: String,
        message: String,
    },

    #[error("timed out after {timeout_secs}s waiting for the operation to complete")]
    PollTimeout { timeout_secs: u64 },

    #[error("pagination loop detected: nextLink {next_link} was already fetched")]
    PaginationLoop { next_link: String },

    #[error(transparent)]
    ResourceId(#[from] ResourceIdError),
}

impl ArmError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ArmError::NotFound { .. })
    }
}

impl From<ArmError> for crate::providers::ProviderError {
    fn from(err: ArmError) -> Self {
        crate::providers::ProviderError::Azure(err.to_string())
    }
}
