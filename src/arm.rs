mod auth;
mod client;
mod error;
mod pager;
mod poller;
mod retry;
mod types;

pub use auth::{ClientSecretCredential, StaticToken, TokenCredential, credential_from_settings};
pub use client::{ArmClient, ClientOptions};
pub use error::ArmError;
pub use pager::Pager;
pub use poller::Poller;
pub use retry::{RetryPolicy, TRANSIENT_STATUSES, is_transient, retry_after};
pub use types::{
    AacAudioCodec, AacAudioProfile, ArmList, AuthInfo, AveragePartitionLoadTrigger,
    AverageServiceLoadTrigger, Codec, CopyCodec, ErrorDetail, ErrorResponse, GenericResource,
    H264VideoCodec, KeyVaultSecretReferenceSecretInfo, KeyVaultSecretUriSecretInfo,
    LinkerProperties, LinkerResource, OperationStatus, ProvisioningState, ResourceGroup,
    ResourceGroupProperties, ScalingTrigger, SecretAuthInfo, SecretInfo,
    ServicePrincipalSecretAuthInfo, SystemAssignedIdentityAuthInfo, UserAssignedIdentityAuthInfo,
    ValueSecretInfo, provisioning_state,
};

/// API versions used by the discovery paths.
pub mod api_versions {
    pub const RESOURCES: &str = "2021-04-01";
    pub const NETWORK: &str = "2023-11-01";
}
