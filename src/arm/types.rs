use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

crate::arm_enum! {
    /// `properties.provisioningState` of an ARM resource.
    pub enum ProvisioningState {
        Succeeded => "Succeeded",
        Failed => "Failed",
        Canceled => "Canceled",
        Creating => "Creating",
        Updating => "Updating",
        Deleting => "Deleting",
        Accepted => "Accepted",
        Running => "Running",
        InProgress => "InProgress",
        Provisioning => "Provisioning",
    }
}

impl ProvisioningState {
    /// Unknown states are treated as still in progress.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Reads `properties.provisioningState` from a resource body.
pub fn provisioning_state(body: &Value) -> Option<ProvisioningState> {
    body.get("properties")
        .and_then(|p| p.get("provisioningState"))
        .and_then(Value::as_str)
        .map(ProvisioningState::from)
}

/// One page of an ARM list response.
#[derive(Debug, Deserialize)]
pub struct ArmList<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "nextLink", default)]
    pub next_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericResource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    #[serde(default)]
    pub properties: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceGroup {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    #[serde(default)]
    pub properties: Option<ResourceGroupProperties>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroupProperties {
    #[serde(default)]
    pub provisioning_state: Option<ProvisioningState>,
}

/// `{"error": {...}}` as returned by most resource providers.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub details: Vec<ErrorDetail>,
}

impl ErrorDetail {
    /// Extracts the error from a response body, whether wrapped in `error`
    /// or not. Falls back to the raw text for non-JSON bodies.
    pub fn from_body(body: &str) -> Self {
        if let Ok(wrapped) = serde_json::from_str::<ErrorResponse>(body) {
            return wrapped.error;
        }
        if let Ok(detail) = serde_json::from_str::<ErrorDetail>(body) {
            if !detail.code.is_empty() || !detail.message.is_empty() {
                return detail;
            }
        }

        let text = body.trim();
        Self {
            code: "Unknown".to_string(),
            message: if text.is_empty() {
                "no error body".to_string()
            } else {
                text.chars().take(512).collect()
            },
            ..Default::default()
        }
    }
}

/// Body of an `Azure-AsyncOperation` status endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationStatus {
    pub status: ProvisioningState,
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

// Service Linker authentication, discriminated by `authType`.

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueSecretInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl fmt::Debug for ValueSecretInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueSecretInfo")
            .field("value", &self.value.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyVaultSecretReferenceSecretInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyVaultSecretUriSecretInfo {
    pub value: String,
}

crate::discriminated_union! {
    pub enum SecretInfo: "secretType" {
        RawValue(ValueSecretInfo) => "rawValue",
        KeyVaultSecretReference(KeyVaultSecretReferenceSecretInfo) => "keyVaultSecretReference",
        KeyVaultSecretUri(KeyVaultSecretUriSecretInfo) => "keyVaultSecretUri",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretAuthInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_info: Option<SecretInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemAssignedIdentityAuthInfo {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAssignedIdentityAuthInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePrincipalSecretAuthInfo {
    pub client_id: String,
    pub principal_id: String,
    pub secret: String,
}

impl fmt::Debug for ServicePrincipalSecretAuthInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServicePrincipalSecretAuthInfo")
            .field("client_id", &self.client_id)
            .field("principal_id", &self.principal_id)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

crate::discriminated_union! {
    pub enum AuthInfo: "authType" {
        Secret(SecretAuthInfo) => "secret",
        SystemAssignedIdentity(SystemAssignedIdentityAuthInfo) => "systemAssignedIdentity",
        UserAssignedIdentity(UserAssignedIdentityAuthInfo) => "userAssignedIdentity",
        ServicePrincipalSecret(ServicePrincipalSecretAuthInfo) => "servicePrincipalSecret",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkerProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_info: Option<AuthInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_service: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkerResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub properties: LinkerProperties,
}

// Media Services codecs, discriminated by `@odata.type`.

crate::arm_enum! {
    pub enum AacAudioProfile {
        AacLc => "AacLc",
        HeAacV1 => "HeAacV1",
        HeAacV2 => "HeAacV2",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AacAudioCodec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<AacAudioProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct H264VideoCodec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_frame_interval: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layers: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyCodec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

crate::discriminated_union! {
    pub enum Codec: "@odata.type" {
        AacAudio(AacAudioCodec) => "#Microsoft.Media.AacAudio",
        H264Video(H264VideoCodec) => "#Microsoft.Media.H264Video",
        CopyVideo(CopyCodec) => "#Microsoft.Media.CopyVideo",
        CopyAudio(CopyCodec) => "#Microsoft.Media.CopyAudio",
    }
}

// Service Fabric scaling triggers, discriminated by `kind`.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AveragePartitionLoadTrigger {
    pub metric_name: String,
    pub lower_load_threshold: f64,
    pub upper_load_threshold: f64,
    pub scale_interval: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageServiceLoadTrigger {
    pub metric_name: String,
    pub lower_load_threshold: f64,
    pub upper_load_threshold: f64,
    pub scale_interval: String,
    #[serde(default)]
    pub use_only_primary_load: bool,
}

crate::discriminated_union! {
    pub enum ScalingTrigger: "kind" {
        AveragePartitionLoad(AveragePartitionLoadTrigger) => "AveragePartitionLoadTrigger",
        AverageServiceLoad(AverageServiceLoadTrigger) => "AverageServiceLoadTrigger",
    }
}
