use serde::{Deserialize, Serialize};

/// A discovered resource, already mapped to its Terraform type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Resource {
    pub resource_type: String,
    /// Canonically cased ARM ID, the form `terraform import` expects.
    pub resource_id: String,
    pub name: String,
    pub resource_group: String,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Default)]
pub struct DiscoverConfig {
    pub subscription_id: Option<String>,
    /// Limit discovery to one resource group.
    pub resource_group: Option<String>,
}
