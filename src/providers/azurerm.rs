mod mapping;

pub use mapping::{MAPPINGS, Normalizer, TypeMapping, lookup, terraform_name};

use async_trait::async_trait;

use super::{DiscoverConfig, Provider, ProviderError, Resource};
use crate::arm::{ArmClient, GenericResource, ResourceGroup, api_versions};
use crate::resourceids::{ResourceGroupId, ResourceId, SubscriptionId};

pub struct AzureRmProvider {
    client: Option<ArmClient>,
}

impl AzureRmProvider {
    pub fn new(client: Option<ArmClient>) -> Self {
        Self { client }
    }

    async fn resource_groups(
        &self,
        client: &ArmClient,
        subscription: &str,
        only: Option<&str>,
    ) -> Result<Vec<ResourceGroup>, ProviderError> {
        if let Some(name) = only {
            let id = ResourceGroupId::new(subscription, name);
            let group = client.get(&id.id(), api_versions::RESOURCES).await?;
            return Ok(vec![group]);
        }

        let path = format!("{}/resourcegroups", SubscriptionId::new(subscription).id());
        Ok(client.list_all(&path, api_versions::RESOURCES).await?)
    }

    async fn subnets(
        &self,
        client: &ArmClient,
        virtual_network_id: &str,
    ) -> Result<Vec<GenericResource>, ProviderError> {
        let path = format!("{}/subnets", virtual_network_id);
        Ok(client.list_all(&path, api_versions::NETWORK).await?)
    }
}

/// Maps a live resource onto its Terraform type, or `None` when the type is
/// not importable or its ID does not parse.
fn into_resource(item: &GenericResource, resource_group: &str) -> Option<Resource> {
    let Some(mapping) = lookup(&item.resource_type) else {
        tracing::debug!(resource_type = %item.resource_type, id = %item.id, "skipping unmapped type");
        return None;
    };

    match (mapping.normalize)(&item.id) {
        Ok(resource_id) => Some(Resource {
            resource_type: mapping.terraform_type.to_string(),
            resource_id,
            name: item.name.clone(),
            resource_group: resource_group.to_string(),
            metadata: serde_json::json!({
                "arm_type": mapping.arm_type,
                "location": item.location,
            }),
        }),
        Err(err) => {
            tracing::warn!(id = %item.id, error = %err, "skipping resource with unexpected ID");
            None
        }
    }
}

#[async_trait]
impl Provider for AzureRmProvider {
    fn name(&self) -> &str {
        "azurerm"
    }

    async fn discover(&self, config: &DiscoverConfig) -> Result<Vec<Resource>, ProviderError> {
        let client = self.client.as_ref().ok_or_else(|| {
            ProviderError::Auth(
                "No credentials provided. Set AZURE_ACCESS_TOKEN, or AZURE_TENANT_ID, AZURE_CLIENT_ID and AZURE_CLIENT_SECRET"
                    .to_string(),
            )
        })?;

        let subscription = config.subscription_id.as_deref().ok_or_else(|| {
            ProviderError::Config(
                "No subscription provided. Set AZURE_SUBSCRIPTION_ID or use --subscription"
                    .to_string(),
            )
        })?;

        let groups = self
            .resource_groups(client, subscription, config.resource_group.as_deref())
            .await?;

        tracing::info!(count = groups.len(), "resource groups discovered");

        let mut resources = Vec::new();

        for group in groups {
            let group_item = GenericResource {
                id: group.id.clone(),
                name: group.name.clone(),
                resource_type: mapping::RESOURCE_GROUP.to_string(),
                location: Some(group.location.clone()),
                kind: None,
                tags: group.tags.clone(),
                properties: None,
            };
            resources.extend(into_resource(&group_item, &group.name));

            let group_id = ResourceGroupId::parse_insensitively(&group.id)
                .map_err(|e| ProviderError::Azure(e.to_string()))?;
            let items: Vec<GenericResource> = client
                .list_all(&format!("{}/resources", group_id.id()), api_versions::RESOURCES)
                .await?;

            tracing::info!(resource_group = %group.name, count = items.len(), "resources listed");

            for item in &items {
                let Some(resource) = into_resource(item, &group.name) else {
                    continue;
                };

                let is_virtual_network = item
                    .resource_type
                    .eq_ignore_ascii_case(mapping::VIRTUAL_NETWORK);
                let virtual_network_id = resource.resource_id.clone();
                resources.push(resource);

                if is_virtual_network {
                    let subnets = self.subnets(client, &virtual_network_id).await?;
                    tracing::debug!(virtual_network = %item.name, count = subnets.len(), "subnets listed");
                    resources.extend(subnets.iter().filter_map(|s| into_resource(s, &group.name)));
                }
            }
        }

        tracing::info!(count = resources.len(), "importable resources discovered");

        Ok(resources)
    }

    fn generate_import(&self, resource: &Resource) -> String {
        format!(
            "import {{\n  to = {}.{}\n  id = \"{}\"\n}}",
            resource.resource_type,
            terraform_name(&resource.name),
            resource.resource_id
        )
    }

    fn resource_types(&self) -> Vec<&str> {
        MAPPINGS.iter().map(|m| m.terraform_type).collect()
    }
}
