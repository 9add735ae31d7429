use crate::resourceids::{
    KeyVaultId, KubernetesClusterId, NetworkSecurityGroupId, PrivateDnsZoneId, PublicIpAddressId,
    ResourceGroupId, ResourceId, ResourceIdError, StorageAccountId, SubnetId,
    UserAssignedIdentityId, VirtualNetworkId,
};

/// Re-cases a live ARM ID into the form the Terraform resource imports.
pub type Normalizer = fn(&str) -> Result<String, ResourceIdError>;

#[derive(Debug, Clone, Copy)]
pub struct TypeMapping {
    pub arm_type: &'static str,
    pub terraform_type: &'static str,
    pub normalize: Normalizer,
}

fn canonical<T: ResourceId>(input: &str) -> Result<String, ResourceIdError> {
    T::parse_insensitively(input).map(|id| id.id())
}

pub const RESOURCE_GROUP: &str = "Microsoft.Resources/resourceGroups";
pub const VIRTUAL_NETWORK: &str = "Microsoft.Network/virtualNetworks";

pub const MAPPINGS: &[TypeMapping] = &[
    TypeMapping {
        arm_type: RESOURCE_GROUP,
        terraform_type: "azurerm_resource_group",
        normalize: canonical::<ResourceGroupId>,
    },
    TypeMapping {
        arm_type: "Microsoft.ContainerService/managedClusters",
        terraform_type: "azurerm_kubernetes_cluster",
        normalize: canonical::<KubernetesClusterId>,
    },
    TypeMapping {
        arm_type: VIRTUAL_NETWORK,
        terraform_type: "azurerm_virtual_network",
        normalize: canonical::<VirtualNetworkId>,
    },
    TypeMapping {
        arm_type: "Microsoft.Network/virtualNetworks/subnets",
        terraform_type: "azurerm_subnet",
        normalize: canonical::<SubnetId>,
    },
    TypeMapping {
        arm_type: "Microsoft.ManagedIdentity/userAssignedIdentities",
        terraform_type: "azurerm_user_assigned_identity",
        normalize: canonical::<UserAssignedIdentityId>,
    },
    TypeMapping {
        arm_type: "Microsoft.Storage/storageAccounts",
        terraform_type: "azurerm_storage_account",
        normalize: canonical::<StorageAccountId>,
    },
    TypeMapping {
        arm_type: "Microsoft.KeyVault/vaults",
        terraform_type: "azurerm_key_vault",
        normalize: canonical::<KeyVaultId>,
    },
    TypeMapping {
        arm_type: "Microsoft.Network/networkSecurityGroups",
        terraform_type: "azurerm_network_security_group",
        normalize: canonical::<NetworkSecurityGroupId>,
    },
    TypeMapping {
        arm_type: "Microsoft.Network/publicIPAddresses",
        terraform_type: "azurerm_public_ip",
        normalize: canonical::<PublicIpAddressId>,
    },
    TypeMapping {
        arm_type: "Microsoft.Network/privateDnsZones",
        terraform_type: "azurerm_private_dns_zone",
        normalize: canonical::<PrivateDnsZoneId>,
    },
];

/// ARM resource types compare case-insensitively.
pub fn lookup(arm_type: &str) -> Option<&'static TypeMapping> {
    MAPPINGS
        .iter()
        .find(|m| m.arm_type.eq_ignore_ascii_case(arm_type))
}

/// Terraform resource name for an Azure resource name: lower case, with
/// anything outside `[a-z0-9_]` turned into `_`.
pub fn terraform_name(name: &str) -> String {
    let mut sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        return "resource".to_string();
    }
    if sanitized.starts_with(|c: char| c.is_ascii_digit()) {
        sanitized.insert(0, '_');
    }
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        let mapping = lookup("microsoft.containerservice/MANAGEDCLUSTERS").unwrap();
        assert_eq!(mapping.terraform_type, "azurerm_kubernetes_cluster");
        assert!(lookup("Microsoft.Compute/virtualMachines").is_none());
    }

    #[test]
    fn test_mapping_normalizes_id() {
        let mapping = lookup("Microsoft.KeyVault/vaults").unwrap();
        let id = (mapping.normalize)(
            "/subscriptions/sub/resourcegroups/RG1/providers/microsoft.keyvault/VAULTS/kv1",
        )
        .unwrap();
        assert_eq!(
            id,
            "/subscriptions/sub/resourceGroups/RG1/providers/Microsoft.KeyVault/vaults/kv1"
        );
    }

    #[test]
    fn test_mapping_rejects_mismatched_id() {
        let mapping = lookup(VIRTUAL_NETWORK).unwrap();
        let result = (mapping.normalize)(
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/sa",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_terraform_types_are_unique() {
        let mut types: Vec<_> = MAPPINGS.iter().map(|m| m.terraform_type).collect();
        types.sort_unstable();
        types.dedup();
        assert_eq!(types.len(), MAPPINGS.len());
    }

    #[test]
    fn test_terraform_name() {
        assert_eq!(terraform_name("rg-app"), "rg_app");
        assert_eq!(terraform_name("My.Vault"), "my_vault");
        assert_eq!(terraform_name("1st-network"), "_1st_network");
        assert_eq!(terraform_name(""), "resource");
    }
}
