use std::fmt;

use super::{Parsed, ResourceId, ResourceIdError, Segment};

crate::arm_enum! {
    /// Record types addressable under a Private DNS zone.
    pub enum RecordType {
        A => "A",
        Aaaa => "AAAA",
        Cname => "CNAME",
        Mx => "MX",
        Ptr => "PTR",
        Soa => "SOA",
        Srv => "SRV",
        Txt => "TXT",
    }
}

fn resource_group_prefix() -> Vec<Segment> {
    vec![
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id(),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group(),
    ]
}

fn provider_resource(
    namespace_name: &'static str,
    namespace: &'static str,
    collection_name: &'static str,
    collection: &'static str,
    name: &'static str,
    example: &'static str,
) -> Vec<Segment> {
    let mut segments = resource_group_prefix();
    segments.extend([
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider(namespace_name, namespace),
        Segment::static_segment(collection_name, collection),
        Segment::user_specified(name, example),
    ]);
    segments
}

macro_rules! display_via_describe {
    ($($id:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $id {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.describe())
                }
            }
        )+
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionId {
    pub subscription_id: String,
}

impl SubscriptionId {
    pub fn new(subscription_id: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
        }
    }
}

impl ResourceId for SubscriptionId {
    const DESCRIPTION: &'static str = "Subscription";

    fn segments() -> Vec<Segment> {
        vec![
            Segment::static_segment("staticSubscriptions", "subscriptions"),
            Segment::subscription_id(),
        ]
    }

    fn from_parsed(parsed: &Parsed) -> Result<Self, ResourceIdError> {
        Ok(Self::new(parsed.get("subscriptionId")?))
    }

    fn values(&self) -> Vec<&str> {
        vec![self.subscription_id.as_str()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroupId {
    pub subscription_id: String,
    pub resource_group_name: String,
}

impl ResourceGroupId {
    pub fn new(subscription_id: impl Into<String>, resource_group_name: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
        }
    }
}

impl ResourceId for ResourceGroupId {
    const DESCRIPTION: &'static str = "Resource Group";

    fn segments() -> Vec<Segment> {
        resource_group_prefix()
    }

    fn from_parsed(parsed: &Parsed) -> Result<Self, ResourceIdError> {
        Ok(Self::new(
            parsed.get("subscriptionId")?,
            parsed.get("resourceGroupName")?,
        ))
    }

    fn values(&self) -> Vec<&str> {
        vec![self.subscription_id.as_str(), self.resource_group_name.as_str()]
    }
}

/// Declares a resource nested directly under a resource group:
/// `/subscriptions/{}/resourceGroups/{}/providers/{namespace}/{collection}/{name}`.
macro_rules! resource_group_resource {
    (
        $(#[$meta:meta])*
        $id:ident {
            description: $description:literal,
            namespace: ($namespace_name:literal, $namespace:literal),
            collection: ($collection_name:literal, $collection:literal),
            name: ($field:ident, $segment:literal, $example:literal) $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $id {
            pub subscription_id: String,
            pub resource_group_name: String,
            pub $field: String,
        }

        impl $id {
            pub fn new(
                subscription_id: impl Into<String>,
                resource_group_name: impl Into<String>,
                $field: impl Into<String>,
            ) -> Self {
                Self {
                    subscription_id: subscription_id.into(),
                    resource_group_name: resource_group_name.into(),
                    $field: $field.into(),
                }
            }

            pub fn resource_group_id(&self) -> ResourceGroupId {
                ResourceGroupId::new(&self.subscription_id, &self.resource_group_name)
            }
        }

        impl ResourceId for $id {
            const DESCRIPTION: &'static str = $description;

            fn segments() -> Vec<Segment> {
                provider_resource(
                    $namespace_name,
                    $namespace,
                    $collection_name,
                    $collection,
                    $segment,
                    $example,
                )
            }

            fn from_parsed(parsed: &Parsed) -> Result<Self, ResourceIdError> {
                Ok(Self::new(
                    parsed.get("subscriptionId")?,
                    parsed.get("resourceGroupName")?,
                    parsed.get($segment)?,
                ))
            }

            fn values(&self) -> Vec<&str> {
                vec![
                    self.subscription_id.as_str(),
                    self.resource_group_name.as_str(),
                    self.$field.as_str(),
                ]
            }
        }
    };
}

resource_group_resource! {
    KubernetesClusterId {
        description: "Kubernetes Cluster",
        namespace: ("staticMicrosoftContainerService", "Microsoft.ContainerService"),
        collection: ("staticManagedClusters", "managedClusters"),
        name: (managed_cluster_name, "managedClusterName", "managedClusterValue"),
    }
}

resource_group_resource! {
    VirtualNetworkId {
        description: "Virtual Network",
        namespace: ("staticMicrosoftNetwork", "Microsoft.Network"),
        collection: ("staticVirtualNetworks", "virtualNetworks"),
        name: (virtual_network_name, "virtualNetworkName", "virtualNetworkValue"),
    }
}

resource_group_resource! {
    UserAssignedIdentityId {
        description: "User Assigned Identity",
        namespace: ("staticMicrosoftManagedIdentity", "Microsoft.ManagedIdentity"),
        collection: ("staticUserAssignedIdentities", "userAssignedIdentities"),
        name: (user_assigned_identity_name, "userAssignedIdentityName", "userAssignedIdentityValue"),
    }
}

resource_group_resource! {
    StorageAccountId {
        description: "Storage Account",
        namespace: ("staticMicrosoftStorage", "Microsoft.Storage"),
        collection: ("staticStorageAccounts", "storageAccounts"),
        name: (storage_account_name, "storageAccountName", "storageAccountValue"),
    }
}

resource_group_resource! {
    KeyVaultId {
        description: "Key Vault",
        namespace: ("staticMicrosoftKeyVault", "Microsoft.KeyVault"),
        collection: ("staticVaults", "vaults"),
        name: (vault_name, "vaultName", "vaultValue"),
    }
}

resource_group_resource! {
    NetworkSecurityGroupId {
        description: "Network Security Group",
        namespace: ("staticMicrosoftNetwork", "Microsoft.Network"),
        collection: ("staticNetworkSecurityGroups", "networkSecurityGroups"),
        name: (network_security_group_name, "networkSecurityGroupName", "networkSecurityGroupValue"),
    }
}

resource_group_resource! {
    PublicIpAddressId {
        description: "Public IP Address",
        namespace: ("staticMicrosoftNetwork", "Microsoft.Network"),
        collection: ("staticPublicIPAddresses", "publicIPAddresses"),
        name: (public_ip_address_name, "publicIPAddressName", "publicIPAddressValue"),
    }
}

resource_group_resource! {
    PrivateDnsZoneId {
        description: "Private DNS Zone",
        namespace: ("staticMicrosoftNetwork", "Microsoft.Network"),
        collection: ("staticPrivateDnsZones", "privateDnsZones"),
        name: (private_dns_zone_name, "privateDnsZoneName", "privateDnsZoneValue"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetId {
    pub subscription_id: String,
    pub resource_group_name: String,
    pub virtual_network_name: String,
    pub subnet_name: String,
}

impl SubnetId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group_name: impl Into<String>,
        virtual_network_name: impl Into<String>,
        subnet_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
            virtual_network_name: virtual_network_name.into(),
            subnet_name: subnet_name.into(),
        }
    }

    pub fn virtual_network_id(&self) -> VirtualNetworkId {
        VirtualNetworkId::new(
            &self.subscription_id,
            &self.resource_group_name,
            &self.virtual_network_name,
        )
    }
}

impl ResourceId for SubnetId {
    const DESCRIPTION: &'static str = "Subnet";

    fn segments() -> Vec<Segment> {
        let mut segments = VirtualNetworkId::segments();
        segments.extend([
            Segment::static_segment("staticSubnets", "subnets"),
            Segment::user_specified("subnetName", "subnetValue"),
        ]);
        segments
    }

    fn from_parsed(parsed: &Parsed) -> Result<Self, ResourceIdError> {
        Ok(Self::new(
            parsed.get("subscriptionId")?,
            parsed.get("resourceGroupName")?,
            parsed.get("virtualNetworkName")?,
            parsed.get("subnetName")?,
        ))
    }

    fn values(&self) -> Vec<&str> {
        vec![
            self.subscription_id.as_str(),
            self.resource_group_name.as_str(),
            self.virtual_network_name.as_str(),
            self.subnet_name.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateDnsRecordId {
    pub subscription_id: String,
    pub resource_group_name: String,
    pub private_dns_zone_name: String,
    pub record_type: RecordType,
    pub relative_record_set_name: String,
}

impl PrivateDnsRecordId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group_name: impl Into<String>,
        private_dns_zone_name: impl Into<String>,
        record_type: RecordType,
        relative_record_set_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
            private_dns_zone_name: private_dns_zone_name.into(),
            record_type,
            relative_record_set_name: relative_record_set_name.into(),
        }
    }
}

impl ResourceId for PrivateDnsRecordId {
    const DESCRIPTION: &'static str = "Private DNS Record";

    fn segments() -> Vec<Segment> {
        let mut segments = PrivateDnsZoneId::segments();
        segments.extend([
            Segment::constant("recordType", RecordType::POSSIBLE_VALUES),
            Segment::user_specified("relativeRecordSetName", "relativeRecordSetValue"),
        ]);
        segments
    }

    fn from_parsed(parsed: &Parsed) -> Result<Self, ResourceIdError> {
        Ok(Self::new(
            parsed.get("subscriptionId")?,
            parsed.get("resourceGroupName")?,
            parsed.get("privateDnsZoneName")?,
            RecordType::from(parsed.get("recordType")?),
            parsed.get("relativeRecordSetName")?,
        ))
    }

    fn values(&self) -> Vec<&str> {
        vec![
            self.subscription_id.as_str(),
            self.resource_group_name.as_str(),
            self.private_dns_zone_name.as_str(),
            self.record_type.as_str(),
            self.relative_record_set_name.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedRoleAssignmentId {
    pub scope: String,
    pub role_assignment_name: String,
}

impl ScopedRoleAssignmentId {
    pub fn new(scope: impl Into<String>, role_assignment_name: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            role_assignment_name: role_assignment_name.into(),
        }
    }
}

impl ResourceId for ScopedRoleAssignmentId {
    const DESCRIPTION: &'static str = "Scoped Role Assignment";

    fn segments() -> Vec<Segment> {
        vec![
            Segment::scope("scope"),
            Segment::static_segment("staticProviders", "providers"),
            Segment::resource_provider("staticMicrosoftAuthorization", "Microsoft.Authorization"),
            Segment::static_segment("staticRoleAssignments", "roleAssignments"),
            Segment::user_specified("roleAssignmentName", "roleAssignmentValue"),
        ]
    }

    fn from_parsed(parsed: &Parsed) -> Result<Self, ResourceIdError> {
        Ok(Self::new(
            parsed.get("scope")?,
            parsed.get("roleAssignmentName")?,
        ))
    }

    fn values(&self) -> Vec<&str> {
        vec![self.scope.as_str(), self.role_assignment_name.as_str()]
    }
}

display_via_describe!(
    SubscriptionId,
    ResourceGroupId,
    KubernetesClusterId,
    VirtualNetworkId,
    UserAssignedIdentityId,
    StorageAccountId,
    KeyVaultId,
    NetworkSecurityGroupId,
    PublicIpAddressId,
    PrivateDnsZoneId,
    SubnetId,
    PrivateDnsRecordId,
    ScopedRoleAssignmentId,
);

/// A parsed ID flattened for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSummary {
    pub id_type: &'static str,
    pub id: String,
    pub components: Vec<(String, String)>,
}

fn summarize<T: ResourceId>(input: &str, insensitively: bool) -> Result<IdSummary, ResourceIdError> {
    let id = if insensitively {
        T::parse_insensitively(input)?
    } else {
        T::parse(input)?
    };

    let components = T::segments()
        .iter()
        .filter(|s| s.holds_value())
        .zip(id.values())
        .map(|(segment, value)| (segment.label(), value.to_string()))
        .collect();

    Ok(IdSummary {
        id_type: T::DESCRIPTION,
        id: id.id(),
        components,
    })
}

/// The typed IDs selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum KnownIdType {
    Subscription,
    ResourceGroup,
    KubernetesCluster,
    VirtualNetwork,
    Subnet,
    UserAssignedIdentity,
    StorageAccount,
    KeyVault,
    NetworkSecurityGroup,
    PublicIpAddress,
    PrivateDnsZone,
    PrivateDnsRecord,
    RoleAssignment,
}

impl KnownIdType {
    pub const ALL: [KnownIdType; 13] = [
        KnownIdType::Subscription,
        KnownIdType::ResourceGroup,
        KnownIdType::KubernetesCluster,
        KnownIdType::VirtualNetwork,
        KnownIdType::Subnet,
        KnownIdType::UserAssignedIdentity,
        KnownIdType::StorageAccount,
        KnownIdType::KeyVault,
        KnownIdType::NetworkSecurityGroup,
        KnownIdType::PublicIpAddress,
        KnownIdType::PrivateDnsZone,
        KnownIdType::PrivateDnsRecord,
        KnownIdType::RoleAssignment,
    ];

    pub fn inspect(&self, input: &str, insensitively: bool) -> Result<IdSummary, ResourceIdError> {
        match self {
            Self::Subscription => summarize::<SubscriptionId>(input, insensitively),
            Self::ResourceGroup => summarize::<ResourceGroupId>(input, insensitively),
            Self::KubernetesCluster => summarize::<KubernetesClusterId>(input, insensitively),
            Self::VirtualNetwork => summarize::<VirtualNetworkId>(input, insensitively),
            Self::Subnet => summarize::<SubnetId>(input, insensitively),
            Self::UserAssignedIdentity => summarize::<UserAssignedIdentityId>(input, insensitively),
            Self::StorageAccount => summarize::<StorageAccountId>(input, insensitively),
            Self::KeyVault => summarize::<KeyVaultId>(input, insensitively),
            Self::NetworkSecurityGroup => summarize::<NetworkSecurityGroupId>(input, insensitively),
            Self::PublicIpAddress => summarize::<PublicIpAddressId>(input, insensitively),
            Self::PrivateDnsZone => summarize::<PrivateDnsZoneId>(input, insensitively),
            Self::PrivateDnsRecord => summarize::<PrivateDnsRecordId>(input, insensitively),
            Self::RoleAssignment => summarize::<ScopedRoleAssignmentId>(input, insensitively),
        }
    }

    pub fn validate(&self, input: &str, key: &str) -> Vec<String> {
        match self.inspect(input, false) {
            Ok(_) => Vec::new(),
            Err(err) => vec![format!("{key}: {err}")],
        }
    }

    /// First known type that accepts `input`.
    pub fn detect(input: &str, insensitively: bool) -> Result<IdSummary, ResourceIdError> {
        Self::ALL
            .iter()
            .find_map(|t| t.inspect(input, insensitively).ok())
            .ok_or_else(|| ResourceIdError::UnknownType {
                input: input.to_string(),
            })
    }
}
