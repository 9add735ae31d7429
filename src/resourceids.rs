//! Resource IDs: ordered path segments with named placeholders.
//!
//! Each typed ID declares its segments once; parsing, formatting,
//! describing and validation are all derived from that declaration, so
//! `T::parse(id.id())` always yields `id` back.

mod common;
mod parser;
mod segment;

pub use common::{
    IdSummary, KeyVaultId, KnownIdType, KubernetesClusterId, NetworkSecurityGroupId,
    PrivateDnsRecordId, PrivateDnsZoneId, PublicIpAddressId, RecordType, ResourceGroupId,
    ScopedRoleAssignmentId, StorageAccountId, SubnetId, SubscriptionId, UserAssignedIdentityId,
    VirtualNetworkId,
};
pub use parser::{Parsed, Parser, ResourceIdError, describe, format_id};
pub use segment::{Segment, SegmentKind};

pub trait ResourceId: Sized {
    /// Human name of the resource, e.g. `Kubernetes Cluster`.
    const DESCRIPTION: &'static str;

    fn segments() -> Vec<Segment>;

    fn from_parsed(parsed: &Parsed) -> Result<Self, ResourceIdError>;

    /// Values of the value-holding segments, in segment order.
    fn values(&self) -> Vec<&str>;

    fn id(&self) -> String {
        format_id(&Self::segments(), &self.values())
    }

    fn describe(&self) -> String {
        describe(Self::DESCRIPTION, &Self::segments(), &self.values())
    }

    fn parse(input: &str) -> Result<Self, ResourceIdError> {
        let parsed = Parser::new(Self::DESCRIPTION, Self::segments()).parse(input, false)?;
        Self::from_parsed(&parsed)
    }

    /// Parses ignoring the casing of fixed segments and constants, returning
    /// an ID in canonical casing. ARM frequently hands back IDs with
    /// `resourcegroups` or lower-cased provider namespaces.
    fn parse_insensitively(input: &str) -> Result<Self, ResourceIdError> {
        let parsed = Parser::new(Self::DESCRIPTION, Self::segments()).parse(input, true)?;
        Self::from_parsed(&parsed)
    }

    /// Terraform-style validator: returns the error messages for `key`,
    /// empty when `input` is a valid ID.
    fn validate(input: &str, key: &str) -> Vec<String> {
        match Self::parse(input) {
            Ok(_) => Vec::new(),
            Err(err) => vec![format!("{key}: {err}")],
        }
    }
}
