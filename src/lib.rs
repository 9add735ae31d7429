//! azrm - Azure Resource Manager toolkit for Terraform import workflows
//!
//! A library for parsing ARM resource IDs, talking to Resource Manager and
//! generating Terraform import blocks for discovered resources.

pub mod enums;
pub mod unions;

pub mod arm;
pub mod config;
pub mod output;
pub mod providers;
pub mod resource;
pub mod resourceids;
pub mod terraform;

mod error;

pub use arm::{ArmClient, ArmError, ClientOptions};
pub use error::AzrmError;
pub use resource::{DiscoverConfig, Resource};
pub use resourceids::{ResourceId, ResourceIdError};
