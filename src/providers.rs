pub mod azurerm;

use async_trait::async_trait;
use thiserror::Error;

use crate::arm::ArmClient;
use crate::resource::{DiscoverConfig, Resource};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("authentication error: {0}")]
    Auth(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("azure error: {0}")]
    Azure(String),
}

#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;
    async fn discover(&self, config: &DiscoverConfig) -> Result<Vec<Resource>, ProviderError>;
    fn generate_import(&self, resource: &Resource) -> String;
    fn resource_types(&self) -> Vec<&str>;
}

pub fn get_provider(
    name: &str,
    client: Option<ArmClient>,
) -> Result<Box<dyn Provider>, ProviderError> {
    match name {
        "azurerm" => Ok(Box::new(azurerm::AzureRmProvider::new(client))),
        other => Err(ProviderError::UnknownProvider(other.to_string())),
    }
}
