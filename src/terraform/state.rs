use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

const SUPPORTED_VERSION: u64 = 4;
const PROVIDER_PREFIX: &str = "azurerm_";

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to read state file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse state: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported state version {0}, expected 4")]
    UnsupportedVersion(u64),
}

#[derive(Debug, Deserialize)]
struct RawState {
    version: u64,
    #[serde(default)]
    resources: Vec<RawResource>,
}

#[derive(Debug, Deserialize)]
struct RawResource {
    #[serde(default)]
    module: Option<String>,
    mode: String,
    #[serde(rename = "type")]
    resource_type: String,
    name: String,
    #[serde(default)]
    instances: Vec<RawInstance>,
}

#[derive(Debug, Deserialize)]
struct RawInstance {
    #[serde(default)]
    index_key: Option<Value>,
    #[serde(default)]
    attributes: Option<Value>,
}

/// One managed `azurerm_*` instance recorded in state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEntry {
    /// Full address, e.g. `module.net.azurerm_subnet.app["web"]`.
    pub address: String,
    pub resource_type: String,
    pub id: String,
}

/// Terraform state (format version 4), reduced to the azurerm resources it
/// manages.
#[derive(Debug, Clone, Default)]
pub struct TerraformState {
    pub entries: Vec<StateEntry>,
}

impl TerraformState {
    pub fn from_file(path: &Path) -> Result<Self, StateError> {
        let contents = std::fs::read_to_string(path).map_err(|source| StateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let state = Self::from_str(&contents)?;
        tracing::debug!(path = %path.display(), entries = state.entries.len(), "loaded state");
        Ok(state)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(contents: &str) -> Result<Self, StateError> {
        let raw: RawState = serde_json::from_str(contents)?;
        if raw.version != SUPPORTED_VERSION {
            return Err(StateError::UnsupportedVersion(raw.version));
        }

        let entries = raw
            .resources
            .iter()
            .filter(|r| r.mode == "managed" && r.resource_type.starts_with(PROVIDER_PREFIX))
            .flat_map(|resource| {
                resource.instances.iter().filter_map(move |instance| {
                    let id = instance
                        .attributes
                        .as_ref()
                        .and_then(|a| a.get("id"))
                        .and_then(Value::as_str)
                        .filter(|id| !id.is_empty())?;

                    Some(StateEntry {
                        address: address(resource, instance.index_key.as_ref()),
                        resource_type: resource.resource_type.clone(),
                        id: id.to_string(),
                    })
                })
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn address(resource: &RawResource, index_key: Option<&Value>) -> String {
    let mut address = String::new();
    if let Some(module) = &resource.module {
        address.push_str(module);
        address.push('.');
    }
    address.push_str(&resource.resource_type);
    address.push('.');
    address.push_str(&resource.name);

    match index_key {
        Some(Value::String(key)) => address.push_str(&format!("[{:?}]", key)),
        Some(Value::Number(index)) => address.push_str(&format!("[{}]", index)),
        _ => {}
    }
    address
}
