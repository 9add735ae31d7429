use thiserror::Error;

#[derive(Debug, Error)]
pub enum AzrmError {
    #[error(transparent)]
    Arm(#[from] crate::arm::ArmError),

    #[error(transparent)]
    Provider(#[from] crate::providers::ProviderError),

    #[error("invalid resource ID: {0}")]
    ResourceId(#[from] crate::resourceids::ResourceIdError),

    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("state error: {0}")]
    State(#[from] crate::terraform::StateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
