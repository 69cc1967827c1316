use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors surfaced by the façade.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("API error: {0}")]
    Api(#[from] core_api::ApiError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] core_mutation::MutationError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
