//! # Generator Module
//!
//! Descriptor generation sits behind the [`DescriptorGenerator`] trait. A
//! generator publishes the parameters it currently accepts as a
//! [`Signature`]; callers go through [`invoker::safe_generate`], which drops
//! any argument the installed generator does not know about.

pub mod cache;
pub mod chains;
pub mod erc7730;
pub mod invoker;
pub mod signature;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::environment::GenerationEnv;

pub use invoker::safe_generate;
pub use signature::{Parameter, Signature};

/// Keyword arguments for one generator call, in insertion order.
pub type ArgumentMap = Map<String, Value>;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("generate_descriptor() got an unexpected keyword argument '{0}'")]
    UnexpectedArgument(String),
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("invalid ABI: {0}")]
    InvalidAbi(String),
    #[error("invalid contract address '{0}'")]
    InvalidAddress(String),
    #[error("unsupported chain id {0}: no Etherscan explorer is known for it")]
    UnsupportedChain(u64),
    #[error("Etherscan error: {0}")]
    Etherscan(String),
    #[error("request to Etherscan failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to introspect generator: {0}")]
    Signature(String),
}

impl GeneratorError {
    /// Whether the failure was caused by the caller's input rather than by an
    /// upstream service.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            GeneratorError::UnexpectedArgument(_)
                | GeneratorError::InvalidArguments(_)
                | GeneratorError::InvalidAbi(_)
                | GeneratorError::InvalidAddress(_)
                | GeneratorError::UnsupportedChain(_)
        )
    }
}

/// An implementation of descriptor generation.
#[async_trait]
pub trait DescriptorGenerator: Send + Sync {
    /// The parameters this generator accepts right now.
    fn signature(&self) -> Result<Signature, GeneratorError>;

    /// Version of the underlying implementation, if it reports one.
    fn version(&self) -> Option<String> {
        None
    }

    /// Generates a descriptor. `args` must only contain names listed in
    /// [`DescriptorGenerator::signature`].
    async fn generate(&self, env: &GenerationEnv, args: ArgumentMap) -> Result<Value, GeneratorError>;
}
