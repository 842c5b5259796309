// src/lib.rs

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod environment;
pub mod generator;

use generator::DescriptorGenerator;

/// Parameters the request handler always passes; a generator without them
/// cannot serve any request.
pub const REQUIRED_GENERATOR_PARAMETERS: &[&str] = &["chain_id", "contract_address"];

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: config::Config,
    /// Descriptor generator behind the signature-adaptive invoker
    pub generator: Arc<dyn DescriptorGenerator>,
}

impl AppState {
    pub fn new(config: config::Config, generator: Arc<dyn DescriptorGenerator>) -> Self {
        Self { config, generator }
    }
}
