use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{ArgumentMap, DescriptorGenerator, GeneratorError, Parameter, Signature};
use crate::environment::GenerationEnv;

enum Behaviour {
    Succeed(Value),
    Fail(String),
    BrokenSignature(String),
}

/// Generator double that records every call it receives.
#[derive(Clone)]
pub struct RecordingGenerator {
    signature: Signature,
    behaviour: Arc<Behaviour>,
    calls: Arc<Mutex<Vec<ArgumentMap>>>,
}

impl RecordingGenerator {
    fn build(parameters: Vec<Parameter>, behaviour: Behaviour) -> Self {
        Self {
            signature: Signature::new("generate_descriptor", parameters),
            behaviour: Arc::new(behaviour),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn base_parameters() -> Vec<Parameter> {
        vec![
            Parameter::required("chain_id", "u64"),
            Parameter::required("contract_address", "String"),
            Parameter::optional("abi", "Option<String>", "None"),
        ]
    }

    pub fn with_auto() -> Self {
        let mut parameters = Self::base_parameters();
        parameters.push(Parameter::optional("auto", "bool", "false"));
        Self::build(parameters, Behaviour::Succeed(json!({ "generated": true })))
    }

    pub fn without_auto() -> Self {
        Self::build(
            Self::base_parameters(),
            Behaviour::Succeed(json!({ "generated": true })),
        )
    }

    pub fn failing(message: &str) -> Self {
        Self::build(Self::base_parameters(), Behaviour::Fail(message.to_string()))
    }

    pub fn broken_signature(message: &str) -> Self {
        Self::build(
            Self::base_parameters(),
            Behaviour::BrokenSignature(message.to_string()),
        )
    }

    pub fn calls(&self) -> Vec<ArgumentMap> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl DescriptorGenerator for RecordingGenerator {
    fn signature(&self) -> Result<Signature, GeneratorError> {
        match self.behaviour.as_ref() {
            Behaviour::BrokenSignature(message) => Err(GeneratorError::Signature(message.clone())),
            _ => Ok(self.signature.clone()),
        }
    }

    fn version(&self) -> Option<String> {
        Some("test".to_string())
    }

    async fn generate(&self, _env: &GenerationEnv, args: ArgumentMap) -> Result<Value, GeneratorError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(args);
        }
        match self.behaviour.as_ref() {
            Behaviour::Succeed(value) => Ok(value.clone()),
            Behaviour::Fail(message) => Err(GeneratorError::Etherscan(message.clone())),
            Behaviour::BrokenSignature(message) => Err(GeneratorError::Signature(message.clone())),
        }
    }
}
