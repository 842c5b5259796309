// src/api/generate.rs

use crate::{
    api::error::{ApiError, ErrorMessage},
    environment,
    generator::{safe_generate, ArgumentMap},
    AppState,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, info_span, warn, Instrument};
use utoipa::ToSchema;
use uuid::Uuid;

/// Stand-in address for ABI-only requests; the generator requires
/// `contract_address` even when the ABI is supplied.
pub const PLACEHOLDER_CONTRACT_ADDRESS: &str = "0xdeadbeef00000000000000000000000000000000";

pub const NO_INPUT_MESSAGE: &str = "No ABI or address provided";

/// Chain used when the request does not name one (Ethereum mainnet).
pub const DEFAULT_CHAIN_ID: u64 = 1;

/// Body of `POST /api/py/generateERC7730`.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct GenerateRequest {
    /// Contract ABI as JSON text, or a build artifact with an `abi` field
    #[serde(default)]
    pub abi: Option<String>,
    /// Deployed contract address whose ABI is fetched from Etherscan
    #[serde(default)]
    pub address: Option<String>,
    /// EVM chain id; missing or 0 means Ethereum mainnet
    #[serde(default)]
    #[schema(example = 1)]
    pub chain_id: Option<u64>,
    /// Ask the generator to infer display formats where it supports it
    #[serde(default)]
    pub auto: bool,
}

/// ERC-7730 descriptor, passed through from the generator as-is.
#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct Descriptor(pub Value);

impl GenerateRequest {
    /// Zero is treated like a missing value.
    pub fn chain_id(&self) -> u64 {
        self.chain_id.filter(|id| *id != 0).unwrap_or(DEFAULT_CHAIN_ID)
    }

    fn abi(&self) -> Option<&str> {
        self.abi.as_deref().filter(|abi| !abi.is_empty())
    }

    fn address(&self) -> Option<&str> {
        self.address.as_deref().filter(|address| !address.is_empty())
    }

    /// Arguments for the ABI branch, if an ABI was supplied.
    pub fn abi_arguments(&self) -> Option<ArgumentMap> {
        let abi = self.abi()?;
        let mut args = ArgumentMap::new();
        args.insert("chain_id".to_string(), json!(self.chain_id()));
        args.insert("contract_address".to_string(), json!(PLACEHOLDER_CONTRACT_ADDRESS));
        args.insert("abi".to_string(), json!(abi));
        args.insert("auto".to_string(), json!(self.auto));
        Some(args)
    }

    /// Arguments for the address branch, if an address was supplied.
    pub fn address_arguments(&self) -> Option<ArgumentMap> {
        let address = self.address()?;
        let mut args = ArgumentMap::new();
        args.insert("chain_id".to_string(), json!(self.chain_id()));
        args.insert("contract_address".to_string(), json!(address));
        args.insert("auto".to_string(), json!(self.auto));
        Some(args)
    }
}

/// Generate an ERC-7730 descriptor from an ABI or a deployed contract address.
#[utoipa::path(
    post,
    path = "/api/py/generateERC7730",
    tag = "erc7730",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "ERC-7730 input descriptor", body = Descriptor),
        (status = 404, description = "No ABI or address provided, or generation failed", body = ErrorMessage),
        (status = 400, description = "Invalid input, when ERROR_STATUS_MODE=typed", body = ErrorMessage),
        (status = 502, description = "Etherscan failure, when ERROR_STATUS_MODE=typed", body = ErrorMessage),
    )
)]
pub async fn generate_erc7730_handler(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    let request_id = Uuid::new_v4();
    let mode = state.config.error_status_mode;

    async move {
        match generate(&state, &request).await {
            Ok(descriptor) => (StatusCode::OK, Json(Descriptor(descriptor))).into_response(),
            Err(e @ ApiError::NotFound(_)) => {
                info!("Nothing to generate: {}", e);
                e.into_response_with(mode)
            }
            Err(e) => {
                error!("error {}", e);
                e.into_response_with(mode)
            }
        }
    }
    .instrument(info_span!("generate_erc7730", %request_id))
    .await
}

/// Runs both branches in order; when both inputs are present the address
/// branch result replaces the ABI branch result.
pub async fn generate(state: &AppState, request: &GenerateRequest) -> Result<Value, ApiError> {
    let env = environment::load_env(&state.config);
    let generator = state.generator.as_ref();
    let mut result = None;

    if let Some(args) = request.abi_arguments() {
        result = Some(safe_generate(generator, &env, args).await?);
    }

    if let Some(args) = request.address_arguments() {
        if result.is_some() {
            warn!("Both abi and address supplied, using the address result");
        }
        result = Some(safe_generate(generator, &env, args).await?);
    }

    result.ok_or_else(|| ApiError::NotFound(NO_INPUT_MESSAGE.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::generator::testing::RecordingGenerator;
    use std::sync::Arc;

    fn state_with(generator: RecordingGenerator) -> AppState {
        AppState::new(Config::default(), Arc::new(generator))
    }

    fn request(value: Value) -> GenerateRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_request_defaults() {
        let req = request(json!({}));
        assert_eq!(req.chain_id(), 1);
        assert!(!req.auto);
        assert!(req.abi_arguments().is_none());
        assert!(req.address_arguments().is_none());

        assert_eq!(request(json!({ "chain_id": 0 })).chain_id(), 1);
        assert_eq!(request(json!({ "chain_id": 137 })).chain_id(), 137);
    }

    #[test]
    fn test_empty_strings_count_as_missing() {
        let req = request(json!({ "abi": "", "address": "" }));
        assert!(req.abi_arguments().is_none());
        assert!(req.address_arguments().is_none());
    }

    #[tokio::test]
    async fn test_no_input_is_not_found() {
        let generator = RecordingGenerator::with_auto();
        let state = state_with(generator.clone());

        let err = generate(&state, &request(json!({}))).await.unwrap_err();

        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(err.to_string(), NO_INPUT_MESSAGE);
        assert!(generator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_abi_branch_uses_placeholder_address() {
        let generator = RecordingGenerator::with_auto();
        let state = state_with(generator.clone());

        generate(&state, &request(json!({ "abi": "[]", "auto": true })))
            .await
            .unwrap();

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0]["contract_address"], PLACEHOLDER_CONTRACT_ADDRESS);
        assert_eq!(calls[0]["abi"], "[]");
        assert_eq!(calls[0]["auto"], true);
        assert_eq!(calls[0]["chain_id"], 1);
    }

    #[tokio::test]
    async fn test_address_branch_has_no_abi() {
        let generator = RecordingGenerator::with_auto();
        let state = state_with(generator.clone());

        generate(&state, &request(json!({ "address": "0x1234", "chain_id": 1 })))
            .await
            .unwrap();

        let calls = generator.calls();
        assert_eq!(
            Value::Object(calls[0].clone()),
            json!({ "chain_id": 1, "contract_address": "0x1234", "auto": false })
        );
    }

    #[tokio::test]
    async fn test_address_branch_wins_when_both_supplied() {
        let generator = RecordingGenerator::with_auto();
        let state = state_with(generator.clone());

        generate(
            &state,
            &request(json!({ "abi": "[]", "address": "0xabc", "chain_id": 5 })),
        )
        .await
        .unwrap();

        let calls = generator.calls();
        assert_eq!(calls.len(), 2);
        let last = calls.last().unwrap();
        assert_eq!(last["contract_address"], "0xabc");
        assert_eq!(last["chain_id"], 5);
        assert!(last.get("abi").is_none());
    }

    #[tokio::test]
    async fn test_generator_failure_becomes_api_error() {
        let state = state_with(RecordingGenerator::failing("Contract source code not verified"));

        let err = generate(&state, &request(json!({ "address": "0x1234" })))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Upstream(_)));
        assert_eq!(err.to_string(), "Etherscan error: Contract source code not verified");
    }
}
