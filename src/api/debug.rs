use crate::{
    generator::{DescriptorGenerator, GeneratorError},
    AppState,
};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

/// What the installed generator accepts right now.
#[derive(Debug, Serialize, ToSchema)]
pub struct DebugInfo {
    pub function_parameters: Vec<String>,
    pub has_auto_parameter: bool,
    pub library_version: String,
    pub function_signature: String,
}

/// Sent in place of [`DebugInfo`] when the generator cannot be introspected.
#[derive(Debug, Serialize, ToSchema)]
pub struct DebugError {
    pub error: String,
}

pub fn debug_info(generator: &dyn DescriptorGenerator) -> Result<DebugInfo, GeneratorError> {
    let signature = generator.signature()?;

    Ok(DebugInfo {
        function_parameters: signature.names(),
        has_auto_parameter: signature.accepts("auto"),
        library_version: generator.version().unwrap_or_else(|| "unknown".to_string()),
        function_signature: signature.to_string(),
    })
}

// Always answers 200; introspection failures are reported in the body.
#[utoipa::path(
    get,
    path = "/api/py/debug",
    tag = "erc7730",
    responses(
        (status = 200, description = "Generator parameters and version, or `{\"error\": ...}` when introspection fails", body = DebugInfo)
    )
)]
pub async fn debug_handler(State(state): State<AppState>) -> Response {
    match debug_info(state.generator.as_ref()) {
        Ok(info) => Json(info).into_response(),
        Err(e) => {
            error!("Generator introspection failed: {}", e);
            Json(DebugError { error: e.to_string() }).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::erc7730::{Erc7730Generator, GeneratorProfile};
    use crate::generator::testing::RecordingGenerator;

    #[test]
    fn test_reports_current_profile() {
        let info = debug_info(&Erc7730Generator::new(GeneratorProfile::Current)).unwrap();

        assert!(info.has_auto_parameter);
        assert_eq!(info.library_version, "0.4.0");
        assert_eq!(
            info.function_parameters,
            vec!["chain_id", "contract_address", "abi", "owner", "legal_name", "url", "auto"]
        );
        assert!(info.function_signature.starts_with("(chain_id: u64, contract_address: String"));
        assert!(info.function_signature.ends_with("auto: bool = false)"));
    }

    #[test]
    fn test_reports_legacy_profile_without_auto() {
        let info = debug_info(&Erc7730Generator::new(GeneratorProfile::Legacy)).unwrap();
        assert!(!info.has_auto_parameter);
        assert_eq!(info.library_version, "0.3.0");
    }

    #[test]
    fn test_introspection_failure_is_an_error() {
        let err = debug_info(&RecordingGenerator::broken_signature("module not loaded")).unwrap_err();
        assert_eq!(err.to_string(), "failed to introspect generator: module not loaded");
    }
}
