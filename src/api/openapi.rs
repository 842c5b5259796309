use utoipa::OpenApi;

use super::{
    debug::{DebugError, DebugInfo},
    error::ErrorMessage,
    generate::{Descriptor, GenerateRequest},
};

/// OpenAPI document for the routes served under `/api/py`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ERC-7730 descriptor API",
        description = "Generates ERC-7730 clear-signing descriptors from an ABI or a verified contract address"
    ),
    paths(
        super::generate::generate_erc7730_handler,
        super::debug::debug_handler,
        super::health::health_handler,
    ),
    components(schemas(GenerateRequest, Descriptor, ErrorMessage, DebugInfo, DebugError)),
    tags((name = "erc7730", description = "Descriptor generation"))
)]
pub struct ApiDoc;
