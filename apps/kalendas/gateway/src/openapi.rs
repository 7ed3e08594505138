use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kalendas API Gateway",
        version = "0.1.0",
        description = "Single entry point. `/{service}/...` is forwarded to calendar, event, comment or external."
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    )
)]
struct GatewayInfo;

pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        GatewayInfo::openapi().merge_from(gateway::ApiDoc::openapi())
    }
}
