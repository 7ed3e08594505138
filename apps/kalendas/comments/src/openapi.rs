use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kalendas Comment Service",
        version = "0.1.0",
        description = "Comments, organizer notifications and notification preferences"
    ),
    servers(
        (url = "http://localhost:8003", description = "Local development server")
    )
)]
struct ServiceInfo;

pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        ServiceInfo::openapi().merge_from(domain_comments::ApiDoc::openapi())
    }
}
