use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kalendas Event Service",
        version = "0.1.0",
        description = "Events, attachments and calendar-hierarchy listings"
    ),
    servers(
        (url = "http://localhost:8002", description = "Local development server")
    )
)]
struct ServiceInfo;

pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        ServiceInfo::openapi().merge_from(domain_events::ApiDoc::openapi())
    }
}
