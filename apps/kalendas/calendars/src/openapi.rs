use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kalendas Calendar Service",
        version = "0.1.0",
        description = "Calendars and their subcalendar hierarchy"
    ),
    servers(
        (url = "http://localhost:8001", description = "Local development server")
    )
)]
struct ServiceInfo;

/// Service info plus the calendar domain's paths
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        ServiceInfo::openapi().merge_from(domain_calendars::ApiDoc::openapi())
    }
}
