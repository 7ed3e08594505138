use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kalendas External Import Service",
        version = "0.1.0",
        description = "Imports public iCalendar feeds as Kalendas calendars"
    ),
    servers(
        (url = "http://localhost:8004", description = "Local development server")
    )
)]
struct ServiceInfo;

pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        ServiceInfo::openapi().merge_from(domain_ical_import::ApiDoc::openapi())
    }
}
