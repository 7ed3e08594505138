use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    UuidPath, ValidatedJson, author_from_headers,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CommentResult;
use crate::models::{
    Comment, CommentFilter, CreateComment, CreateCommentParams, Notification,
    NotificationPreference, NotificationQuery, PreferenceRecord, UpdateComment,
};
use crate::repository::{CommentRepository, NotificationRepository, PreferenceRepository};
use crate::service::CommentService;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_comments,
        create_comment,
        get_comment,
        update_comment,
        delete_comment,
        list_notifications,
        get_preference,
        set_preference,
    ),
    components(
        schemas(
            Comment,
            CreateComment,
            UpdateComment,
            Notification,
            NotificationPreference,
            PreferenceRecord
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Comments", description = "Comments, organizer notifications and preferences")
    )
)]
pub struct ApiDoc;

type SharedService<R, P, N> = Arc<CommentService<R, P, N>>;

/// Comment routes, mounted under `/comments`
pub fn router<R, P, N>(service: CommentService<R, P, N>) -> Router
where
    R: CommentRepository + 'static,
    P: PreferenceRepository + 'static,
    N: NotificationRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/comments", get(list_comments).post(create_comment))
        .route("/comments/", get(list_comments).post(create_comment))
        .route("/comments/notifications", get(list_notifications))
        .route("/comments/preferences", post(set_preference))
        .route("/comments/preferences/{email}", get(get_preference))
        .route(
            "/comments/{id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
        .with_state(shared_service)
}

#[utoipa::path(
    get,
    path = "/comments/",
    tag = "Comments",
    params(CommentFilter),
    responses(
        (status = 200, description = "Matching comments", body = Vec<Comment>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_comments<R, P, N>(
    State(service): State<SharedService<R, P, N>>,
    Query(filter): Query<CommentFilter>,
) -> CommentResult<Json<Vec<Comment>>>
where
    R: CommentRepository,
    P: PreferenceRepository,
    N: NotificationRepository,
{
    let comments = service.list_comments(filter).await?;
    Ok(Json(comments))
}

/// Create a comment and notify the event organizer
///
/// The author is read from `x-user-name`. Notification problems never fail the
/// request; `enviar_email=false` skips the notification entirely.
#[utoipa::path(
    post,
    path = "/comments/",
    tag = "Comments",
    params(CreateCommentParams),
    request_body = CreateComment,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_comment<R, P, N>(
    State(service): State<SharedService<R, P, N>>,
    Query(params): Query<CreateCommentParams>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateComment>,
) -> CommentResult<impl IntoResponse>
where
    R: CommentRepository,
    P: PreferenceRepository,
    N: NotificationRepository,
{
    let author = author_from_headers(&headers);
    let comment = service
        .create_comment(input, &author, params.enviar_email)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[utoipa::path(
    get,
    path = "/comments/{id}",
    tag = "Comments",
    params(
        ("id" = Uuid, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Comment found", body = Comment),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_comment<R, P, N>(
    State(service): State<SharedService<R, P, N>>,
    UuidPath(id): UuidPath,
) -> CommentResult<Json<Comment>>
where
    R: CommentRepository,
    P: PreferenceRepository,
    N: NotificationRepository,
{
    let comment = service.get_comment(id).await?;
    Ok(Json(comment))
}

#[utoipa::path(
    put,
    path = "/comments/{id}",
    tag = "Comments",
    params(
        ("id" = Uuid, Path, description = "Comment ID")
    ),
    request_body = UpdateComment,
    responses(
        (status = 200, description = "Comment updated", body = Comment),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_comment<R, P, N>(
    State(service): State<SharedService<R, P, N>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateComment>,
) -> CommentResult<Json<Comment>>
where
    R: CommentRepository,
    P: PreferenceRepository,
    N: NotificationRepository,
{
    let comment = service.update_comment(id, input).await?;
    Ok(Json(comment))
}

#[utoipa::path(
    delete,
    path = "/comments/{id}",
    tag = "Comments",
    params(
        ("id" = Uuid, Path, description = "Comment ID")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_comment<R, P, N>(
    State(service): State<SharedService<R, P, N>>,
    UuidPath(id): UuidPath,
) -> CommentResult<impl IntoResponse>
where
    R: CommentRepository,
    P: PreferenceRepository,
    N: NotificationRepository,
{
    service.delete_comment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// In-app notifications of a user, newest first (at most 50)
#[utoipa::path(
    get,
    path = "/comments/notifications",
    tag = "Comments",
    params(NotificationQuery),
    responses(
        (status = 200, description = "Notifications", body = Vec<Notification>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_notifications<R, P, N>(
    State(service): State<SharedService<R, P, N>>,
    Query(query): Query<NotificationQuery>,
) -> CommentResult<Json<Vec<Notification>>>
where
    R: CommentRepository,
    P: PreferenceRepository,
    N: NotificationRepository,
{
    let notifications = service.notifications_for(&query.email).await?;
    Ok(Json(notifications))
}

#[utoipa::path(
    get,
    path = "/comments/preferences/{email}",
    tag = "Comments",
    params(
        ("email" = String, Path, description = "User email")
    ),
    responses(
        (status = 200, description = "Stored preference, `email` by default", body = PreferenceRecord),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_preference<R, P, N>(
    State(service): State<SharedService<R, P, N>>,
    Path(email): Path<String>,
) -> CommentResult<Json<PreferenceRecord>>
where
    R: CommentRepository,
    P: PreferenceRepository,
    N: NotificationRepository,
{
    let record = service.preference_for(&email).await?;
    Ok(Json(record))
}

/// Store a notification preference. Unknown values are stored as `email`.
#[utoipa::path(
    post,
    path = "/comments/preferences",
    tag = "Comments",
    request_body = PreferenceRecord,
    responses(
        (status = 200, description = "Preference stored", body = PreferenceRecord),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn set_preference<R, P, N>(
    State(service): State<SharedService<R, P, N>>,
    ValidatedJson(input): ValidatedJson<PreferenceRecord>,
) -> CommentResult<Json<PreferenceRecord>>
where
    R: CommentRepository,
    P: PreferenceRepository,
    N: NotificationRepository,
{
    let record = service.set_preference(input).await?;
    Ok(Json(record))
}
