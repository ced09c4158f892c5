use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::*;
use tracing::instrument;

use crate::entity::video;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::handlers::material::teachers_of_student;
use crate::models::shared::{MessageResponse, clean};
use crate::models::video::*;
use crate::state::AppState;
use crate::utils::ownership::find_owned;

#[utoipa::path(
    get,
    path = "/",
    tag = "Videos",
    operation_id = "listVideos",
    summary = "List the teacher's videos",
    responses(
        (status = 200, description = "Own videos, newest first", body = Vec<VideoResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (FORBIDDEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_videos(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<VideoResponse>>, AppError> {
    auth_user.require_teacher()?;

    let videos = video::Entity::find()
        .filter(video::Column::TeacherId.eq(auth_user.user_id))
        .order_by_desc(video::Column::CreatedAt)
        .order_by_desc(video::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(videos.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Videos",
    operation_id = "createVideo",
    summary = "Add a video link",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Video added", body = VideoResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (FORBIDDEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn create_video(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateVideoRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_teacher()?;
    validate_create_video(&payload)?;

    let now = chrono::Utc::now();
    let model = video::ActiveModel {
        teacher_id: Set(auth_user.user_id),
        topic: Set(clean(&payload.topic)),
        subject: Set(clean(&payload.subject)),
        grade: Set(clean(&payload.grade)),
        video_url: Set(clean(&payload.video_url)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(VideoResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Videos",
    operation_id = "updateVideo",
    summary = "Edit a video",
    params(("id" = i32, Path, description = "Video ID")),
    request_body = UpdateVideoRequest,
    responses(
        (status = 200, description = "Video updated", body = VideoResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, id))]
pub async fn update_video(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateVideoRequest>,
) -> Result<Json<VideoResponse>, AppError> {
    auth_user.require_teacher()?;
    validate_update_video(&payload)?;

    let existing = find_owned::<video::Entity, _>(&state.db, id, &auth_user).await?;
    if payload == UpdateVideoRequest::default() {
        return Ok(Json(existing.into()));
    }

    let mut active: video::ActiveModel = existing.into();
    if let Some(ref topic) = payload.topic {
        active.topic = Set(clean(topic));
    }
    if let Some(ref subject) = payload.subject {
        active.subject = Set(clean(subject));
    }
    if let Some(ref grade) = payload.grade {
        active.grade = Set(clean(grade));
    }
    if let Some(ref url) = payload.video_url {
        active.video_url = Set(clean(url));
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Videos",
    operation_id = "deleteVideo",
    summary = "Delete a video",
    params(("id" = i32, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video removed", body = MessageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, id))]
pub async fn delete_video(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_user.require_teacher()?;

    find_owned::<video::Entity, _>(&state.db, id, &auth_user).await?;
    video::Entity::delete_by_id(id).exec(&state.db).await?;

    Ok(Json(MessageResponse::new("Video removed")))
}

#[utoipa::path(
    get,
    path = "/student",
    tag = "Videos",
    operation_id = "listStudentVideos",
    summary = "Videos visible to the caller as a student",
    description = "Videos published by the teachers of the classes the caller is enrolled in, newest first.",
    responses(
        (status = 200, description = "Visible videos", body = Vec<VideoResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_student_videos(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<VideoResponse>>, AppError> {
    let videos = video::Entity::find()
        .filter(video::Column::TeacherId.in_subquery(teachers_of_student(auth_user.user_id)))
        .order_by_desc(video::Column::CreatedAt)
        .order_by_desc(video::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(videos.into_iter().map(Into::into).collect()))
}
