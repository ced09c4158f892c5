use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::storage::MediaKind;
use sea_orm::*;
use tracing::instrument;

use crate::entity::paper;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::handlers::material::{deleted_message, read_material_form, teachers_of_student};
use crate::models::material::*;
use crate::models::shared::clean;
use crate::state::AppState;
use crate::utils::ownership::find_owned;
use crate::utils::upload::{UploadRule, delete_best_effort, upload_then_commit};

/// Storage folder for paper PDFs.
pub const PAPER_FOLDER: &str = "papers";

#[utoipa::path(
    get,
    path = "/",
    tag = "Papers",
    operation_id = "listPapers",
    summary = "List the teacher's papers",
    responses(
        (status = 200, description = "Own papers, newest first", body = Vec<MaterialResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (FORBIDDEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_papers(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<MaterialResponse>>, AppError> {
    auth_user.require_teacher()?;

    let papers = paper::Entity::find()
        .filter(paper::Column::TeacherId.eq(auth_user.user_id))
        .order_by_desc(paper::Column::CreatedAt)
        .order_by_desc(paper::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(papers.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Papers",
    operation_id = "createPaper",
    summary = "Upload a paper",
    description = "Multipart form with `title`, `description`, `subject`, `grade` and a PDF in `file`. \
        The PDF is stored first; if saving the paper then fails, the stored file is removed again.",
    request_body(content_type = "multipart/form-data", description = "Paper fields and PDF file"),
    responses(
        (status = 201, description = "Paper created", body = MaterialResponse),
        (status = 400, description = "Missing field or not a PDF (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (FORBIDDEN)", body = ErrorBody),
        (status = 413, description = "File too large (PAYLOAD_TOO_LARGE)", body = ErrorBody),
        (status = 500, description = "Storage failure (UPLOAD_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(user_id = auth_user.user_id))]
pub async fn create_paper(
    auth_user: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_teacher()?;

    let rule = UploadRule::document(&state.config.upload);
    let (form, upload) = read_material_form(multipart, &rule).await?;

    let db = &state.db;
    let teacher_id = auth_user.user_id;
    let model = upload_then_commit(
        state.media.as_ref(),
        upload,
        PAPER_FOLDER,
        MediaKind::Document,
        |stored| async move {
            let now = chrono::Utc::now();
            paper::ActiveModel {
                teacher_id: Set(teacher_id),
                title: Set(clean(&form.title)),
                description: Set(form.description),
                subject: Set(clean(&form.subject)),
                grade: Set(clean(&form.grade)),
                file_url: Set(stored.url),
                storage_public_id: Set(stored.public_id),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await
            .map_err(AppError::from)
        },
    )
    .await?;

    tracing::info!(paper_id = model.id, "Paper created");
    Ok((StatusCode::CREATED, Json(MaterialResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Papers",
    operation_id = "updatePaper",
    summary = "Edit paper details",
    description = "Applies only the fields present in the body. An empty `description` clears it. The file cannot be replaced.",
    params(("id" = i32, Path, description = "Paper ID")),
    request_body = UpdateMaterialRequest,
    responses(
        (status = 200, description = "Paper updated", body = MaterialResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Paper not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, id))]
pub async fn update_paper(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateMaterialRequest>,
) -> Result<Json<MaterialResponse>, AppError> {
    auth_user.require_teacher()?;
    validate_update_material(&payload)?;

    let existing = find_owned::<paper::Entity, _>(&state.db, id, &auth_user).await?;
    if payload == UpdateMaterialRequest::default() {
        return Ok(Json(existing.into()));
    }

    let mut active: paper::ActiveModel = existing.into();
    if let Some(ref title) = payload.title {
        active.title = Set(clean(title));
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(ref subject) = payload.subject {
        active.subject = Set(clean(subject));
    }
    if let Some(ref grade) = payload.grade {
        active.grade = Set(clean(grade));
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Papers",
    operation_id = "deletePaper",
    summary = "Delete a paper",
    description = "Removes the stored PDF, then the paper. If the file cannot be removed the paper is still deleted and the message says the file may remain.",
    params(("id" = i32, Path, description = "Paper ID")),
    responses(
        (status = 200, description = "Paper deleted", body = DeleteMaterialResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Paper not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, id))]
pub async fn delete_paper(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeleteMaterialResponse>, AppError> {
    auth_user.require_teacher()?;

    let existing = find_owned::<paper::Entity, _>(&state.db, id, &auth_user).await?;
    let file_removed = delete_best_effort(
        state.media.as_ref(),
        &existing.storage_public_id,
        MediaKind::Document,
    )
    .await;

    paper::Entity::delete_by_id(id).exec(&state.db).await?;

    Ok(Json(DeleteMaterialResponse {
        id,
        message: deleted_message("Paper", file_removed),
    }))
}

#[utoipa::path(
    get,
    path = "/student",
    tag = "Papers",
    operation_id = "listStudentPapers",
    summary = "Papers visible to the caller as a student",
    description = "Papers published by the teachers of the classes the caller is enrolled in, newest first.",
    responses(
        (status = 200, description = "Visible papers", body = Vec<MaterialResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_student_papers(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<MaterialResponse>>, AppError> {
    let papers = paper::Entity::find()
        .filter(paper::Column::TeacherId.in_subquery(teachers_of_student(auth_user.user_id)))
        .order_by_desc(paper::Column::CreatedAt)
        .order_by_desc(paper::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(papers.into_iter().map(Into::into).collect()))
}
