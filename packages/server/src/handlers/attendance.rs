use std::collections::HashSet;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{attendance, class, class_student, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::{AppJson, AppQuery};
use crate::handlers::class::class_labels;
use crate::models::attendance::*;
use crate::state::AppState;
use crate::utils::ownership::find_owned;

#[utoipa::path(
    post,
    path = "/",
    tag = "Attendance",
    operation_id = "markAttendance",
    summary = "Mark attendance for a class session",
    description = "Writes one record per student for the class and date. Marking the same student, class and date again \
        overwrites the earlier status and notes. Every student must be enrolled in the class. \
        A student listed twice in one request keeps the last entry.",
    request_body = MarkAttendanceRequest,
    responses(
        (status = 201, description = "Attendance recorded", body = MarkAttendanceResponse),
        (status = 400, description = "Validation error or student not enrolled (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the class owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Class not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(
    skip(state, auth_user, payload),
    fields(user_id = auth_user.user_id, class_id = payload.class_id, class_date = %payload.class_date)
)]
pub async fn mark_attendance(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<MarkAttendanceRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_teacher()?;
    validate_mark_attendance(&payload)?;

    let class_id = payload.class_id;
    let class_date = payload.class_date;
    find_owned::<class::Entity, _>(&state.db, class_id, &auth_user).await?;

    let records = last_entry_per_student(payload.records);

    let enrolled: HashSet<i32> = class_student::Entity::find()
        .filter(class_student::Column::ClassId.eq(class_id))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|row| row.student_id)
        .collect();
    if let Some(stranger) = records.iter().find(|r| !enrolled.contains(&r.student_id)) {
        return Err(AppError::Validation(format!(
            "Student {} is not enrolled in this class",
            stranger.student_id
        )));
    }

    let now = chrono::Utc::now();
    let recorded = records.len();
    let rows = records.into_iter().map(|r| attendance::ActiveModel {
        student_id: Set(r.student_id),
        class_id: Set(class_id),
        teacher_id: Set(auth_user.user_id),
        class_date: Set(class_date),
        status: Set(r.status),
        notes: Set(r.notes.unwrap_or_default()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    });

    // Relies on the unique index from `seed::ensure_indexes`.
    attendance::Entity::insert_many(rows)
        .on_conflict(
            OnConflict::columns([
                attendance::Column::StudentId,
                attendance::Column::ClassId,
                attendance::Column::ClassDate,
            ])
            .update_columns([
                attendance::Column::Status,
                attendance::Column::Notes,
                attendance::Column::TeacherId,
                attendance::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec_without_returning(&state.db)
        .await?;

    tracing::info!(recorded, "Attendance marked");
    Ok((
        StatusCode::CREATED,
        Json(MarkAttendanceResponse {
            message: "Attendance marked successfully".into(),
            recorded,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/class/{class_id}",
    tag = "Attendance",
    operation_id = "getClassAttendance",
    summary = "Attendance records of a class",
    description = "Newest session first. Pass `date` to get a single session.",
    params(
        ("class_id" = i32, Path, description = "Class ID"),
        ClassAttendanceQuery,
    ),
    responses(
        (status = 200, description = "Attendance records", body = Vec<ClassAttendanceItem>),
        (status = 400, description = "Malformed date (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the class owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Class not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.user_id, class_id))]
pub async fn class_attendance(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(class_id): Path<i32>,
    AppQuery(query): AppQuery<ClassAttendanceQuery>,
) -> Result<Json<Vec<ClassAttendanceItem>>, AppError> {
    auth_user.require_teacher()?;
    find_owned::<class::Entity, _>(&state.db, class_id, &auth_user).await?;

    let mut select = attendance::Entity::find().filter(attendance::Column::ClassId.eq(class_id));
    if let Some(date) = query.date {
        select = select.filter(attendance::Column::ClassDate.eq(date));
    }

    let rows = select
        .find_also_related(user::Entity)
        .order_by_desc(attendance::Column::ClassDate)
        .order_by_asc(attendance::Column::StudentId)
        .all(&state.db)
        .await?;

    let items = rows
        .into_iter()
        .map(|(a, student)| ClassAttendanceItem {
            id: a.id,
            student_id: a.student_id,
            student_name: student.map(|s| s.name).unwrap_or_default(),
            class_id: a.class_id,
            class_date: a.class_date,
            status: a.status,
            notes: a.notes,
            updated_at: a.updated_at,
        })
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/myattendance",
    tag = "Attendance",
    operation_id = "getMyAttendance",
    summary = "The caller's own attendance history",
    description = "Newest class date first, with class and teacher details.",
    responses(
        (status = 200, description = "Attendance history", body = Vec<MyAttendanceItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn my_attendance(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<MyAttendanceItem>>, AppError> {
    let rows = attendance::Entity::find()
        .filter(attendance::Column::StudentId.eq(auth_user.user_id))
        .order_by_desc(attendance::Column::ClassDate)
        .order_by_desc(attendance::Column::Id)
        .all(&state.db)
        .await?;

    let labels = class_labels(&state.db, rows.iter().map(|a| a.class_id)).await?;

    let items = rows
        .into_iter()
        .map(|a| {
            let label = labels.get(&a.class_id);
            MyAttendanceItem {
                id: a.id,
                class_id: a.class_id,
                class_subject: label.map(|l| l.subject.clone()),
                class_grade: label.map(|l| l.grade.clone()),
                teacher_name: label.map(|l| l.teacher_name.clone()),
                class_date: a.class_date,
                status: a.status,
                notes: a.notes,
            }
        })
        .collect();

    Ok(Json(items))
}
