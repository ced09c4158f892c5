use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::UserRole;
use sea_orm::sea_query::{OnConflict, Query as SeaQuery};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{class, class_student, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::StudentSummary;
use crate::models::class::*;
use crate::models::shared::{MessageResponse, clean, clean_optional};
use crate::state::AppState;
use crate::utils::ownership::{ensure_owner, find_owned};

/// Enrolled student ids per class, each list in enrollment order.
pub(crate) async fn student_ids_by_class<C: ConnectionTrait>(
    db: &C,
    class_ids: &[i32],
) -> Result<HashMap<i32, Vec<i32>>, DbErr> {
    if class_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = class_student::Entity::find()
        .filter(class_student::Column::ClassId.is_in(class_ids.iter().copied()))
        .order_by_asc(class_student::Column::EnrolledAt)
        .order_by_asc(class_student::Column::StudentId)
        .all(db)
        .await?;

    let mut map: HashMap<i32, Vec<i32>> = HashMap::new();
    for row in rows {
        map.entry(row.class_id).or_default().push(row.student_id);
    }
    Ok(map)
}

async fn class_response<C: ConnectionTrait>(
    db: &C,
    model: class::Model,
) -> Result<ClassResponse, AppError> {
    let mut ids = student_ids_by_class(db, &[model.id]).await?;
    let students = ids.remove(&model.id).unwrap_or_default();
    Ok(ClassResponse::new(model, students))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Classes",
    operation_id = "listClasses",
    summary = "List the teacher's classes",
    description = "Classes owned by the caller, newest first, with enrolled student ids. Teachers only.",
    responses(
        (status = 200, description = "Own classes", body = Vec<ClassResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (FORBIDDEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_classes(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ClassResponse>>, AppError> {
    auth_user.require_teacher()?;

    let classes = class::Entity::find()
        .filter(class::Column::TeacherId.eq(auth_user.user_id))
        .order_by_desc(class::Column::CreatedAt)
        .order_by_desc(class::Column::Id)
        .all(&state.db)
        .await?;

    let ids: Vec<i32> = classes.iter().map(|c| c.id).collect();
    let mut students = student_ids_by_class(&state.db, &ids).await?;

    let data = classes
        .into_iter()
        .map(|c| {
            let ids = students.remove(&c.id).unwrap_or_default();
            ClassResponse::new(c, ids)
        })
        .collect();

    Ok(Json(data))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Classes",
    operation_id = "createClass",
    summary = "Create a class",
    description = "Creates a class owned by the caller. `subject` and `grade` are required; `price` defaults to 0. Teachers only.",
    request_body = CreateClassRequest,
    responses(
        (status = 201, description = "Class created", body = ClassResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (FORBIDDEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn create_class(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateClassRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_teacher()?;
    validate_create_class(&payload)?;

    let now = chrono::Utc::now();
    let model = class::ActiveModel {
        teacher_id: Set(auth_user.user_id),
        subject: Set(clean(&payload.subject)),
        grade: Set(clean(&payload.grade)),
        area: Set(clean_optional(payload.area)),
        time: Set(clean_optional(payload.time)),
        price: Set(payload.price.unwrap_or(0.0)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(ClassResponse::new(model, vec![]))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Classes",
    operation_id = "getClass",
    summary = "Get one of the teacher's classes",
    params(("id" = i32, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class", body = ClassResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Class not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, id))]
pub async fn get_class(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ClassResponse>, AppError> {
    auth_user.require_teacher()?;

    let model = find_owned::<class::Entity, _>(&state.db, id, &auth_user).await?;
    Ok(Json(class_response(&state.db, model).await?))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Classes",
    operation_id = "updateClass",
    summary = "Update a class",
    description = "Applies only the fields present in the body. A `price` of 0 is stored as 0. `area` and `time` accept `null` to clear.",
    params(("id" = i32, Path, description = "Class ID")),
    request_body = UpdateClassRequest,
    responses(
        (status = 200, description = "Class updated", body = ClassResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Class not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, id))]
pub async fn update_class(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateClassRequest>,
) -> Result<Json<ClassResponse>, AppError> {
    auth_user.require_teacher()?;
    validate_update_class(&payload)?;

    let existing = find_owned::<class::Entity, _>(&state.db, id, &auth_user).await?;
    if payload == UpdateClassRequest::default() {
        return Ok(Json(class_response(&state.db, existing).await?));
    }

    let mut active: class::ActiveModel = existing.into();
    if let Some(ref subject) = payload.subject {
        active.subject = Set(clean(subject));
    }
    if let Some(ref grade) = payload.grade {
        active.grade = Set(clean(grade));
    }
    if let Some(area) = payload.area {
        active.area = Set(clean_optional(area));
    }
    if let Some(time) = payload.time {
        active.time = Set(clean_optional(time));
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;
    Ok(Json(class_response(&state.db, model).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Classes",
    operation_id = "deleteClass",
    summary = "Delete a class",
    description = "Deletes the class and its enrollments. Attendance and payment history referring to it is kept.",
    params(("id" = i32, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class removed", body = MessageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Class not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, id))]
pub async fn delete_class(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_user.require_teacher()?;

    let txn = state.db.begin().await?;
    find_owned::<class::Entity, _>(&txn, id, &auth_user).await?;

    class_student::Entity::delete_many()
        .filter(class_student::Column::ClassId.eq(id))
        .exec(&txn)
        .await?;
    class::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(Json(MessageResponse::new("Class removed")))
}

#[utoipa::path(
    get,
    path = "/myclasses",
    tag = "Classes",
    operation_id = "listMyClasses",
    summary = "List the classes the caller is enrolled in",
    responses(
        (status = 200, description = "Enrolled classes", body = Vec<MyClassItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn my_classes(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<MyClassItem>>, AppError> {
    let rows = class::Entity::find()
        .filter(class::Column::Id.in_subquery(enrolled_class_ids(auth_user.user_id)))
        .find_also_related(user::Entity)
        .order_by_asc(class::Column::Subject)
        .order_by_asc(class::Column::Id)
        .all(&state.db)
        .await?;

    let items = rows
        .into_iter()
        .map(|(c, teacher)| MyClassItem {
            id: c.id,
            subject: c.subject,
            grade: c.grade,
            area: c.area,
            time: c.time,
            teacher_id: c.teacher_id,
            teacher_name: teacher.map(|t| t.name).unwrap_or_default(),
        })
        .collect();

    Ok(Json(items))
}

/// `SELECT class_id FROM class_student WHERE student_id = ?`
pub(crate) fn enrolled_class_ids(student_id: i32) -> sea_orm::sea_query::SelectStatement {
    SeaQuery::select()
        .column(class_student::Column::ClassId)
        .from(class_student::Entity)
        .and_where(class_student::Column::StudentId.eq(student_id))
        .to_owned()
}

#[utoipa::path(
    get,
    path = "/{id}/students",
    tag = "Enrollment",
    operation_id = "listClassStudents",
    summary = "List students enrolled in a class",
    params(("id" = i32, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Enrolled students", body = Vec<StudentSummary>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Class not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, id))]
pub async fn list_class_students(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<StudentSummary>>, AppError> {
    auth_user.require_teacher()?;
    find_owned::<class::Entity, _>(&state.db, id, &auth_user).await?;

    let students = user::Entity::find()
        .filter(
            user::Column::Id.in_subquery(
                SeaQuery::select()
                    .column(class_student::Column::StudentId)
                    .from(class_student::Entity)
                    .and_where(class_student::Column::ClassId.eq(id))
                    .to_owned(),
            ),
        )
        .order_by_asc(user::Column::Name)
        .order_by_asc(user::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(StudentSummary::from)
        .collect();

    Ok(Json(students))
}

#[utoipa::path(
    put,
    path = "/{id}/enroll",
    tag = "Enrollment",
    operation_id = "enrollStudent",
    summary = "Enroll a student in a class",
    params(("id" = i32, Path, description = "Class ID")),
    request_body = EnrollmentRequest,
    responses(
        (status = 200, description = "Student enrolled", body = StudentSummary),
        (status = 400, description = "Target user is not a student (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Class or student not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already enrolled (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, id, student_id = payload.student_id))]
pub async fn enroll_student(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<EnrollmentRequest>,
) -> Result<Json<StudentSummary>, AppError> {
    auth_user.require_teacher()?;

    let class_model = class::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Class not found".into()))?;
    let student = user::Entity::find_by_id(payload.student_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".into()))?;
    if student.role != UserRole::Student {
        return Err(AppError::Validation("User is not a student".into()));
    }
    ensure_owner(&class_model, &auth_user)?;

    let row = class_student::ActiveModel {
        class_id: Set(id),
        student_id: Set(student.id),
        enrolled_at: Set(chrono::Utc::now()),
    };
    let result = class_student::Entity::insert(row)
        .on_conflict(
            OnConflict::columns([
                class_student::Column::ClassId,
                class_student::Column::StudentId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&state.db)
        .await;

    match result {
        Ok(0) | Err(DbErr::RecordNotInserted) => Err(AppError::Conflict(
            "Student already enrolled in this class".into(),
        )),
        Ok(_) => Ok(Json(student.into())),
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    put,
    path = "/{id}/unenroll",
    tag = "Enrollment",
    operation_id = "unenrollStudent",
    summary = "Remove a student from a class",
    description = "Succeeds whether or not the student was enrolled.",
    params(("id" = i32, Path, description = "Class ID")),
    request_body = EnrollmentRequest,
    responses(
        (status = 200, description = "Student no longer enrolled", body = MessageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Class not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, id, student_id = payload.student_id))]
pub async fn unenroll_student(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<EnrollmentRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_user.require_teacher()?;
    find_owned::<class::Entity, _>(&state.db, id, &auth_user).await?;

    class_student::Entity::delete_many()
        .filter(class_student::Column::ClassId.eq(id))
        .filter(class_student::Column::StudentId.eq(payload.student_id))
        .exec(&state.db)
        .await?;

    Ok(Json(MessageResponse::new("Student removed from class")))
}

/// Display fields of a class for history views.
pub(crate) struct ClassLabel {
    pub subject: String,
    pub grade: String,
    pub teacher_name: String,
}

/// Subject, grade and teacher name per class id. Deleted classes are absent.
pub(crate) async fn class_labels<C: ConnectionTrait>(
    db: &C,
    class_ids: impl IntoIterator<Item = i32>,
) -> Result<HashMap<i32, ClassLabel>, DbErr> {
    let mut ids: Vec<i32> = class_ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = class::Entity::find()
        .filter(class::Column::Id.is_in(ids))
        .find_also_related(user::Entity)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(c, teacher)| {
            (
                c.id,
                ClassLabel {
                    subject: c.subject,
                    grade: c.grade,
                    teacher_name: teacher.map(|t| t.name).unwrap_or_default(),
                },
            )
        })
        .collect())
}
