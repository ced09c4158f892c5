use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use common::UserRole;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{class, payment, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::handlers::class::class_labels;
use crate::models::payment::*;
use crate::models::shared::clean;
use crate::state::AppState;
use crate::utils::ownership::ensure_owner;

#[utoipa::path(
    post,
    path = "/",
    tag = "Payments",
    operation_id = "recordPayment",
    summary = "Record a fee payment",
    description = "Records a payment from a student for one of the caller's classes. \
        `fee_month`/`fee_year` name the period covered; the payment date is the time of recording. An amount of 0 is allowed.",
    request_body = RecordPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = PaymentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the class owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Student or class not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(
    skip(state, auth_user, payload),
    fields(user_id = auth_user.user_id, student_id = payload.student_id, class_id = payload.class_id)
)]
pub async fn record_payment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<RecordPaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_teacher()?;
    validate_record_payment(&payload)?;

    let student = user::Entity::find_by_id(payload.student_id)
        .one(&state.db)
        .await?
        .filter(|u| u.role == UserRole::Student)
        .ok_or_else(|| AppError::NotFound("Student not found".into()))?;

    let class_model = class::Entity::find_by_id(payload.class_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Class not found".into()))?;
    ensure_owner(&class_model, &auth_user)?;

    let now = chrono::Utc::now();
    let model = payment::ActiveModel {
        student_id: Set(student.id),
        teacher_id: Set(auth_user.user_id),
        class_id: Set(class_model.id),
        amount: Set(payload.amount),
        fee_month: Set(clean(&payload.fee_month)),
        fee_year: Set(payload.fee_year),
        payment_date: Set(now),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(payment_id = model.id, amount = model.amount, "Payment recorded");
    Ok((StatusCode::CREATED, Json(PaymentResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/mypayments",
    tag = "Payments",
    operation_id = "listMyPayments",
    summary = "The caller's own payment history",
    description = "Newest payment first, with class and teacher details.",
    responses(
        (status = 200, description = "Payment history", body = Vec<MyPaymentItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn my_payments(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<MyPaymentItem>>, AppError> {
    let rows = payment::Entity::find()
        .filter(payment::Column::StudentId.eq(auth_user.user_id))
        .order_by_desc(payment::Column::PaymentDate)
        .order_by_desc(payment::Column::Id)
        .all(&state.db)
        .await?;

    let labels = class_labels(&state.db, rows.iter().map(|p| p.class_id)).await?;

    let items = rows
        .into_iter()
        .map(|p| {
            let label = labels.get(&p.class_id);
            MyPaymentItem {
                id: p.id,
                class_id: p.class_id,
                class_subject: label.map(|l| l.subject.clone()),
                class_grade: label.map(|l| l.grade.clone()),
                teacher_name: label.map(|l| l.teacher_name.clone()),
                amount: p.amount,
                fee_month: p.fee_month,
                fee_year: p.fee_year,
                payment_date: p.payment_date,
            }
        })
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Payments",
    operation_id = "listReceivedPayments",
    summary = "Payments received by the teacher",
    description = "Newest payment first, with student name and class subject. Teachers only.",
    responses(
        (status = 200, description = "Received payments", body = Vec<ReceivedPaymentItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (FORBIDDEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_received_payments(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ReceivedPaymentItem>>, AppError> {
    auth_user.require_teacher()?;

    let rows = payment::Entity::find()
        .filter(payment::Column::TeacherId.eq(auth_user.user_id))
        .find_also_related(user::Entity)
        .order_by_desc(payment::Column::PaymentDate)
        .order_by_desc(payment::Column::Id)
        .all(&state.db)
        .await?;

    let labels = class_labels(&state.db, rows.iter().map(|(p, _)| p.class_id)).await?;

    let items = rows
        .into_iter()
        .map(|(p, student)| ReceivedPaymentItem {
            id: p.id,
            student_id: p.student_id,
            student_name: student.map(|s| s.name).unwrap_or_default(),
            class_id: p.class_id,
            class_subject: labels.get(&p.class_id).map(|l| l.subject.clone()),
            amount: p.amount,
            fee_month: p.fee_month,
            fee_year: p.fee_year,
            payment_date: p.payment_date,
        })
        .collect();

    Ok(Json(items))
}
