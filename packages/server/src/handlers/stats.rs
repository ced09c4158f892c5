use axum::{Json, extract::State};
use chrono::{DateTime, NaiveDate, Utc};
use common::AttendanceStatus;
use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{attendance, class, class_student, payment};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::stats::*;
use crate::state::AppState;
use crate::utils::stats::{
    attendance_percentage, distinct_students, monthly_attendance, monthly_revenue, window_start,
};

#[utoipa::path(
    get,
    path = "/teacher",
    tag = "Stats",
    operation_id = "getTeacherStats",
    summary = "Dashboard figures for a teacher",
    description = "Class count, distinct students, total revenue, and revenue per month for the last six months \
        (oldest first, months without payments omitted). Teachers only.",
    responses(
        (status = 200, description = "Teacher dashboard", body = TeacherStatsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (FORBIDDEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn teacher_stats(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<TeacherStatsResponse>, AppError> {
    auth_user.require_teacher()?;
    let teacher_id = auth_user.user_id;

    let active_classes = class::Entity::find()
        .filter(class::Column::TeacherId.eq(teacher_id))
        .count(&state.db)
        .await?;

    let enrolled: Vec<i32> = class_student::Entity::find()
        .filter(
            class_student::Column::ClassId.in_subquery(
                SeaQuery::select()
                    .column(class::Column::Id)
                    .from(class::Entity)
                    .and_where(class::Column::TeacherId.eq(teacher_id))
                    .to_owned(),
            ),
        )
        .select_only()
        .column(class_student::Column::StudentId)
        .into_tuple()
        .all(&state.db)
        .await?;

    let total_revenue: Option<f64> = payment::Entity::find()
        .filter(payment::Column::TeacherId.eq(teacher_id))
        .select_only()
        .column_as(payment::Column::Amount.sum(), "total")
        .into_tuple::<Option<f64>>()
        .one(&state.db)
        .await?
        .flatten();

    let recent: Vec<(DateTime<Utc>, f64)> = payment::Entity::find()
        .filter(payment::Column::TeacherId.eq(teacher_id))
        .filter(payment::Column::CreatedAt.gte(window_start(Utc::now())))
        .select_only()
        .column(payment::Column::CreatedAt)
        .column(payment::Column::Amount)
        .into_tuple()
        .all(&state.db)
        .await?;

    Ok(Json(TeacherStatsResponse {
        active_classes,
        total_students: distinct_students(enrolled),
        total_revenue: total_revenue.unwrap_or(0.0),
        monthly_revenue: monthly_revenue(recent),
    }))
}

#[utoipa::path(
    get,
    path = "/student",
    tag = "Stats",
    operation_id = "getStudentStats",
    summary = "Dashboard figures for the calling student",
    description = "Last payment date, overall attendance rate (100 with no records), enrolled class count, \
        and attendance rate per month of class date for the last six months (oldest first, empty months omitted).",
    responses(
        (status = 200, description = "Student dashboard", body = StudentStatsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn student_stats(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<StudentStatsResponse>, AppError> {
    let student_id = auth_user.user_id;

    let last_fee_paid = payment::Entity::find()
        .filter(payment::Column::StudentId.eq(student_id))
        .order_by_desc(payment::Column::PaymentDate)
        .one(&state.db)
        .await?
        .map(|p| p.payment_date);

    let statuses: Vec<AttendanceStatus> = attendance::Entity::find()
        .filter(attendance::Column::StudentId.eq(student_id))
        .select_only()
        .column(attendance::Column::Status)
        .into_tuple()
        .all(&state.db)
        .await?;

    let enrolled_classes_count = class_student::Entity::find()
        .filter(class_student::Column::StudentId.eq(student_id))
        .count(&state.db)
        .await?;

    let since = window_start(Utc::now()).date_naive();
    let recent: Vec<(NaiveDate, AttendanceStatus)> = attendance::Entity::find()
        .filter(attendance::Column::StudentId.eq(student_id))
        .filter(attendance::Column::ClassDate.gte(since))
        .select_only()
        .column(attendance::Column::ClassDate)
        .column(attendance::Column::Status)
        .into_tuple()
        .all(&state.db)
        .await?;

    Ok(Json(StudentStatsResponse {
        last_fee_paid,
        attendance_percentage: attendance_percentage(statuses),
        enrolled_classes_count,
        monthly_attendance: monthly_attendance(recent),
    }))
}
