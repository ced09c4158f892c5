use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use crate::entity::class;
use crate::error::AppError;

use super::shared::{double_option, require_fields, validate_amount, validate_present};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateClassRequest {
    #[serde(default)]
    #[schema(example = "Physics")]
    pub subject: String,
    #[serde(default)]
    #[schema(example = "12")]
    pub grade: String,
    #[schema(example = "Kandy")]
    pub area: Option<String>,
    /// Free-form schedule.
    #[schema(example = "Sat 8.00 AM")]
    pub time: Option<String>,
    /// Monthly fee. Defaults to 0.
    #[schema(example = 2500.0)]
    pub price: Option<f64>,
}

pub fn validate_create_class(payload: &CreateClassRequest) -> Result<(), AppError> {
    require_fields(&[("subject", &payload.subject), ("grade", &payload.grade)])?;
    if let Some(price) = payload.price {
        validate_amount("price", price)?;
    }
    Ok(())
}

/// Only fields present in the body are applied. `area` and `time` may be
/// cleared with `null`.
#[derive(Deserialize, Default, PartialEq, Debug, utoipa::ToSchema)]
pub struct UpdateClassRequest {
    pub subject: Option<String>,
    pub grade: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub area: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub time: Option<Option<String>>,
    pub price: Option<f64>,
}

pub fn validate_update_class(payload: &UpdateClassRequest) -> Result<(), AppError> {
    validate_present("subject", payload.subject.as_deref())?;
    validate_present("grade", payload.grade.as_deref())?;
    if let Some(price) = payload.price {
        validate_amount("price", price)?;
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ClassResponse {
    #[schema(example = 3)]
    pub id: i32,
    pub teacher_id: i32,
    pub subject: String,
    pub grade: String,
    pub area: Option<String>,
    pub time: Option<String>,
    pub price: f64,
    /// Enrolled students.
    pub student_ids: Vec<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClassResponse {
    pub fn new(m: class::Model, student_ids: Vec<i32>) -> Self {
        Self {
            id: m.id,
            teacher_id: m.teacher_id,
            subject: m.subject,
            grade: m.grade,
            area: m.area,
            time: m.time,
            price: m.price,
            student_ids,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct EnrollmentRequest {
    #[schema(example = 7)]
    pub student_id: i32,
}

/// A class as listed for an enrolled student.
#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct MyClassItem {
    pub id: i32,
    pub subject: String,
    pub grade: String,
    pub area: Option<String>,
    pub time: Option<String>,
    pub teacher_id: i32,
    #[schema(example = "Nimal Perera")]
    pub teacher_name: String,
}

/// A class as shown on a teacher's public page.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PublicClassItem {
    pub id: i32,
    pub subject: String,
    pub grade: String,
    pub area: Option<String>,
    pub time: Option<String>,
    pub price: f64,
}

impl From<class::Model> for PublicClassItem {
    fn from(m: class::Model) -> Self {
        Self {
            id: m.id,
            subject: m.subject,
            grade: m.grade,
            area: m.area,
            time: m.time,
            price: m.price,
        }
    }
}
