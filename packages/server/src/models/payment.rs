use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::payment;
use crate::error::AppError;

use super::shared::{require_fields, validate_amount};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct RecordPaymentRequest {
    #[schema(example = 7)]
    pub student_id: i32,
    #[schema(example = 3)]
    pub class_id: i32,
    /// Zero is a valid amount (e.g. a waived month).
    #[schema(example = 2500.0)]
    pub amount: f64,
    /// Month the fee covers.
    #[serde(default)]
    #[schema(example = "November")]
    pub fee_month: String,
    #[schema(example = 2025)]
    pub fee_year: i32,
}

pub fn validate_record_payment(payload: &RecordPaymentRequest) -> Result<(), AppError> {
    require_fields(&[("fee_month", &payload.fee_month)])?;
    validate_amount("amount", payload.amount)?;
    if !(1900..=9999).contains(&payload.fee_year) {
        return Err(AppError::Validation("fee_year is out of range".into()));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PaymentResponse {
    pub id: i32,
    pub student_id: i32,
    pub teacher_id: i32,
    pub class_id: i32,
    pub amount: f64,
    pub fee_month: String,
    pub fee_year: i32,
    /// When the payment was received.
    pub payment_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<payment::Model> for PaymentResponse {
    fn from(m: payment::Model) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            teacher_id: m.teacher_id,
            class_id: m.class_id,
            amount: m.amount,
            fee_month: m.fee_month,
            fee_year: m.fee_year,
            payment_date: m.payment_date,
            created_at: m.created_at,
        }
    }
}

/// A student's own payment history row.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MyPaymentItem {
    pub id: i32,
    pub class_id: i32,
    /// `None` once the class has been deleted.
    pub class_subject: Option<String>,
    pub class_grade: Option<String>,
    pub teacher_name: Option<String>,
    pub amount: f64,
    pub fee_month: String,
    pub fee_year: i32,
    pub payment_date: DateTime<Utc>,
}

/// A payment as listed for the receiving teacher.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ReceivedPaymentItem {
    pub id: i32,
    pub student_id: i32,
    pub student_name: String,
    pub class_id: i32,
    /// `None` once the class has been deleted.
    pub class_subject: Option<String>,
    pub amount: f64,
    pub fee_month: String,
    pub fee_year: i32,
    pub payment_date: DateTime<Utc>,
}
