use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use common::AttendanceStatus;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Upper bound on records in one marking request.
pub const MAX_RECORDS_PER_REQUEST: usize = 500;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct MarkAttendanceRequest {
    #[schema(example = 3)]
    pub class_id: i32,
    /// Calendar date of the session.
    #[schema(value_type = String, format = Date, example = "2025-11-08")]
    pub class_date: NaiveDate,
    pub records: Vec<AttendanceEntry>,
}

#[derive(Deserialize, Clone, Debug, PartialEq, utoipa::ToSchema)]
pub struct AttendanceEntry {
    #[schema(example = 7)]
    pub student_id: i32,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

pub fn validate_mark_attendance(payload: &MarkAttendanceRequest) -> Result<(), AppError> {
    if payload.records.is_empty() {
        return Err(AppError::Validation(
            "Please provide class, date and attendance records".into(),
        ));
    }
    if payload.records.len() > MAX_RECORDS_PER_REQUEST {
        return Err(AppError::Validation(format!(
            "Too many attendance records: max {MAX_RECORDS_PER_REQUEST}"
        )));
    }
    Ok(())
}

/// Collapse repeated students to their last entry, keeping first-seen order.
pub fn last_entry_per_student(records: Vec<AttendanceEntry>) -> Vec<AttendanceEntry> {
    let mut index: HashMap<i32, usize> = HashMap::new();
    let mut out: Vec<AttendanceEntry> = Vec::with_capacity(records.len());
    for entry in records {
        match index.get(&entry.student_id) {
            Some(&i) => out[i] = entry,
            None => {
                index.insert(entry.student_id, out.len());
                out.push(entry);
            }
        }
    }
    out
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MarkAttendanceResponse {
    #[schema(example = "Attendance marked successfully")]
    pub message: String,
    /// Records written, after collapsing repeated students.
    #[schema(example = 12)]
    pub recorded: usize,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClassAttendanceQuery {
    /// Only records for this date (`YYYY-MM-DD`).
    #[param(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
}

/// A class's attendance row as seen by its teacher.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ClassAttendanceItem {
    pub id: i32,
    pub student_id: i32,
    pub student_name: String,
    pub class_id: i32,
    #[schema(value_type = String, format = Date)]
    pub class_date: NaiveDate,
    pub status: AttendanceStatus,
    pub notes: String,
    pub updated_at: DateTime<Utc>,
}

/// A student's own attendance row.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MyAttendanceItem {
    pub id: i32,
    pub class_id: i32,
    /// `None` once the class has been deleted.
    pub class_subject: Option<String>,
    pub class_grade: Option<String>,
    pub teacher_name: Option<String>,
    #[schema(value_type = String, format = Date)]
    pub class_date: NaiveDate,
    pub status: AttendanceStatus,
    pub notes: String,
}
