//! Lessons and papers share one shape: PDF-backed teaching material.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{lesson, paper};
use crate::error::AppError;

use super::shared::{require_fields, validate_present};

/// Text fields read from a material upload form.
#[derive(Debug, Default)]
pub struct MaterialForm {
    pub title: String,
    pub description: String,
    pub subject: String,
    pub grade: String,
}

impl MaterialForm {
    /// Store a text field by form name. Returns `false` for unknown names.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "title" => &mut self.title,
            "description" => &mut self.description,
            "subject" => &mut self.subject,
            "grade" => &mut self.grade,
            _ => return false,
        };
        *slot = value;
        true
    }

    pub fn validate(&self) -> Result<(), AppError> {
        require_fields(&[
            ("title", &self.title),
            ("subject", &self.subject),
            ("grade", &self.grade),
        ])
    }
}

/// Metadata edit. An empty `description` is stored as given.
#[derive(Deserialize, Default, PartialEq, Debug, utoipa::ToSchema)]
pub struct UpdateMaterialRequest {
    #[schema(example = "Kinematics, part 2")]
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub grade: Option<String>,
}

pub fn validate_update_material(payload: &UpdateMaterialRequest) -> Result<(), AppError> {
    validate_present("title", payload.title.as_deref())?;
    validate_present("subject", payload.subject.as_deref())?;
    validate_present("grade", payload.grade.as_deref())?;
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MaterialResponse {
    #[schema(example = 11)]
    pub id: i32,
    pub teacher_id: i32,
    #[schema(example = "Kinematics")]
    pub title: String,
    pub description: String,
    #[schema(example = "Physics")]
    pub subject: String,
    #[schema(example = "12")]
    pub grade: String,
    /// Public link to the PDF.
    pub file_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<lesson::Model> for MaterialResponse {
    fn from(m: lesson::Model) -> Self {
        Self {
            id: m.id,
            teacher_id: m.teacher_id,
            title: m.title,
            description: m.description,
            subject: m.subject,
            grade: m.grade,
            file_url: m.file_url,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<paper::Model> for MaterialResponse {
    fn from(m: paper::Model) -> Self {
        Self {
            id: m.id,
            teacher_id: m.teacher_id,
            title: m.title,
            description: m.description,
            subject: m.subject,
            grade: m.grade,
            file_url: m.file_url,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DeleteMaterialResponse {
    pub id: i32,
    #[schema(example = "Lesson deleted successfully")]
    pub message: String,
}
