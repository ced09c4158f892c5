use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::video;
use crate::error::AppError;

use super::shared::{require_fields, validate_http_url, validate_present};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateVideoRequest {
    #[serde(default)]
    #[schema(example = "Projectile motion")]
    pub topic: String,
    #[serde(default)]
    #[schema(example = "Physics")]
    pub subject: String,
    #[serde(default)]
    #[schema(example = "12")]
    pub grade: String,
    /// Externally hosted link, e.g. YouTube.
    #[serde(default)]
    #[schema(example = "https://www.youtube.com/watch?v=abc123")]
    pub video_url: String,
}

pub fn validate_create_video(payload: &CreateVideoRequest) -> Result<(), AppError> {
    require_fields(&[
        ("topic", &payload.topic),
        ("subject", &payload.subject),
        ("grade", &payload.grade),
        ("video_url", &payload.video_url),
    ])?;
    validate_http_url("video_url", &payload.video_url)
}

#[derive(Deserialize, Default, PartialEq, Debug, utoipa::ToSchema)]
pub struct UpdateVideoRequest {
    pub topic: Option<String>,
    pub subject: Option<String>,
    pub grade: Option<String>,
    pub video_url: Option<String>,
}

pub fn validate_update_video(payload: &UpdateVideoRequest) -> Result<(), AppError> {
    validate_present("topic", payload.topic.as_deref())?;
    validate_present("subject", payload.subject.as_deref())?;
    validate_present("grade", payload.grade.as_deref())?;
    if let Some(ref url) = payload.video_url {
        validate_http_url("video_url", url)?;
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct VideoResponse {
    pub id: i32,
    pub teacher_id: i32,
    pub topic: String,
    pub subject: String,
    pub grade: String,
    pub video_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<video::Model> for VideoResponse {
    fn from(m: video::Model) -> Self {
        Self {
            id: m.id,
            teacher_id: m.teacher_id,
            topic: m.topic,
            subject: m.subject,
            grade: m.grade,
            video_url: m.video_url,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
