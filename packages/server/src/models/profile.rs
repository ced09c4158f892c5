use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

use crate::entity::teacher_profile;

use super::class::PublicClassItem;

/// Homepage text fields. Each present field is stored as sent, including
/// the empty string; absent fields are left alone.
#[derive(Deserialize, Default, PartialEq, Debug, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    #[schema(example = "Physics with Nimal")]
    pub profile_title: Option<String>,
    pub public_contact_number: Option<String>,
    pub public_email_address: Option<String>,
    pub youtube_video_url: Option<String>,
    pub facebook_url: Option<String>,
    pub youtube_channel_url: Option<String>,
    pub tiktok_url: Option<String>,
    pub instagram_url: Option<String>,
    pub homepage_headline: Option<String>,
    pub homepage_subheadline: Option<String>,
    pub about_text: Option<String>,
}

impl UpdateProfileRequest {
    pub fn apply(self, active: &mut teacher_profile::ActiveModel) {
        let fields = [
            (self.profile_title, &mut active.profile_title),
            (self.public_contact_number, &mut active.public_contact_number),
            (self.public_email_address, &mut active.public_email_address),
            (self.youtube_video_url, &mut active.youtube_video_url),
            (self.facebook_url, &mut active.facebook_url),
            (self.youtube_channel_url, &mut active.youtube_channel_url),
            (self.tiktok_url, &mut active.tiktok_url),
            (self.instagram_url, &mut active.instagram_url),
            (self.homepage_headline, &mut active.homepage_headline),
            (self.homepage_subheadline, &mut active.homepage_subheadline),
            (self.about_text, &mut active.about_text),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = Set(value);
            }
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TeacherProfileResponse {
    pub id: i32,
    pub user_id: i32,
    pub profile_title: String,
    pub public_contact_number: String,
    pub public_email_address: String,
    pub youtube_video_url: String,
    pub facebook_url: String,
    pub youtube_channel_url: String,
    pub tiktok_url: String,
    pub instagram_url: String,
    pub homepage_headline: String,
    pub homepage_subheadline: String,
    pub about_text: String,
    pub logo_url: String,
    pub main_image_url: String,
    pub updated_at: DateTime<Utc>,
}

impl From<teacher_profile::Model> for TeacherProfileResponse {
    fn from(m: teacher_profile::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            profile_title: m.profile_title,
            public_contact_number: m.public_contact_number,
            public_email_address: m.public_email_address,
            youtube_video_url: m.youtube_video_url,
            facebook_url: m.facebook_url,
            youtube_channel_url: m.youtube_channel_url,
            tiktok_url: m.tiktok_url,
            instagram_url: m.instagram_url,
            homepage_headline: m.homepage_headline,
            homepage_subheadline: m.homepage_subheadline,
            about_text: m.about_text,
            logo_url: m.logo_url,
            main_image_url: m.main_image_url,
            updated_at: m.updated_at,
        }
    }
}

/// Everything a visitor needs to render a teacher's homepage.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PublicProfileResponse {
    pub teacher_id: i32,
    #[schema(example = "Nimal Perera")]
    pub teacher_name: String,
    pub profile: TeacherProfileResponse,
    pub classes: Vec<PublicClassItem>,
}
