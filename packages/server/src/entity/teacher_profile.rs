use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Public homepage data for a teacher. At most one row per user.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teacher_profile")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
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
    #[sea_orm(column_type = "Text")]
    pub about_text: String,

    pub logo_url: String,
    pub logo_public_id: String,
    pub main_image_url: String,
    pub main_image_public_id: String,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
