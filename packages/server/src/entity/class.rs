use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "class")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Owning teacher.
    #[sea_orm(indexed)]
    pub teacher_id: i32,
    #[sea_orm(belongs_to, from = "teacher_id", to = "id")]
    pub teacher: HasOne<super::user::Entity>,

    pub subject: String,
    pub grade: String,
    pub area: Option<String>,
    pub time: Option<String>, // free-form schedule, e.g. "Sat 8.00 AM"
    pub price: f64,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
