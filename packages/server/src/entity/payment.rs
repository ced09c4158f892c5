use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub student_id: i32,
    #[sea_orm(belongs_to, from = "student_id", to = "id")]
    pub student: HasOne<super::user::Entity>,
    #[sea_orm(indexed)]
    pub teacher_id: i32,
    /// Not a foreign key: payment history outlives a deleted class.
    pub class_id: i32,

    pub amount: f64,
    /// Period the fee covers, e.g. ("March", 2025). Not the receipt date.
    pub fee_month: String,
    pub fee_year: i32,
    /// When the payment was received.
    pub payment_date: DateTimeUtc,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
