#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};

/// Outcome recorded for one student on one class date.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
#[serde(rename_all = "PascalCase")]
pub enum AttendanceStatus {
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Present"))]
    Present,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Absent"))]
    Absent,
    /// Arrived late. Counts as attended.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Late"))]
    Late,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Excused"))]
    Excused,
}

impl AttendanceStatus {
    /// Returns true if the student is counted as having attended.
    pub fn counts_as_attended(&self) -> bool {
        matches!(self, Self::Present | Self::Late)
    }
}
