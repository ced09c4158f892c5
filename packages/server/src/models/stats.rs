use chrono::{DateTime, Utc};
use serde::Serialize;

/// Revenue received in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct MonthlyRevenuePoint {
    #[schema(example = "Nov 25")]
    pub label: String,
    #[schema(example = 1500.0)]
    pub revenue: f64,
}

/// Attendance rate over one calendar month of class dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct MonthlyAttendancePoint {
    #[schema(example = "Nov 25")]
    pub label: String,
    #[schema(example = 75)]
    pub percentage: u8,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TeacherStatsResponse {
    pub active_classes: u64,
    /// Distinct students across all of the teacher's classes.
    pub total_students: u64,
    pub total_revenue: f64,
    /// Last six months, oldest first. Months without payments are omitted.
    pub monthly_revenue: Vec<MonthlyRevenuePoint>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct StudentStatsResponse {
    /// Date of the most recent payment, if any.
    pub last_fee_paid: Option<DateTime<Utc>>,
    /// 100 when no attendance has been recorded yet.
    #[schema(example = 75)]
    pub attendance_percentage: u8,
    pub enrolled_classes_count: u64,
    /// Last six months, oldest first. Months without records are omitted.
    pub monthly_attendance: Vec<MonthlyAttendancePoint>,
}
