//! Dashboard aggregation helpers.
//!
//! Handlers load the rows; everything here is pure so the counting rules can
//! be tested without a database.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use common::AttendanceStatus;

use crate::models::stats::{MonthlyAttendancePoint, MonthlyRevenuePoint};

/// Length of the trailing window used by the monthly charts.
pub const TRAILING_MONTHS: u32 = 6;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Chart label for a bucket, e.g. `(2025, 11)` -> `"Nov 25"`.
pub fn month_label(year: i32, month: u32) -> String {
    let name = MONTH_ABBREVIATIONS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("???");
    format!("{name} {:02}", year.rem_euclid(100))
}

/// Start of the trailing window ending at `now`.
pub fn window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(TRAILING_MONTHS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Number of distinct students across a teacher's enrollments.
pub fn distinct_students(student_ids: impl IntoIterator<Item = i32>) -> u64 {
    student_ids.into_iter().collect::<HashSet<_>>().len() as u64
}

/// Rounded share of attended records. No records counts as full attendance.
pub fn attendance_percentage(statuses: impl IntoIterator<Item = AttendanceStatus>) -> u8 {
    let (attended, total) = statuses
        .into_iter()
        .fold((0u64, 0u64), |(attended, total), status| {
            (attended + u64::from(status.counts_as_attended()), total + 1)
        });
    rounded_percentage(attended, total).unwrap_or(100)
}

fn rounded_percentage(part: u64, total: u64) -> Option<u8> {
    if total == 0 {
        return None;
    }
    Some(((part as f64 * 100.0) / total as f64).round() as u8)
}

/// Sum payment amounts per calendar month, oldest month first.
///
/// Months without payments are left out.
pub fn monthly_revenue(
    payments: impl IntoIterator<Item = (DateTime<Utc>, f64)>,
) -> Vec<MonthlyRevenuePoint> {
    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for (at, amount) in payments {
        *buckets.entry((at.year(), at.month())).or_default() += amount;
    }

    buckets
        .into_iter()
        .map(|((year, month), revenue)| MonthlyRevenuePoint {
            label: month_label(year, month),
            revenue,
        })
        .collect()
}

/// Attendance percentage per calendar month of the class date, oldest first.
///
/// Months without records are left out.
pub fn monthly_attendance(
    records: impl IntoIterator<Item = (NaiveDate, AttendanceStatus)>,
) -> Vec<MonthlyAttendancePoint> {
    let mut buckets: BTreeMap<(i32, u32), (u64, u64)> = BTreeMap::new();
    for (date, status) in records {
        let bucket = buckets.entry((date.year(), date.month())).or_default();
        bucket.0 += u64::from(status.counts_as_attended());
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .filter_map(|((year, month), (attended, total))| {
            rounded_percentage(attended, total).map(|percentage| MonthlyAttendancePoint {
                label: month_label(year, month),
                percentage,
            })
        })
        .collect()
}
