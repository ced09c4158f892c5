pub mod attendance_status;
pub mod role;
pub mod storage;

pub use attendance_status::AttendanceStatus;
pub use role::UserRole;
