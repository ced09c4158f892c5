pub mod attendance;
pub mod class;
pub mod class_student;
pub mod lesson;
pub mod paper;
pub mod payment;
pub mod teacher_profile;
pub mod user;
pub mod video;
