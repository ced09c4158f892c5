pub mod attendance;
pub mod auth;
pub mod class;
pub mod health;
pub mod lesson;
pub mod material;
pub mod paper;
pub mod payment;
pub mod profile;
pub mod stats;
pub mod video;
