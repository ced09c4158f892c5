pub mod attendance;
pub mod auth;
pub mod class;
pub mod material;
pub mod payment;
pub mod profile;
pub mod shared;
pub mod stats;
pub mod video;
