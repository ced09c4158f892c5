pub mod hash;
pub mod jwt;
pub mod ownership;
pub mod stats;
pub mod upload;
