mod common;

mod auth;
mod material;
mod payment;
mod profile;
mod stats;
