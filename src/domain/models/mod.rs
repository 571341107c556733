pub mod auth;
pub mod company;
pub mod monitoring_setting;
pub mod resource;
pub mod task;
pub mod user;
