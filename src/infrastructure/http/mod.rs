//! HTTP access to the tracking backend

mod client;

pub use client::{HttpClient, RequestSpec};
