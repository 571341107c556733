//! Interfaces layer - what a front end drives

pub mod console;
