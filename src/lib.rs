//! linkfolio: folder hierarchy engine for organizing bookmarked links.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod database;
pub mod logging;
pub mod managers;
pub mod persistence;
pub mod platform;
pub mod services;
pub mod types;
