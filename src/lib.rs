pub mod cache;
pub mod classify;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod platform;
pub mod project;
pub mod service;
pub mod task;
pub mod tui;
