//! Tauri command handlers, grouped by surface.

pub mod brands;
pub mod config;
pub mod pricing;
