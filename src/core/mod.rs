//! Configuration and domain types shared by all three handlers.

pub mod config;
pub mod decimal;
pub mod models;
