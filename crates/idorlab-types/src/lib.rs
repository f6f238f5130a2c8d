//! Shared types for IDOR Lab: domain models and API request/response shapes.

pub mod api;
pub mod models;
