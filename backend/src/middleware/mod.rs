//! Middleware for the Hospitality School Management Platform

pub mod auth;

pub use auth::{auth_middleware, CurrentUser};
