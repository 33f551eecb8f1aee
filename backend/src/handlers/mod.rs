//! HTTP request handlers for the Hospitality School Management Platform

pub mod auth;
pub mod health;
pub mod ingredient;
pub mod recipe;
pub mod report;
pub mod school_class;
pub mod student;
pub mod supplier;
pub mod user;

pub use auth::*;
pub use health::*;
pub use ingredient::*;
pub use recipe::*;
pub use report::*;
pub use school_class::*;
pub use student::*;
pub use supplier::*;
pub use user::*;
