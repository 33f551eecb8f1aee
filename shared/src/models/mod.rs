//! Domain models for the Hospitality School Management Platform

mod ingredient;
mod recipe;
mod report;
mod school_class;
mod student;
mod supplier;
mod user;

pub use ingredient::*;
pub use recipe::*;
pub use report::*;
pub use school_class::*;
pub use student::*;
pub use supplier::*;
pub use user::*;
