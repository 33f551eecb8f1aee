//! Business logic services for the Hospitality School Management Platform

pub mod auth;
pub mod ingredient;
pub mod recipe;
pub mod report;
pub mod school_class;
pub mod student;
pub mod supplier;
pub mod user;

pub use auth::AuthService;
pub use ingredient::IngredientService;
pub use recipe::RecipeService;
pub use report::ReportService;
pub use school_class::ClassService;
pub use student::StudentService;
pub use supplier::SupplierService;
pub use user::UserService;
