//! Shared domain logic for the Hospitality School Management Platform
//!
//! This crate contains the unit-conversion and costing engine plus the types
//! shared between the backend, the dashboard frontend (via WASM), and other
//! components of the system.

pub mod costing;
pub mod forms;
pub mod models;
pub mod session;
pub mod types;
pub mod units;
pub mod validation;

pub use costing::*;
pub use forms::*;
pub use models::*;
pub use session::*;
pub use types::*;
pub use units::*;
pub use validation::*;
