//! # shiftdesk-core
//!
//! Core crate for ShiftDesk. Contains configuration schemas, typed
//! identifiers, the time-window type, the injectable clock, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other ShiftDesk crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
