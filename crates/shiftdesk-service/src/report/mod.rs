//! Productivity reporting.

pub mod productivity;

pub use productivity::{ProductivityReport, ProductivityService, StatusBreakdown, aggregate};
