//! AUX session lifecycle tracking.

pub mod service;

pub use service::AuxTrackerService;
