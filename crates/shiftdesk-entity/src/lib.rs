//! # shiftdesk-entity
//!
//! Domain entity models for ShiftDesk: the AUX work-status session and
//! its status enumeration.

pub mod aux_session;

pub use aux_session::{AuxSession, AuxStatus, CreateAuxSession};
