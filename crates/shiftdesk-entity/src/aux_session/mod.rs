//! AUX session entity: model and status enumeration.

pub mod model;
pub mod status;

pub use model::{AuxSession, CreateAuxSession};
pub use status::AuxStatus;
