//! Repository implementations.

pub mod aux_session;

pub use aux_session::AuxSessionRepository;
