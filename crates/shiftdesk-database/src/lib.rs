//! # shiftdesk-database
//!
//! PostgreSQL connection management, embedded migrations, and the
//! durable AUX session repository.

pub mod connection;
pub mod migration;
pub mod repositories;
