//! Request parameter extractors.

pub mod pagination;

pub use pagination::PaginationParams;
