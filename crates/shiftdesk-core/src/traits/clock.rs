//! Injectable time source.
//!
//! Every timestamp the tracker records flows through [`Clock`], so tests
//! can pin time exactly. Repositories never read the wall clock or use
//! `NOW()` in SQL.

use chrono::{DateTime, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync + 'static {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
