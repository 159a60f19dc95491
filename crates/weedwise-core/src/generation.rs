//! Generation tokens for superseding async operations
//!
//! Every operation that may be overtaken by a newer one is issued a
//! [`Generation`] when it starts. When it completes, its effect is applied
//! only if no newer generation has been issued since. This needs no
//! cancellation primitive: stale completions are simply dropped.

use std::fmt::{self, Display, Formatter};

/// Ticket identifying one issued operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Numeric value
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl Display for Generation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic source of generations
///
/// Not synchronised: it lives inside state that is already behind a lock.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    latest: u64,
}

impl GenerationCounter {
    /// Create a counter with nothing issued
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { latest: 0 }
    }

    /// Start a new operation, superseding all earlier ones
    #[inline]
    pub fn issue(&mut self) -> Generation {
        self.latest += 1;
        Generation(self.latest)
    }

    /// Supersede all issued operations without starting a new one
    #[inline]
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    /// Check whether `generation` is still the latest
    #[inline]
    #[must_use]
    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.latest
    }

    /// Latest value handed out or invalidated
    #[inline]
    #[must_use]
    pub fn latest(&self) -> u64 {
        self.latest
    }
}
