// Copyright (c) 2025 - Cowboy AI, Inc.
//! Monotonic ULID factory.
//!
//! Identifier generation is an explicitly constructed, injectable component
//! rather than ambient global state. A single `IdGenerator` shared (via
//! `Arc`) across the process guarantees that ids produced within the same
//! millisecond still order strictly.

use std::sync::{Mutex, PoisonError};

use ulid::Ulid;

/// Thread-safe, strictly monotonic ULID generator.
pub struct IdGenerator {
    inner: Mutex<ulid::Generator>,
}

impl std::fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdGenerator").finish_non_exhaustive()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    /// Create a new generator.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ulid::Generator::new()),
        }
    }

    /// Produce the next ULID, strictly greater than all previous ones
    /// from this generator.
    pub fn generate(&self) -> Ulid {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // The random component can only overflow when more than 2^80 ids
        // are drawn within one millisecond; fall back to fresh randomness.
        inner.generate().unwrap_or_else(|_| Ulid::new())
    }
}
