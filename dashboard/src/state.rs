//! Selection state and the generation counter.
//!
//! Every selection bumps the generation. Async work captures the generation
//! it was started under and may only touch the UI while that generation is
//! still current.

use std::fmt;

/// Monotonic tag of one selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct SelectionState {
    current_horizon_id: String,
    generation: Generation,
}

impl SelectionState {
    pub fn new(default_horizon_id: impl Into<String>) -> Self {
        Self {
            current_horizon_id: default_horizon_id.into(),
            generation: Generation(0),
        }
    }

    pub fn current_horizon_id(&self) -> &str {
        &self.current_horizon_id
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Record a user selection and return its generation.
    pub fn select(&mut self, horizon_id: &str) -> Generation {
        self.current_horizon_id = horizon_id.to_string();
        self.generation = Generation(self.generation.0 + 1);
        self.generation
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }
}
