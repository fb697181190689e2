//! Type-safe wrapper for expression variables.
//!
//! Variables are 1-indexed, matching the row labels `v_1..v_n` of an
//! assignment table. The 0-based position inside a row is available through
//! [`Var::index`].
use std::fmt;

/// A variable identifier (1-indexed).
///
/// # Invariants
///
/// - Variable IDs must be >= 1
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(u32);

impl Var {
    /// Creates a new variable with the given subscript.
    ///
    /// # Panics
    ///
    /// Panics if `id == 0`. Variables must be 1-indexed.
    pub fn new(id: u32) -> Self {
        assert_ne!(id, 0, "Variable IDs must be >= 1");
        Var(id)
    }

    /// Returns the subscript of the variable.
    pub fn id(self) -> u32 {
        self.0
    }

    /// Returns the 0-based position of the variable inside a row of values.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v_{}", self.0)
    }
}
