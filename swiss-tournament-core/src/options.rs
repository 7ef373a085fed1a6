#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunables of the [`Solver`].
///
/// [`Solver`]: crate::solver::Solver
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PairingOptions {
    /// Maximum number of candidate pairs a single backtracking search may try before giving up.
    pub backtrack_budget: usize,
    /// Number of shuffled orderings the global repair tries after the ranked ordering failed.
    pub repair_attempts: usize,
    /// Salt mixed into every shuffle seed. The seed is otherwise derived from the size of the
    /// shuffled set, so the same input always produces the same pairing.
    pub seed: u64,
}

impl Default for PairingOptions {
    fn default() -> Self {
        Self {
            backtrack_budget: 100_000,
            repair_attempts: 8,
            seed: 0x5EED,
        }
    }
}
