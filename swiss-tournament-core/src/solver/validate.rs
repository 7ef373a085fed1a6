//! Whole-round validation and the global repair tier.
use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};

use crate::{CompetitorId, PairingOptions};

use super::backtrack::{exact, shuffled};
use super::{History, Pair};

/// A problem found in a paired round.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Violation {
    SelfPair(CompetitorId),
    /// The competitor appears in more than one pair.
    Duplicate(CompetitorId),
    /// The competitor is not part of the pool that was paired.
    Unexpected(CompetitorId),
    /// The competitor of the pool was left without a partner.
    Unpaired(CompetitorId),
    Rematch(CompetitorId, CompetitorId),
}

impl Violation {
    /// Returns `true` if the round is not a valid matching at all. A [`Rematch`] is the only
    /// violation that still leaves a playable round.
    ///
    /// [`Rematch`]: Self::Rematch
    #[inline]
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::Rematch(_, _))
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfPair(id) => write!(f, "{} is paired with themselves", id),
            Self::Duplicate(id) => write!(f, "{} appears more than once", id),
            Self::Unexpected(id) => write!(f, "{} is not part of the pool", id),
            Self::Unpaired(id) => write!(f, "{} has no partner", id),
            Self::Rematch(a, b) => write!(f, "{} and {} already met", a, b),
        }
    }
}

/// Checks that `pairs` is a perfect matching of `pool` without rematches.
pub fn validate(pairs: &[Pair], pool: &[CompetitorId], history: &History) -> Vec<Violation> {
    let members: HashSet<_> = pool.iter().copied().collect();
    let mut seen = HashSet::with_capacity(pool.len());
    let mut violations = Vec::new();

    for (a, b) in pairs {
        if a == b {
            violations.push(Violation::SelfPair(*a));
            continue;
        }

        for id in [a, b] {
            if !members.contains(id) {
                violations.push(Violation::Unexpected(*id));
            }

            if !seen.insert(*id) {
                violations.push(Violation::Duplicate(*id));
            }
        }

        if history.has_met(*a, *b) {
            violations.push(Violation::Rematch(*a, *b));
        }
    }

    violations.extend(
        pool.iter()
            .filter(|id| !seen.contains(*id))
            .map(|id| Violation::Unpaired(*id)),
    );

    violations
}

/// Tries to pair the whole `pool` without rematches, ignoring brackets. The ranked order is
/// tried first, then `options.repair_attempts` deterministic shuffles.
pub fn repair(
    pool: &[CompetitorId],
    history: &History,
    options: &PairingOptions,
) -> Option<Vec<Pair>> {
    if let Some(pairs) = exact(pool, history, options.backtrack_budget) {
        return Some(pairs);
    }

    let base = (pool.len() as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ options.seed;

    (0..options.repair_attempts as u64).find_map(|attempt| {
        let order = shuffled(pool, base.wrapping_add(attempt));
        exact(&order, history, options.backtrack_budget)
    })
}
