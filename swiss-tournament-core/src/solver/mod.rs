//! The bracket pairing solver.
//!
//! Every bracket is paired on its own, from the highest to the lowest points. The solver tries
//! a fixed pipeline of strategies, each one either producing a pairing or reporting that it
//! found none:
//!
//! 1. Exact backtracking without rematches on the ranked order of the bracket.
//! 2. The same on a few fixed re-orderings.
//! 3. Borrowing the best competitor of the next bracket.
//! 4. A greedy pass which accepts rematches.
//!
//! The assembled round is then validated as a whole. A round with problems is repaired with a
//! backtracking search over the whole pool and, if that fails too, sanitized so that it is
//! always a valid matching.
mod backtrack;
mod greedy;
mod validate;

pub use backtrack::{exact, reorderings};
pub use greedy::{greedy, sanitize};
pub use validate::{repair, validate, Violation};

use std::collections::{HashSet, VecDeque};

use crate::brackets::Bracket;
use crate::tournament::ordered;
use crate::{CompetitorId, Match, PairingOptions, Tournament};

use greedy::dedup;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Two paired competitors.
pub type Pair = (CompetitorId, CompetitorId);

/// The set of pairs that already met in previous rounds.
#[derive(Clone, Debug, Default)]
pub struct History {
    pairs: HashSet<Pair>,
}

impl History {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects all pairs of every round of `tournament`.
    #[inline]
    pub fn from_tournament(tournament: &Tournament) -> Self {
        Self {
            pairs: tournament.prior_pairs(),
        }
    }

    #[inline]
    pub fn insert(&mut self, a: CompetitorId, b: CompetitorId) {
        self.pairs.insert(ordered(a, b));
    }

    /// Returns `true` if `a` and `b` already played each other.
    #[inline]
    pub fn has_met(&self, a: CompetitorId, b: CompetitorId) -> bool {
        self.pairs.contains(&ordered(a, b))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<Pair> for History {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Pair>,
    {
        let mut this = Self::new();
        for (a, b) in iter {
            this.insert(a, b);
        }

        this
    }
}

/// The strategy that produced the final pairing of a round.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Strategy {
    /// A random draw, used for the opening round.
    Shuffled,
    /// The bracket pipeline produced a valid round.
    Brackets,
    /// The bracket pipeline failed and the global repair found a round without rematches.
    Repaired,
    /// Conflicting pairs were dropped and re-paired. The round may contain avoidable rematches.
    Sanitized,
}

/// The pairing of a single round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pairing {
    pub pairs: Vec<Pair>,
    pub bye: Option<CompetitorId>,
    pub strategy: Strategy,
}

impl Pairing {
    /// Converts the pairing into matches, numbering the tables from `first_table`. The bye is
    /// always the last match.
    pub fn into_matches(self, first_table: u32) -> Vec<Match> {
        let mut matches: Vec<_> = self
            .pairs
            .into_iter()
            .zip(first_table..)
            .map(|((a, b), table)| Match::new(table, a, b))
            .collect();

        if let Some(bye) = self.bye {
            let table = first_table + matches.len() as u32;
            matches.push(Match::bye(table, bye));
        }

        matches
    }
}

#[derive(Clone, Debug)]
pub struct Solver<'a> {
    history: &'a History,
    options: &'a PairingOptions,
}

impl<'a> Solver<'a> {
    #[inline]
    pub fn new(history: &'a History, options: &'a PairingOptions) -> Self {
        Self { history, options }
    }

    /// Pairs all members of `brackets`. `bye` is only passed through to the resulting
    /// [`Pairing`] and must not be a member of any bracket.
    pub fn solve(&self, brackets: Vec<Bracket>, bye: Option<CompetitorId>) -> Pairing {
        let pool: Vec<_> = dedup(
            &brackets
                .iter()
                .flat_map(|b| b.members.iter().copied())
                .filter(|id| Some(*id) != bye)
                .collect::<Vec<_>>(),
        );

        let pairs = self.pair_brackets(brackets, bye);
        let violations = validate(&pairs, &pool, self.history);

        if violations.is_empty() {
            return Pairing {
                pairs,
                bye,
                strategy: Strategy::Brackets,
            };
        }

        log::debug!(
            "Bracket pairing has {} violations ({}), trying global repair",
            violations.len(),
            violations[0]
        );

        if let Some(pairs) = repair(&pool, self.history, self.options) {
            return Pairing {
                pairs,
                bye,
                strategy: Strategy::Repaired,
            };
        }

        if violations.iter().any(Violation::is_structural) {
            log::warn!(
                "Global repair failed for {} competitors, sanitizing the round",
                pool.len()
            );

            return Pairing {
                pairs: sanitize(pairs, &pool, self.history),
                bye,
                strategy: Strategy::Sanitized,
            };
        }

        log::info!("Accepting {} unavoidable rematches", violations.len());

        Pairing {
            pairs,
            bye,
            strategy: Strategy::Brackets,
        }
    }

    /// Pairs every bracket from top to bottom, floating odd members down.
    fn pair_brackets(&self, brackets: Vec<Bracket>, bye: Option<CompetitorId>) -> Vec<Pair> {
        let mut queue: VecDeque<Vec<CompetitorId>> = brackets
            .into_iter()
            .map(|b| b.members.into_iter().filter(|id| Some(*id) != bye).collect())
            .collect();

        let mut pairs = Vec::new();
        let mut carry: Vec<CompetitorId> = Vec::new();

        while let Some(members) = queue.pop_front() {
            carry.extend(members);
            let mut working = dedup(&carry);
            carry.clear();

            let float = match working.len() % 2 {
                0 => None,
                _ => working.pop(),
            };

            if let Some(found) = self.pair_bracket(&working) {
                pairs.extend(found);
                carry.extend(float);
                continue;
            }

            if let Some((found, float)) = self.borrow(&working, float, queue.front_mut()) {
                pairs.extend(found);
                carry.extend(float);
                continue;
            }

            log::debug!(
                "No exact pairing for a bracket of {}, falling back to greedy",
                working.len()
            );

            let (found, residual) = greedy(&working, self.history);
            pairs.extend(found);
            carry.extend(float);
            carry.extend(residual);
        }

        if !carry.is_empty() {
            let (found, residual) = greedy(&carry, self.history);
            pairs.extend(found);

            if !residual.is_empty() {
                log::warn!("{} competitors left after the last bracket", residual.len());
            }
        }

        pairs
    }

    /// Pairs a single working set exactly, first in ranked order, then in every re-ordering.
    fn pair_bracket(&self, working: &[CompetitorId]) -> Option<Vec<Pair>> {
        let budget = self.options.backtrack_budget;

        if let Some(pairs) = exact(working, self.history, budget) {
            return Some(pairs);
        }

        reorderings(working, self.options.seed)
            .into_iter()
            .find_map(|order| exact(&order, self.history, budget))
    }

    /// Retries the working set with the first member of the `next` bracket added. On success the
    /// borrowed member is removed from `next`. Returns the pairs and the member to float down.
    fn borrow(
        &self,
        working: &[CompetitorId],
        float: Option<CompetitorId>,
        next: Option<&mut Vec<CompetitorId>>,
    ) -> Option<(Vec<Pair>, Option<CompetitorId>)> {
        let next = next?;
        let borrowed = *next.first()?;

        let mut trial = working.to_vec();
        trial.extend(float);

        // The borrowed member is never floated back down.
        let float = match trial.len() % 2 {
            0 => trial.pop(),
            _ => None,
        };
        trial.push(borrowed);

        let pairs = self.pair_bracket(&trial)?;

        log::debug!("Borrowed {} from the next bracket", borrowed);
        next.remove(0);

        Some((pairs, float))
    }
}
