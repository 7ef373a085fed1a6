//! The exact tier: backtracking without rematches.
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::CompetitorId;

use super::{History, Pair};

/// Pairs all `players` without a single rematch, preferring adjacent positions.
///
/// Position `i` is paired with the earliest unpaired position `j > i` that has not met `i`
/// before. On a dead end the search unwinds and tries the next `j`. Returns `None` if no such
/// pairing exists, if `players` has an odd length or if more than `budget` candidate pairs were
/// tried.
pub fn exact(players: &[CompetitorId], history: &History, budget: usize) -> Option<Vec<Pair>> {
    if players.len() % 2 != 0 {
        return None;
    }

    let mut search = Search {
        players,
        history,
        paired: vec![false; players.len()],
        pairs: Vec::with_capacity(players.len() / 2),
        steps: 0,
        budget,
    };

    if search.run() {
        Some(search.pairs)
    } else {
        None
    }
}

struct Search<'a> {
    players: &'a [CompetitorId],
    history: &'a History,
    paired: Vec<bool>,
    pairs: Vec<Pair>,
    steps: usize,
    budget: usize,
}

impl<'a> Search<'a> {
    fn run(&mut self) -> bool {
        let Some(i) = self.paired.iter().position(|p| !p) else {
            return true;
        };

        self.paired[i] = true;

        for j in i + 1..self.players.len() {
            if self.paired[j] || self.history.has_met(self.players[i], self.players[j]) {
                continue;
            }

            self.steps += 1;
            if self.steps > self.budget {
                break;
            }

            self.paired[j] = true;
            self.pairs.push((self.players[i], self.players[j]));

            if self.run() {
                return true;
            }

            self.pairs.pop();
            self.paired[j] = false;
        }

        self.paired[i] = false;
        false
    }
}

/// Returns the fixed re-orderings tried when the ranked order has no exact pairing:
/// the last two swapped, the middle two swapped, even positions followed by odd positions and a
/// shuffle seeded from the length of `players` and `salt`.
pub fn reorderings(players: &[CompetitorId], salt: u64) -> Vec<Vec<CompetitorId>> {
    let len = players.len();
    let mut orders = Vec::with_capacity(4);

    if len >= 2 {
        let mut order = players.to_vec();
        order.swap(len - 2, len - 1);
        orders.push(order);
    }

    if len >= 4 {
        let mut order = players.to_vec();
        order.swap(len / 2 - 1, len / 2);
        orders.push(order);
    }

    if len >= 3 {
        let order = players
            .iter()
            .step_by(2)
            .chain(players.iter().skip(1).step_by(2))
            .copied()
            .collect();
        orders.push(order);
    }

    orders.push(shuffled(players, len as u64 ^ salt));
    orders
}

/// Returns a copy of `players` shuffled with an rng seeded from `seed`.
pub fn shuffled(players: &[CompetitorId], seed: u64) -> Vec<CompetitorId> {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut order = players.to_vec();
    order.shuffle(&mut rng);
    order
}
