//! The greedy tier and the last-chance sanitizer.
use std::collections::HashSet;

use crate::CompetitorId;

use super::{History, Pair};

/// Pairs every competitor with the first available partner it has not met yet. A rematch is
/// only accepted if no other partner remains.
///
/// Returns the pairs and the competitors that could not be paired at all (at most one, unless
/// `players` contains duplicates).
pub fn greedy(players: &[CompetitorId], history: &History) -> (Vec<Pair>, Vec<CompetitorId>) {
    let mut unpaired = dedup(players);
    unpaired.reverse();

    let mut pairs = Vec::with_capacity(unpaired.len() / 2);
    let mut residual = Vec::new();

    // `unpaired` is reversed so that the best ranked competitor is at the end.
    while let Some(a) = unpaired.pop() {
        let partner = unpaired
            .iter()
            .rposition(|b| !history.has_met(a, *b))
            .or_else(|| unpaired.len().checked_sub(1));

        match partner {
            Some(index) => {
                let b = unpaired.remove(index);
                pairs.push((a, b));
            }
            None => residual.push(a),
        }
    }

    (pairs, residual)
}

/// Drops every pair that is a self-pair, contains a competitor outside of `pool` or a competitor
/// that was already paired, then pairs all remaining competitors of `pool` greedily.
///
/// The result never contains a self-pair or the same competitor twice, but may contain
/// rematches.
pub fn sanitize(pairs: Vec<Pair>, pool: &[CompetitorId], history: &History) -> Vec<Pair> {
    let members: HashSet<_> = pool.iter().copied().collect();
    let mut seen = HashSet::with_capacity(pool.len());

    let mut kept: Vec<Pair> = pairs
        .into_iter()
        .filter(|(a, b)| {
            let valid = a != b
                && members.contains(a)
                && members.contains(b)
                && !seen.contains(a)
                && !seen.contains(b);

            if valid {
                seen.insert(*a);
                seen.insert(*b);
            } else {
                log::debug!("Dropping conflicting pair {} v {}", a, b);
            }

            valid
        })
        .collect();

    let freed: Vec<_> = pool
        .iter()
        .copied()
        .filter(|id| !seen.contains(id))
        .collect();

    let (pairs, residual) = greedy(&freed, history);
    kept.extend(pairs);

    if !residual.is_empty() {
        log::warn!("{} competitors left without a partner", residual.len());
    }

    kept
}

/// Removes duplicate ids, keeping the first occurrence.
pub(crate) fn dedup(players: &[CompetitorId]) -> Vec<CompetitorId> {
    let mut seen = HashSet::with_capacity(players.len());
    players.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use crate::solver::History;
    use crate::CompetitorId;

    use super::{dedup, greedy, sanitize};

    fn ids(ids: &[u64]) -> Vec<CompetitorId> {
        ids.iter().copied().map(CompetitorId).collect()
    }

    fn pairs(pairs: &[(u64, u64)]) -> Vec<(CompetitorId, CompetitorId)> {
        pairs
            .iter()
            .map(|(a, b)| (CompetitorId(*a), CompetitorId(*b)))
            .collect()
    }

    #[test]
    fn test_greedy() {
        let history = History::from_iter(pairs(&[(1, 2)]));
        let (p, residual) = greedy(&ids(&[1, 2, 3, 4]), &history);
        assert_eq!(p, pairs(&[(1, 3), (2, 4)]));
        assert!(residual.is_empty());
    }

    #[test]
    fn test_greedy_accepts_rematch() {
        // Greedy does not look ahead: 1-3 leaves 2 and 4 who already met.
        let history = History::from_iter(pairs(&[(1, 2), (2, 4)]));
        let (p, residual) = greedy(&ids(&[1, 2, 3, 4]), &history);
        assert_eq!(p, pairs(&[(1, 3), (2, 4)]));
        assert!(residual.is_empty());
    }

    #[test]
    fn test_greedy_residual() {
        let (p, residual) = greedy(&ids(&[1, 2, 3, 3]), &History::new());
        assert_eq!(p, pairs(&[(1, 2)]));
        assert_eq!(residual, ids(&[3]));
    }

    #[test]
    fn test_sanitize() {
        let history = History::new();
        let input = pairs(&[(1, 1), (2, 3), (3, 4), (5, 9)]);
        let output = sanitize(input, &ids(&[1, 2, 3, 4, 5, 6]), &history);

        assert_eq!(output, pairs(&[(2, 3), (1, 4), (5, 6)]));
    }

    #[test]
    fn test_dedup() {
        assert_eq!(dedup(&ids(&[3, 1, 3, 2, 1])), ids(&[3, 1, 2]));
    }
}
