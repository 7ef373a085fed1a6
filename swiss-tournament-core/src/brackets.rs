//! Point brackets and bye selection.
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};

use crate::{CompetitorId, Standing, Standings};

/// A group of competitors with the same number of points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bracket {
    pub points: u32,
    /// The members ordered from the best to the worst tie-break key.
    pub members: Vec<CompetitorId>,
}

impl Bracket {
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Groups the competitors in `pool` into brackets by points, from the highest to the lowest
/// points. Within a bracket competitors are ordered by descending key, then by name.
///
/// Competitors without a row in `standings` are ignored.
pub fn build(standings: &Standings, pool: &[CompetitorId]) -> Vec<Bracket> {
    let mut groups: BTreeMap<Reverse<u32>, Vec<&Standing>> = BTreeMap::new();

    for id in pool {
        match standings.get(*id) {
            Some(standing) => groups
                .entry(Reverse(standing.points))
                .or_default()
                .push(standing),
            None => log::warn!("Competitor {} has no standing, skipping", id),
        }
    }

    groups
        .into_iter()
        .map(|(Reverse(points), mut members)| {
            members.sort_by(|a, b| b.key.cmp(&a.key).then_with(|| a.name.cmp(&b.name)));

            Bracket {
                points,
                members: members.into_iter().map(|s| s.competitor).collect(),
            }
        })
        .collect()
}

/// Selects the bye recipient from `pool`. Returns `None` if `pool` has an even length.
///
/// The recipient is the competitor with the fewest points, then the fewest byes, then the
/// lowest key and finally the lowest name. Competitors in `excluded` are never selected.
pub fn select_bye(
    standings: &Standings,
    pool: &[CompetitorId],
    excluded: &HashSet<CompetitorId>,
) -> Option<CompetitorId> {
    if pool.len() % 2 == 0 {
        return None;
    }

    pool.iter()
        .filter(|id| !excluded.contains(id))
        .filter_map(|id| standings.get(*id))
        .min_by(|a, b| {
            a.points
                .cmp(&b.points)
                .then_with(|| a.byes.cmp(&b.byes))
                .then_with(|| a.key.cmp(&b.key))
                .then_with(|| a.name.cmp(&b.name))
        })
        .map(|s| s.competitor)
}
