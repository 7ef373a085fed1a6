use std::fmt::{self, Display, Formatter};
use std::iter::FusedIterator;
use std::str::FromStr;

use thiserror::Error;

use crate::graph::MatchGraph;
use crate::{CompetitorId, Tournament};

/// The composite tie-break key of a competitor.
///
/// Encodes the points, the opponents' win percentage, the opponents' opponents' win percentage
/// and the loss penalty as a single decimal number where every component except the points is
/// exactly three digits wide. A higher key is a better standing.
///
/// The ordering of `Key` is the same as the ordering of its numeric [`value`].
///
/// [`value`]: Self::value
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key {
    pub points: u32,
    pub opp_win: u16,
    pub opp_opp_win: u16,
    pub loss_penalty: u16,
}

impl Key {
    /// Creates a new `Key`. All components except `points` are clamped to `0..=999`.
    pub fn new(points: u32, opp_win: f64, opp_opp_win: f64, loss_penalty: u32) -> Self {
        Self {
            points,
            opp_win: permille(opp_win),
            opp_opp_win: permille(opp_opp_win),
            loss_penalty: loss_penalty.min(999) as u16,
        }
    }

    /// Returns the key as a single integer.
    pub fn value(&self) -> u64 {
        u64::from(self.points) * 1_000_000_000
            + u64::from(self.opp_win) * 1_000_000
            + u64::from(self.opp_opp_win) * 1_000
            + u64::from(self.loss_penalty)
    }

    /// Splits an integer produced by [`value`] back into a `Key`.
    ///
    /// Returns `None` if the points do not fit into a `u32`.
    ///
    /// [`value`]: Self::value
    pub fn from_value(value: u64) -> Option<Self> {
        Some(Self {
            points: u32::try_from(value / 1_000_000_000).ok()?,
            opp_win: (value / 1_000_000 % 1000) as u16,
            opp_opp_win: (value / 1_000 % 1000) as u16,
            loss_penalty: (value % 1000) as u16,
        })
    }
}

/// Scales a fraction to thousandths, rounding half away from zero, clamped to `0..=999`.
fn permille(fraction: f64) -> u16 {
    (fraction * 1000.0).round().clamp(0.0, 999.0) as u16
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:03}{:03}{:03}",
            self.points, self.opp_win, self.opp_opp_win, self.loss_penalty
        )
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseKeyError {
    #[error("key must have at least 10 digits, found {0}")]
    TooShort(usize),
    #[error("key contains a non-digit character")]
    InvalidDigit,
    #[error("points out of range")]
    Overflow,
}

impl FromStr for Key {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseKeyError::InvalidDigit);
        }

        if s.len() < 10 {
            return Err(ParseKeyError::TooShort(s.len()));
        }

        let (points, rest) = s.split_at(s.len() - 9);
        let group = |i: usize| rest[i * 3..i * 3 + 3].parse::<u16>();

        Ok(Self {
            points: points.parse().map_err(|_| ParseKeyError::Overflow)?,
            opp_win: group(0).map_err(|_| ParseKeyError::InvalidDigit)?,
            opp_opp_win: group(1).map_err(|_| ParseKeyError::InvalidDigit)?,
            loss_penalty: group(2).map_err(|_| ParseKeyError::InvalidDigit)?,
        })
    }
}

/// A single row of the [`Standings`].
#[derive(Clone, Debug, PartialEq)]
pub struct Standing {
    /// The 1-based rank.
    pub rank: usize,
    pub competitor: CompetitorId,
    pub name: String,
    pub points: u32,
    /// Match win percentage, rounded to one decimal.
    pub match_win: f64,
    /// Opponents' match win percentage, rounded to one decimal.
    pub opp_win: f64,
    /// Opponents' opponents' win percentage, rounded to one decimal.
    pub opp_opp_win: f64,
    pub loss_penalty: u32,
    pub byes: usize,
    pub key: Key,
}

impl Standing {
    /// Returns the loss penalty zero-padded to three digits.
    #[inline]
    pub fn loss_penalty_padded(&self) -> String {
        format!("{:03}", self.loss_penalty)
    }
}

/// The ranked standings of a tournament.
#[derive(Clone, Debug, Default)]
pub struct Standings {
    entries: Vec<Standing>,
}

impl Standings {
    /// Computes the standings of `tournament` from its round log.
    pub fn compute(tournament: &Tournament) -> Self {
        Self::from_graph(tournament, &MatchGraph::build(tournament))
    }

    /// Computes the standings of `tournament` using an already built `graph`.
    pub fn from_graph(tournament: &Tournament, graph: &MatchGraph) -> Self {
        let mut entries: Vec<_> = tournament
            .competitors
            .iter()
            .map(|competitor| {
                let record = graph.get(competitor.id).cloned().unwrap_or_default();

                let match_win = record.match_win_pct();
                let opp_win = graph.opp_win_pct(competitor.id);
                let opp_opp_win = graph.opp_opp_win_pct(competitor.id);
                let loss_penalty = record.loss_penalty();
                let points = record.points();

                Standing {
                    rank: 0,
                    competitor: competitor.id,
                    name: competitor.name.clone(),
                    points,
                    match_win: percent(match_win),
                    opp_win: percent(opp_win),
                    opp_opp_win: percent(opp_opp_win),
                    loss_penalty,
                    byes: record.byes(),
                    key: Key::new(points, opp_win, opp_opp_win, loss_penalty),
                }
            })
            .collect();

        // Stable: equal keys keep the roster order.
        entries.sort_by(|a, b| b.key.cmp(&a.key));

        for (index, entry) in entries.iter_mut().enumerate() {
            entry.rank = index + 1;
        }

        Self { entries }
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self,
            next: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the row of the competitor with the given `id`.
    pub fn get(&self, id: CompetitorId) -> Option<&Standing> {
        self.entries.iter().find(|e| e.competitor == id)
    }

    /// Returns the competitor ids in rank order.
    pub fn ranked_ids(&self) -> Vec<CompetitorId> {
        self.entries.iter().map(|e| e.competitor).collect()
    }
}

impl<'a> IntoIterator for &'a Standings {
    type Item = &'a Standing;
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Rounds a fraction to a percentage with one decimal.
fn percent(fraction: f64) -> f64 {
    (fraction * 1000.0).round() / 10.0
}

#[derive(Clone, Debug)]
pub struct Iter<'a> {
    inner: &'a Standings,
    next: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Standing;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.entries.get(self.next)?;
        self.next += 1;
        Some(entry)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }
}

impl<'a> ExactSizeIterator for Iter<'a> {
    #[inline]
    fn len(&self) -> usize {
        self.inner.entries.len() - self.next
    }
}

impl<'a> FusedIterator for Iter<'a> {}

impl Tournament {
    /// Computes the current [`Standings`].
    #[inline]
    pub fn standings(&self) -> Standings {
        Standings::compute(self)
    }
}
