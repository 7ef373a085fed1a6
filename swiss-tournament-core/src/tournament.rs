use std::collections::{BTreeSet, HashSet};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::{CompetitorId, MatchId, Result, TournamentId, ValidationError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single competitor of a [`Tournament`]. The name is only used for display purposes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
}

impl Competitor {
    #[inline]
    pub fn new<S>(name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            id: CompetitorId::generate(),
            name: name.into(),
        }
    }
}

/// The recorded result of a [`Match`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Outcome {
    #[default]
    Pending,
    #[cfg_attr(feature = "serde", serde(alias = "A"))]
    AWins,
    #[cfg_attr(feature = "serde", serde(alias = "B"))]
    BWins,
    Tie,
    Bye,
}

impl Outcome {
    /// Returns `true` if the `Outcome` is a head-to-head result, i.e. [`AWins`], [`BWins`] or
    /// [`Tie`].
    ///
    /// [`AWins`]: Self::AWins
    /// [`BWins`]: Self::BWins
    /// [`Tie`]: Self::Tie
    #[inline]
    pub fn is_result(self) -> bool {
        matches!(self, Self::AWins | Self::BWins | Self::Tie)
    }

    #[inline]
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::AWins => "A_WINS",
            Self::BWins => "B_WINS",
            Self::Tie => "TIE",
            Self::Bye => "BYE",
        }
    }
}

impl Display for Outcome {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "A" | "A_WINS" => Ok(Self::AWins),
            "B" | "B_WINS" => Ok(Self::BWins),
            "TIE" => Ok(Self::Tie),
            "BYE" => Ok(Self::Bye),
            _ => Err(ValidationError::InvalidOutcome(s.to_owned())),
        }
    }
}

/// A single pairing within a [`Round`].
///
/// A `Match` without a second competitor is a bye. The outcome of a bye is always
/// [`Outcome::Bye`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Match {
    pub id: MatchId,
    /// The 1-based table number within the round.
    pub table: u32,
    pub competitor_a: CompetitorId,
    pub competitor_b: Option<CompetitorId>,
    pub outcome: Outcome,
}

impl Match {
    /// Creates a new pending match between `a` and `b`.
    pub fn new(table: u32, a: CompetitorId, b: CompetitorId) -> Self {
        Self {
            id: MatchId::generate(),
            table,
            competitor_a: a,
            competitor_b: Some(b),
            outcome: Outcome::Pending,
        }
    }

    /// Creates a new bye for `a`.
    pub fn bye(table: u32, a: CompetitorId) -> Self {
        Self {
            id: MatchId::generate(),
            table,
            competitor_a: a,
            competitor_b: None,
            outcome: Outcome::Bye,
        }
    }

    #[inline]
    pub fn is_bye(&self) -> bool {
        self.competitor_b.is_none()
    }

    /// Returns `true` if `id` plays in this match.
    #[inline]
    pub fn contains(&self, id: CompetitorId) -> bool {
        self.competitor_a == id || self.competitor_b == Some(id)
    }

    /// Returns both competitors ordered by id, or `None` for a bye.
    #[inline]
    pub fn pair(&self) -> Option<(CompetitorId, CompetitorId)> {
        self.competitor_b.map(|b| ordered(self.competitor_a, b))
    }

    /// Returns an iterator over all competitors in this match.
    pub fn competitors(&self) -> impl Iterator<Item = CompetitorId> {
        std::iter::once(self.competitor_a).chain(self.competitor_b)
    }
}

/// Orders two competitors so that the same pair always produces the same tuple.
#[inline]
pub(crate) fn ordered(a: CompetitorId, b: CompetitorId) -> (CompetitorId, CompetitorId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Round {
    /// The 1-based round number.
    pub number: u32,
    pub matches: Vec<Match>,
}

impl Round {
    #[inline]
    pub fn new(number: u32, matches: Vec<Match>) -> Self {
        Self { number, matches }
    }

    /// Returns `true` if any match of the round still awaits a result.
    #[inline]
    pub fn has_pending(&self) -> bool {
        self.matches.iter().any(|m| m.outcome.is_pending())
    }

    /// Returns `true` if a head-to-head result was recorded for any match of the round.
    #[inline]
    pub fn has_results(&self) -> bool {
        self.matches.iter().any(|m| m.outcome.is_result())
    }

    #[inline]
    pub fn get(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Returns the bye match of the round, if there is one.
    pub fn bye(&self) -> Option<&Match> {
        self.matches.iter().find(|m| m.is_bye())
    }
}

/// The state of the latest round of a [`Tournament`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RoundState {
    /// No round was paired yet.
    NoActiveRound,
    /// The latest round has at least one pending match.
    RoundActive,
    /// All matches of the latest round have an outcome.
    RoundComplete,
}

/// The tournament document.
///
/// The round log in `rounds` is the only source of truth for results. Everything else
/// (standings, brackets, the bye history) is derived from it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub total_rounds: u32,
    pub competitors: Vec<Competitor>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rounds: Vec<Round>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bye_history: BTreeSet<CompetitorId>,
}

impl Tournament {
    /// Creates a new `Tournament` with a competitor for every non-blank name in `names`.
    ///
    /// A blank `name` falls back to `"Tournament"`.
    ///
    /// # Errors
    ///
    /// Returns an error if `total_rounds` is zero or `names` contains no non-blank names.
    pub fn create<S, I>(name: &str, total_rounds: u32, names: I) -> Result<Self>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        if total_rounds == 0 {
            return Err(ValidationError::ZeroRounds.into());
        }

        let competitors: Vec<_> = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_owned())
            .filter(|name| !name.is_empty())
            .map(Competitor::new)
            .collect();

        if competitors.is_empty() {
            return Err(ValidationError::EmptyRoster.into());
        }

        let name = match name.trim() {
            "" => "Tournament",
            name => name,
        };

        log::info!(
            "Creating tournament {:?} with {} competitors over {} rounds",
            name,
            competitors.len(),
            total_rounds
        );

        Ok(Self {
            id: TournamentId::generate(),
            name: name.to_owned(),
            total_rounds,
            competitors,
            rounds: Vec::new(),
            bye_history: BTreeSet::new(),
        })
    }

    /// Returns the number of the latest round, or `0` if no round was paired yet.
    #[inline]
    pub fn current_round_number(&self) -> u32 {
        self.rounds.iter().map(|r| r.number).max().unwrap_or(0)
    }

    #[inline]
    pub fn latest_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    #[inline]
    pub fn latest_round_mut(&mut self) -> Option<&mut Round> {
        self.rounds.last_mut()
    }

    /// Returns the latest round if it still has pending matches.
    pub fn active_round(&self) -> Option<&Round> {
        self.latest_round().filter(|round| round.has_pending())
    }

    pub fn state(&self) -> RoundState {
        match self.latest_round() {
            None => RoundState::NoActiveRound,
            Some(round) if round.has_pending() => RoundState::RoundActive,
            Some(_) => RoundState::RoundComplete,
        }
    }

    /// Returns `true` if all rounds were paired and no round is active anymore.
    pub fn is_complete(&self) -> bool {
        self.current_round_number() >= self.total_rounds && self.active_round().is_none()
    }

    #[inline]
    pub fn competitor(&self, id: CompetitorId) -> Option<&Competitor> {
        self.competitors.iter().find(|c| c.id == id)
    }

    #[inline]
    pub fn contains(&self, id: CompetitorId) -> bool {
        self.competitor(id).is_some()
    }

    /// Returns the display name of `id`, or `"???"` for an unknown competitor.
    pub fn name_of(&self, id: CompetitorId) -> &str {
        self.competitor(id).map(|c| c.name.as_str()).unwrap_or("???")
    }

    /// Returns every pair of competitors that already met in any round, ordered by id.
    pub fn prior_pairs(&self) -> HashSet<(CompetitorId, CompetitorId)> {
        self.rounds
            .iter()
            .flat_map(|round| round.matches.iter())
            .filter_map(Match::pair)
            .collect()
    }

    /// Returns the position of the match with the given `id` as `(round, match)` indices.
    pub fn find_match(&self, id: MatchId) -> Option<(usize, usize)> {
        self.rounds.iter().enumerate().find_map(|(round_index, round)| {
            round
                .matches
                .iter()
                .position(|m| m.id == id)
                .map(|match_index| (round_index, match_index))
        })
    }

    /// Rebuilds `bye_history` from the round log.
    pub(crate) fn refresh_bye_history(&mut self) {
        self.bye_history = self
            .rounds
            .iter()
            .flat_map(|round| round.matches.iter())
            .filter(|m| m.is_bye())
            .map(|m| m.competitor_a)
            .collect();
    }
}
