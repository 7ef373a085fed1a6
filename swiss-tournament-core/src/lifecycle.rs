//! The round lifecycle: pairing, restarting, overriding and editing rounds.
//!
//! Every operation validates its input against the current [`RoundState`] before touching the
//! document. A failed operation leaves the [`Tournament`] unchanged.
use std::collections::HashSet;
use std::convert::Infallible;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::solver::{History, Pair, Pairing, Solver, Strategy};
use crate::{
    brackets, CompetitorId, Match, MatchId, Outcome, PairingOptions, Result, Round, RoundState,
    StateConflict, Standings, Tournament, ValidationError,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A reference to a competitor, either by id or by display name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CompetitorRef {
    Id(CompetitorId),
    Name(String),
}

impl From<CompetitorId> for CompetitorRef {
    #[inline]
    fn from(id: CompetitorId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for CompetitorRef {
    #[inline]
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl FromStr for CompetitorRef {
    type Err = Infallible;

    /// Parses a numeric string as an id, everything else as a name.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();

        Ok(match s.parse() {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Name(s.to_owned()),
        })
    }
}

/// A newly paired round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PairedRound {
    pub number: u32,
    pub matches: Vec<Match>,
    pub strategy: Strategy,
}

/// A single row of a manually edited round. A row without a second competitor is a bye.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PairingEdit {
    pub competitor_a: CompetitorId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub competitor_b: Option<CompetitorId>,
}

impl PairingEdit {
    #[inline]
    pub fn new(a: CompetitorId, b: Option<CompetitorId>) -> Self {
        Self {
            competitor_a: a,
            competitor_b: b,
        }
    }
}

/// A submitted result for a match of the latest round.
///
/// The outcome is kept as submitted; anything that does not parse to a head-to-head result is
/// skipped by [`Tournament::finalize_round`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResultUpdate {
    pub match_id: MatchId,
    pub outcome: String,
}

impl ResultUpdate {
    #[inline]
    pub fn new<S>(match_id: MatchId, outcome: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            match_id,
            outcome: outcome.into(),
        }
    }
}

impl Tournament {
    /// Resolves `competitor` to the id of a competitor in the roster.
    ///
    /// Names are matched exactly first and case-insensitively second.
    ///
    /// # Errors
    ///
    /// Returns an error if no competitor matches, or if a name matches more than one competitor.
    pub fn resolve(&self, competitor: &CompetitorRef) -> Result<CompetitorId> {
        match competitor {
            CompetitorRef::Id(id) => match self.contains(*id) {
                true => Ok(*id),
                false => Err(ValidationError::UnknownCompetitor(*id).into()),
            },
            CompetitorRef::Name(name) => {
                let name = name.trim();

                let mut candidates: Vec<_> = self
                    .competitors
                    .iter()
                    .filter(|c| c.name == name)
                    .collect();

                if candidates.is_empty() {
                    let lower = name.to_lowercase();
                    candidates = self
                        .competitors
                        .iter()
                        .filter(|c| c.name.to_lowercase() == lower)
                        .collect();
                }

                match candidates.as_slice() {
                    [competitor] => Ok(competitor.id),
                    [] => Err(ValidationError::UnknownName(name.to_owned()).into()),
                    _ => Err(ValidationError::AmbiguousName(name.to_owned()).into()),
                }
            }
        }
    }

    /// Pairs the next round.
    ///
    /// The first round is a random draw using `rng`. Every later round is paired by points
    /// using the [`Solver`].
    ///
    /// # Errors
    ///
    /// Returns an error if a round is still active or all rounds were already paired.
    pub fn pair_next<R>(&mut self, rng: &mut R, options: &PairingOptions) -> Result<PairedRound>
    where
        R: Rng + ?Sized,
    {
        let current = self.current_round_number();

        if self.state() == RoundState::RoundActive {
            return Err(StateConflict::RoundActive(current).into());
        }

        if current >= self.total_rounds {
            return Err(StateConflict::TournamentComplete(self.total_rounds).into());
        }

        let pairing = match current {
            0 => self.draw(rng),
            _ => self.pair_ranked(None, options),
        };

        Ok(self.push_round(current + 1, pairing))
    }

    /// Drops the active round and pairs it again. The new round keeps the same number.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no active round or the active round already has results.
    pub fn restart_round<R>(
        &mut self,
        rng: &mut R,
        options: &PairingOptions,
    ) -> Result<PairedRound>
    where
        R: Rng + ?Sized,
    {
        self.ensure_unplayed()?;

        let Some(round) = self.rounds.pop() else {
            return Err(StateConflict::NoActiveRound.into());
        };

        log::info!("Restarting round {} of {:?}", round.number, self.name);

        match self.pair_next(rng, options) {
            Ok(paired) => Ok(paired),
            Err(err) => {
                self.rounds.push(round);
                self.refresh_bye_history();
                Err(err)
            }
        }
    }

    /// Pairs the current round again with `a` and `b` forced together at table 1.
    ///
    /// Without any round this pairs the first round. Neither of the forced competitors can
    /// receive the bye; everyone else is paired by the [`Solver`].
    ///
    /// # Errors
    ///
    /// Returns an error if `a` or `b` cannot be resolved, both refer to the same competitor, the
    /// latest round is already complete or the active round has results.
    pub fn override_pair(
        &mut self,
        a: &CompetitorRef,
        b: &CompetitorRef,
        options: &PairingOptions,
    ) -> Result<PairedRound> {
        let a = self.resolve(a)?;
        let b = self.resolve(b)?;

        if a == b {
            return Err(ValidationError::SelfPair(a).into());
        }

        let number = match self.state() {
            RoundState::NoActiveRound => 1,
            RoundState::RoundActive => {
                self.ensure_unplayed()?;
                let number = self.current_round_number();
                self.rounds.pop();
                number
            }
            RoundState::RoundComplete => return Err(StateConflict::NoActiveRound.into()),
        };

        log::info!(
            "Overriding round {} of {:?}: {} v {}",
            number,
            self.name,
            self.name_of(a),
            self.name_of(b)
        );

        let pairing = self.pair_ranked(Some((a, b)), options);
        Ok(self.push_round(number, pairing))
    }

    /// Replaces the matches of the active round.
    ///
    /// Tables are numbered from 1 in the order of `edits`. Every match gets a new id.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no active round, the active round has results, or `edits`
    /// contains an unknown competitor, a self-pair or the same competitor twice. `edits` must
    /// contain at least one head-to-head match.
    pub fn edit_pairings(&mut self, edits: Vec<PairingEdit>) -> Result<Vec<Match>> {
        self.ensure_unplayed()?;

        let mut seen = HashSet::new();
        for edit in &edits {
            if edit.competitor_b == Some(edit.competitor_a) {
                return Err(ValidationError::SelfPair(edit.competitor_a).into());
            }

            for id in std::iter::once(edit.competitor_a).chain(edit.competitor_b) {
                if !self.contains(id) {
                    return Err(ValidationError::UnknownCompetitor(id).into());
                }

                if !seen.insert(id) {
                    return Err(ValidationError::DuplicateAppearance(id).into());
                }
            }
        }

        if edits.iter().all(|edit| edit.competitor_b.is_none()) {
            return Err(ValidationError::EmptyRound.into());
        }

        let matches: Vec<_> = edits
            .into_iter()
            .zip(1..)
            .map(|(edit, table)| match edit.competitor_b {
                Some(b) => Match::new(table, edit.competitor_a, b),
                None => Match::bye(table, edit.competitor_a),
            })
            .collect();

        let Some(round) = self.latest_round_mut() else {
            return Err(StateConflict::NoActiveRound.into());
        };

        round.matches = matches.clone();
        let number = round.number;
        self.refresh_bye_history();

        log::info!(
            "Edited round {} of {:?}: {} matches",
            number,
            self.name,
            matches.len()
        );

        Ok(matches)
    }

    /// Sets the outcome of the match with the given `id` in any round.
    ///
    /// Setting [`Outcome::Bye`] on a head-to-head match removes the second competitor. A bye
    /// only accepts [`Outcome::Bye`], which leaves it unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the match does not exist, a bye would receive a head-to-head result
    /// or a match outside of the latest round would become pending again.
    pub fn edit_result(&mut self, id: MatchId, outcome: Outcome) -> Result<Match> {
        let Some((round_index, match_index)) = self.find_match(id) else {
            return Err(ValidationError::UnknownMatch(id).into());
        };

        let is_latest = round_index + 1 == self.rounds.len();
        let round = &mut self.rounds[round_index];
        let number = round.number;
        let m = &mut round.matches[match_index];

        if m.is_bye() {
            return match outcome {
                Outcome::Bye => Ok(m.clone()),
                _ => Err(ValidationError::ByeConversion(id).into()),
            };
        }

        if outcome.is_pending() && !is_latest {
            return Err(StateConflict::NotLatestRound(id, number).into());
        }

        if outcome == Outcome::Bye {
            m.competitor_b = None;
        }

        m.outcome = outcome;
        let m = m.clone();

        self.refresh_bye_history();

        log::info!("Set match {} in round {} to {}", id, number, outcome);

        Ok(m)
    }

    /// Records `updates` in the latest round and returns the new standings.
    ///
    /// Updates for unknown matches, byes or with an outcome other than `A_WINS`, `B_WINS` or
    /// `TIE` are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if no round was paired yet.
    pub fn finalize_round(&mut self, updates: &[ResultUpdate]) -> Result<Standings> {
        let Some(round) = self.rounds.last_mut() else {
            return Err(StateConflict::NoRounds.into());
        };

        let mut applied = 0;
        for update in updates {
            let Some(m) = round.get_mut(update.match_id) else {
                log::debug!("Skipping unknown match {}", update.match_id);
                continue;
            };

            if m.is_bye() {
                log::debug!("Skipping bye match {}", m.id);
                continue;
            }

            match update.outcome.parse::<Outcome>() {
                Ok(outcome) if outcome.is_result() => {
                    m.outcome = outcome;
                    applied += 1;
                }
                _ => log::debug!(
                    "Skipping outcome {:?} for match {}",
                    update.outcome,
                    m.id
                ),
            }
        }

        log::info!(
            "Recorded {} of {} results in round {} of {:?}",
            applied,
            updates.len(),
            round.number,
            self.name
        );

        Ok(self.standings())
    }

    /// Fails unless the latest round is active and has no recorded results.
    fn ensure_unplayed(&self) -> Result<()> {
        match self.active_round() {
            None => Err(StateConflict::NoActiveRound.into()),
            Some(round) if round.has_results() => {
                Err(StateConflict::RoundFinalized(round.number).into())
            }
            Some(_) => Ok(()),
        }
    }

    /// Shuffles the roster and pairs it in order. With an odd roster the last competitor
    /// receives the bye.
    fn draw<R>(&self, rng: &mut R) -> Pairing
    where
        R: Rng + ?Sized,
    {
        let mut order: Vec<_> = self.competitors.iter().map(|c| c.id).collect();
        order.shuffle(rng);

        let bye = match order.len() % 2 {
            0 => None,
            _ => order.pop(),
        };

        Pairing {
            pairs: order.chunks_exact(2).map(|c| (c[0], c[1])).collect(),
            bye,
            strategy: Strategy::Shuffled,
        }
    }

    /// Pairs the roster by points. A `forced` pair is placed first and its competitors are
    /// excluded from the bye and the brackets.
    fn pair_ranked(&self, forced: Option<Pair>, options: &PairingOptions) -> Pairing {
        let standings = self.standings();
        let history = History::from_tournament(self);

        let roster: Vec<_> = self.competitors.iter().map(|c| c.id).collect();
        let excluded: HashSet<_> = forced.iter().flat_map(|(a, b)| [*a, *b]).collect();

        let bye = brackets::select_bye(&standings, &roster, &excluded);

        let pool: Vec<_> = roster
            .into_iter()
            .filter(|id| !excluded.contains(id) && Some(*id) != bye)
            .collect();

        let brackets = brackets::build(&standings, &pool);
        let mut pairing = Solver::new(&history, options).solve(brackets, bye);

        if let Some((a, b)) = forced {
            if history.has_met(a, b) {
                log::warn!("Forced pair {} v {} is a rematch", a, b);
            }

            pairing.pairs.insert(0, (a, b));
        }

        pairing
    }

    fn push_round(&mut self, number: u32, pairing: Pairing) -> PairedRound {
        let strategy = pairing.strategy;
        let matches = pairing.into_matches(1);

        self.rounds.push(Round::new(number, matches.clone()));
        self.refresh_bye_history();

        log::info!(
            "Paired round {} of {:?}: {} matches ({:?})",
            number,
            self.name,
            matches.len(),
            strategy
        );

        PairedRound {
            number,
            matches,
            strategy,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::solver::Strategy;
    use crate::tournament::tests::{played, tournament};
    use crate::{
        CompetitorId, Error, Match, MatchId, Outcome, PairingOptions, Round, RoundState,
        StateConflict, Tournament, ValidationError,
    };

    use super::{CompetitorRef, PairingEdit, ResultUpdate};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    /// Asserts that no competitor appears twice and nobody plays themselves.
    fn assert_matching(matches: &[Match]) {
        let mut seen = HashSet::new();
        for m in matches {
            assert_ne!(Some(m.competitor_a), m.competitor_b);
            for id in m.competitors() {
                assert!(seen.insert(id), "{} appears twice", id);
            }
        }
    }

    /// Records a win for competitor A in every pending match of the latest round.
    fn a_wins_all(t: &mut Tournament) {
        let updates: Vec<_> = t
            .latest_round()
            .unwrap()
            .matches
            .iter()
            .filter(|m| !m.is_bye())
            .map(|m| ResultUpdate::new(m.id, "A_WINS"))
            .collect();

        t.finalize_round(&updates).unwrap();
    }

    #[test]
    fn test_resolve() {
        let mut t = tournament(3, 1);
        t.competitors[2].name = String::from("p1");

        assert_eq!(
            t.resolve(&CompetitorRef::from("P1")).unwrap(),
            CompetitorId(1)
        );
        assert_eq!(
            t.resolve(&CompetitorRef::from(" p2 ")).unwrap(),
            CompetitorId(2)
        );
        assert_eq!(
            t.resolve(&CompetitorRef::Id(CompetitorId(3))).unwrap(),
            CompetitorId(3)
        );

        t.competitors[2].name = String::from("P2");
        assert_eq!(
            t.resolve(&CompetitorRef::from("p2")),
            Err(Error::Validation(ValidationError::AmbiguousName(
                String::from("p2")
            )))
        );
        assert_eq!(
            t.resolve(&CompetitorRef::from("nobody")),
            Err(Error::Validation(ValidationError::UnknownName(
                String::from("nobody")
            )))
        );
        assert_eq!(
            t.resolve(&CompetitorRef::Id(CompetitorId(9))),
            Err(Error::Validation(ValidationError::UnknownCompetitor(
                CompetitorId(9)
            )))
        );
    }

    #[test]
    fn test_competitor_ref_from_str() {
        assert_eq!(
            "17".parse::<CompetitorRef>().unwrap(),
            CompetitorRef::Id(CompetitorId(17))
        );
        assert_eq!(
            " Ann ".parse::<CompetitorRef>().unwrap(),
            CompetitorRef::Name(String::from("Ann"))
        );
    }

    #[test]
    fn test_pair_first_round_even() {
        let mut t = tournament(6, 3);
        let round = t.pair_next(&mut rng(), &PairingOptions::default()).unwrap();

        assert_eq!(round.number, 1);
        assert_eq!(round.strategy, Strategy::Shuffled);
        assert_eq!(round.matches.len(), 3);
        assert!(round.matches.iter().all(|m| !m.is_bye()));
        assert!(round.matches.iter().all(|m| m.outcome == Outcome::Pending));
        assert_eq!(
            round.matches.iter().map(|m| m.table).collect::<Vec<_>>(),
            [1, 2, 3]
        );
        assert_matching(&round.matches);

        assert_eq!(t.state(), RoundState::RoundActive);
        assert!(t.bye_history.is_empty());
    }

    #[test]
    fn test_pair_first_round_odd() {
        let mut t = tournament(5, 3);
        let round = t.pair_next(&mut rng(), &PairingOptions::default()).unwrap();

        assert_eq!(round.matches.len(), 3);
        let byes: Vec<_> = round.matches.iter().filter(|m| m.is_bye()).collect();
        assert_eq!(byes.len(), 1);
        assert_eq!(byes[0].table, 3);
        assert_eq!(byes[0].outcome, Outcome::Bye);
        assert_matching(&round.matches);

        assert_eq!(
            t.bye_history.iter().copied().collect::<Vec<_>>(),
            [byes[0].competitor_a]
        );
    }

    #[test]
    fn test_pair_next_state_conflicts() {
        let mut t = tournament(4, 1);
        let options = PairingOptions::default();

        t.pair_next(&mut rng(), &options).unwrap();
        assert_eq!(
            t.pair_next(&mut rng(), &options),
            Err(Error::StateConflict(StateConflict::RoundActive(1)))
        );

        a_wins_all(&mut t);
        assert!(t.is_complete());
        assert_eq!(
            t.pair_next(&mut rng(), &options),
            Err(Error::StateConflict(StateConflict::TournamentComplete(1)))
        );
    }

    #[test]
    fn test_pair_second_round_by_points() {
        let mut t = tournament(4, 3);
        let options = PairingOptions::default();

        t.pair_next(&mut rng(), &options).unwrap();
        a_wins_all(&mut t);

        let winners: HashSet<_> = t.rounds[0].matches.iter().map(|m| m.competitor_a).collect();

        let round = t.pair_next(&mut rng(), &options).unwrap();
        assert_eq!(round.number, 2);
        assert_eq!(round.strategy, Strategy::Brackets);
        assert_matching(&round.matches);

        // Winners play winners, no rematches.
        let top = &round.matches[0];
        assert!(winners.contains(&top.competitor_a));
        assert!(winners.contains(&top.competitor_b.unwrap()));
        assert_eq!(t.prior_pairs().len(), 4);
    }

    #[test]
    fn test_five_competitors_standings() {
        let mut t = tournament(5, 3);
        t.pair_next(&mut rng(), &PairingOptions::default()).unwrap();
        let standings = t.finalize_round(&[]).unwrap();

        // Only the bye is counted so far.
        assert_eq!(standings.iter().filter(|s| s.points == 3).count(), 1);

        a_wins_all(&mut t);
        let standings = t.standings();
        let points: Vec<_> = standings.iter().map(|s| s.points).collect();
        assert_eq!(points, [3, 3, 3, 0, 0]);
    }

    #[test]
    fn test_bye_rotates() {
        let mut t = tournament(3, 3);
        let options = PairingOptions::default();

        let mut byes = Vec::new();
        for _ in 0..2 {
            let round = t.pair_next(&mut rng(), &options).unwrap();
            byes.push(round.matches.iter().find(|m| m.is_bye()).unwrap().competitor_a);
            a_wins_all(&mut t);
        }

        assert_ne!(byes[0], byes[1]);
        assert_eq!(t.bye_history.len(), 2);
    }

    #[test]
    fn test_restart_round() {
        let mut t = tournament(6, 3);
        let options = PairingOptions::default();

        assert_eq!(
            t.restart_round(&mut rng(), &options),
            Err(Error::StateConflict(StateConflict::NoActiveRound))
        );

        t.pair_next(&mut rng(), &options).unwrap();
        a_wins_all(&mut t);
        let first = t.rounds[0].clone();

        t.pair_next(&mut rng(), &options).unwrap();
        let round = t.restart_round(&mut rng(), &options).unwrap();

        assert_eq!(round.number, 2);
        assert_eq!(t.rounds.len(), 2);
        assert_eq!(t.rounds[0], first);
        assert_eq!(t.rounds[1].matches, round.matches);
        assert_matching(&round.matches);
    }

    #[test]
    fn test_restart_round_with_results() {
        let mut t = tournament(4, 3);
        let options = PairingOptions::default();

        t.pair_next(&mut rng(), &options).unwrap();
        let id = t.rounds[0].matches[0].id;
        t.edit_result(id, Outcome::Tie).unwrap();

        let before = t.clone();
        assert_eq!(
            t.restart_round(&mut rng(), &options),
            Err(Error::StateConflict(StateConflict::RoundFinalized(1)))
        );
        assert_eq!(t, before);
    }

    #[test]
    fn test_override_pair() {
        let mut t = tournament(5, 3);
        let options = PairingOptions::default();

        let round = t
            .override_pair(
                &CompetitorRef::from("p1"),
                &CompetitorRef::Id(CompetitorId(2)),
                &options,
            )
            .unwrap();

        assert_eq!(round.number, 1);
        assert_eq!(round.matches.len(), 3);
        assert_eq!(round.matches[0].table, 1);
        assert_eq!(round.matches[0].competitor_a, CompetitorId(1));
        assert_eq!(round.matches[0].competitor_b, Some(CompetitorId(2)));
        assert_matching(&round.matches);

        let bye = round.matches.iter().find(|m| m.is_bye()).unwrap();
        assert_ne!(bye.competitor_a, CompetitorId(1));
        assert_ne!(bye.competitor_a, CompetitorId(2));

        // Overriding the active round replaces it.
        let round = t
            .override_pair(
                &CompetitorRef::from("P3"),
                &CompetitorRef::from("P4"),
                &options,
            )
            .unwrap();
        assert_eq!(round.number, 1);
        assert_eq!(t.rounds.len(), 1);
        assert_eq!(round.matches[0].pair(), Some((CompetitorId(3), CompetitorId(4))));

        a_wins_all(&mut t);
        assert_eq!(
            t.override_pair(
                &CompetitorRef::from("P1"),
                &CompetitorRef::from("P2"),
                &options
            ),
            Err(Error::StateConflict(StateConflict::NoActiveRound))
        );
    }

    #[test]
    fn test_override_pair_invalid() {
        let mut t = tournament(4, 3);
        let options = PairingOptions::default();

        assert_eq!(
            t.override_pair(
                &CompetitorRef::from("P1"),
                &CompetitorRef::from("p1"),
                &options
            ),
            Err(Error::Validation(ValidationError::SelfPair(CompetitorId(1))))
        );
        assert_eq!(
            t.override_pair(
                &CompetitorRef::from("P1"),
                &CompetitorRef::from("P9"),
                &options
            ),
            Err(Error::Validation(ValidationError::UnknownName(
                String::from("P9")
            )))
        );
        assert!(t.rounds.is_empty());
    }

    #[test]
    fn test_edit_pairings() {
        let mut t = tournament(5, 3);
        t.pair_next(&mut rng(), &PairingOptions::default()).unwrap();

        let matches = t
            .edit_pairings(vec![
                PairingEdit::new(CompetitorId(5), None),
                PairingEdit::new(CompetitorId(1), Some(CompetitorId(2))),
                PairingEdit::new(CompetitorId(3), Some(CompetitorId(4))),
            ])
            .unwrap();

        assert_eq!(
            matches.iter().map(|m| m.table).collect::<Vec<_>>(),
            [1, 2, 3]
        );
        assert_eq!(matches[0].outcome, Outcome::Bye);
        assert_eq!(matches[1].outcome, Outcome::Pending);
        assert_eq!(t.rounds[0].matches, matches);
        assert_eq!(
            t.bye_history.iter().copied().collect::<Vec<_>>(),
            [CompetitorId(5)]
        );
    }

    #[test]
    fn test_edit_pairings_invalid() {
        let mut t = tournament(4, 3);

        assert_eq!(
            t.edit_pairings(vec![]),
            Err(Error::StateConflict(StateConflict::NoActiveRound))
        );

        t.pair_next(&mut rng(), &PairingOptions::default()).unwrap();
        let before = t.clone();

        assert_eq!(
            t.edit_pairings(vec![PairingEdit::new(CompetitorId(1), Some(CompetitorId(1)))]),
            Err(Error::Validation(ValidationError::SelfPair(CompetitorId(1))))
        );
        assert_eq!(
            t.edit_pairings(vec![PairingEdit::new(CompetitorId(1), Some(CompetitorId(7)))]),
            Err(Error::Validation(ValidationError::UnknownCompetitor(
                CompetitorId(7)
            )))
        );
        assert_eq!(
            t.edit_pairings(vec![
                PairingEdit::new(CompetitorId(1), Some(CompetitorId(2))),
                PairingEdit::new(CompetitorId(2), Some(CompetitorId(3))),
            ]),
            Err(Error::Validation(ValidationError::DuplicateAppearance(
                CompetitorId(2)
            )))
        );

        assert_eq!(
            t.edit_pairings(vec![]),
            Err(Error::Validation(ValidationError::EmptyRound))
        );
        assert_eq!(
            t.edit_pairings(vec![
                PairingEdit::new(CompetitorId(1), None),
                PairingEdit::new(CompetitorId(2), None),
            ]),
            Err(Error::Validation(ValidationError::EmptyRound))
        );

        assert_eq!(t, before);
        assert_eq!(t.state(), RoundState::RoundActive);
    }

    #[test]
    fn test_edit_result() {
        let mut t = tournament(5, 3);
        t.rounds.push(Round::new(
            1,
            vec![
                played(1, 1, 1, Some(2), Outcome::AWins),
                played(2, 2, 3, Some(4), Outcome::BWins),
                played(3, 3, 5, None, Outcome::Bye),
            ],
        ));
        t.rounds.push(Round::new(
            2,
            vec![
                played(4, 1, 1, Some(4), Outcome::Pending),
                played(5, 2, 2, Some(5), Outcome::Pending),
                played(6, 3, 3, None, Outcome::Bye),
            ],
        ));
        t.refresh_bye_history();

        assert_eq!(
            t.edit_result(MatchId(3), Outcome::AWins),
            Err(Error::Validation(ValidationError::ByeConversion(MatchId(3))))
        );
        assert_eq!(t.edit_result(MatchId(3), Outcome::Bye).unwrap().outcome, Outcome::Bye);
        assert_eq!(
            t.edit_result(MatchId(1), Outcome::Pending),
            Err(Error::StateConflict(StateConflict::NotLatestRound(
                MatchId(1),
                1
            )))
        );
        assert_eq!(
            t.edit_result(MatchId(99), Outcome::Tie),
            Err(Error::Validation(ValidationError::UnknownMatch(MatchId(99))))
        );

        // Older rounds may still be corrected.
        let m = t.edit_result(MatchId(2), Outcome::Tie).unwrap();
        assert_eq!(m.outcome, Outcome::Tie);

        let m = t.edit_result(MatchId(4), Outcome::AWins).unwrap();
        assert_eq!(m.outcome, Outcome::AWins);
        let m = t.edit_result(MatchId(4), Outcome::Pending).unwrap();
        assert_eq!(m.outcome, Outcome::Pending);

        let m = t.edit_result(MatchId(5), Outcome::Bye).unwrap();
        assert_eq!(m.competitor_b, None);
        assert!(t.bye_history.contains(&CompetitorId(2)));
    }

    #[test]
    fn test_finalize_round() {
        let mut t = tournament(3, 3);
        assert_eq!(
            t.finalize_round(&[]).unwrap_err(),
            Error::StateConflict(StateConflict::NoRounds)
        );

        t.rounds.push(Round::new(
            1,
            vec![
                played(1, 1, 1, Some(2), Outcome::Pending),
                played(2, 2, 3, None, Outcome::Bye),
            ],
        ));

        let standings = t
            .finalize_round(&[
                ResultUpdate::new(MatchId(2), "A_WINS"),
                ResultUpdate::new(MatchId(9), "A_WINS"),
                ResultUpdate::new(MatchId(1), "PENDING"),
                ResultUpdate::new(MatchId(1), "draw"),
            ])
            .unwrap();

        assert_eq!(t.state(), RoundState::RoundActive);
        assert_eq!(t.rounds[0].matches[1].outcome, Outcome::Bye);
        assert_eq!(standings.get(CompetitorId(3)).unwrap().points, 3);

        let standings = t
            .finalize_round(&[ResultUpdate::new(MatchId(1), "b")])
            .unwrap();
        assert_eq!(t.state(), RoundState::RoundComplete);
        assert_eq!(t.rounds[0].matches[0].outcome, Outcome::BWins);
        assert_eq!(standings.get(CompetitorId(2)).unwrap().points, 3);
        assert_eq!(standings.get(CompetitorId(1)).unwrap().points, 0);
    }
}
