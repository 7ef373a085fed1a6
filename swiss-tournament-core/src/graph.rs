//! Reconstruction of every competitor's history from the round log.
use std::collections::HashMap;

use crate::{CompetitorId, Outcome, Tournament};

/// The opponent of a win. A bye is credited as a win without a real opponent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Opponent {
    Real(CompetitorId),
    Bye,
}

impl Opponent {
    #[inline]
    pub fn real(self) -> Option<CompetitorId> {
        match self {
            Self::Real(id) => Some(id),
            Self::Bye => None,
        }
    }
}

/// The history of a single competitor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    pub wins: Vec<Opponent>,
    pub losses: Vec<CompetitorId>,
    pub ties: Vec<CompetitorId>,
    /// The round number of every real loss.
    pub lost_rounds: Vec<u32>,
}

impl Record {
    pub fn byes(&self) -> usize {
        self.wins.iter().filter(|w| **w == Opponent::Bye).count()
    }

    pub fn wins_real(&self) -> usize {
        self.wins.len() - self.byes()
    }

    /// Number of matches played against real opponents.
    pub fn matches_played(&self) -> usize {
        self.wins_real() + self.losses.len() + self.ties.len()
    }

    /// 3 points per win, a bye counts as a win.
    pub fn points(&self) -> u32 {
        3 * self.wins.len() as u32
    }

    pub fn match_win_pct(&self) -> f64 {
        match self.matches_played() {
            0 => 0.0,
            played => self.wins_real() as f64 / played as f64,
        }
    }

    /// Returns every real opponent in wins, losses and ties. An opponent faced twice is
    /// returned twice.
    pub fn opponents(&self) -> impl Iterator<Item = CompetitorId> + '_ {
        self.wins
            .iter()
            .filter_map(|w| w.real())
            .chain(self.losses.iter().copied())
            .chain(self.ties.iter().copied())
    }

    /// Sum of the squared round numbers of all losses, capped at 999.
    pub fn loss_penalty(&self) -> u32 {
        self.lost_rounds
            .iter()
            .fold(0u32, |sum, round| sum.saturating_add(round.saturating_mul(*round)))
            .min(999)
    }
}

/// The derived win/loss graph of a tournament.
#[derive(Clone, Debug, Default)]
pub struct MatchGraph {
    records: HashMap<CompetitorId, Record>,
}

impl MatchGraph {
    /// Builds the graph from the round log of `tournament`.
    pub fn build(tournament: &Tournament) -> Self {
        let mut records: HashMap<_, _> = tournament
            .competitors
            .iter()
            .map(|c| (c.id, Record::default()))
            .collect();

        for round in &tournament.rounds {
            for m in &round.matches {
                let known = m.competitors().all(|id| records.contains_key(&id));
                if !known {
                    log::warn!(
                        "Skipping match {} in round {}: unknown competitor",
                        m.id,
                        round.number
                    );
                    continue;
                }

                match (m.outcome, m.competitor_b) {
                    (Outcome::Pending, _) => (),
                    (Outcome::Bye, _) => {
                        record(&mut records, m.competitor_a).wins.push(Opponent::Bye);
                    }
                    (Outcome::AWins, Some(b)) => {
                        credit_win(&mut records, m.competitor_a, b, round.number);
                    }
                    (Outcome::BWins, Some(b)) => {
                        credit_win(&mut records, b, m.competitor_a, round.number);
                    }
                    (Outcome::Tie, Some(b)) => {
                        record(&mut records, m.competitor_a).ties.push(b);
                        record(&mut records, b).ties.push(m.competitor_a);
                    }
                    (outcome, None) => {
                        log::warn!("Ignoring outcome {} for bye match {}", outcome, m.id);
                    }
                }
            }
        }

        Self { records }
    }

    #[inline]
    pub fn get(&self, id: CompetitorId) -> Option<&Record> {
        self.records.get(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the match win percentage of `id`, `0` for unknown competitors.
    pub fn match_win_pct(&self, id: CompetitorId) -> f64 {
        self.get(id).map(Record::match_win_pct).unwrap_or(0.0)
    }

    /// Mean match win percentage of all real opponents of `id`.
    pub fn opp_win_pct(&self, id: CompetitorId) -> f64 {
        let Some(record) = self.get(id) else {
            return 0.0;
        };

        mean(record.opponents().map(|opp| self.match_win_pct(opp)))
    }

    /// Mean opponent win percentage of all real opponents of `id`.
    pub fn opp_opp_win_pct(&self, id: CompetitorId) -> f64 {
        let Some(record) = self.get(id) else {
            return 0.0;
        };

        mean(record.opponents().map(|opp| self.opp_win_pct(opp)))
    }
}

fn record(records: &mut HashMap<CompetitorId, Record>, id: CompetitorId) -> &mut Record {
    records.entry(id).or_default()
}

fn credit_win(
    records: &mut HashMap<CompetitorId, Record>,
    winner: CompetitorId,
    loser: CompetitorId,
    round: u32,
) {
    record(records, winner).wins.push(Opponent::Real(loser));

    let loser = record(records, loser);
    loser.losses.push(winner);
    loser.lost_rounds.push(round);
}

fn mean<I>(values: I) -> f64
where
    I: Iterator<Item = f64>,
{
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    match count {
        0 => 0.0,
        n => sum / n as f64,
    }
}
