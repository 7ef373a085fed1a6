use clap::Subcommand;
use swiss_tournament_core::store::Store;
use swiss_tournament_core::{
    CompetitorRef, MatchId, Outcome, PairedRound, PairingEdit, ResultUpdate, Tournament,
    TournamentId,
};

use crate::utils::{print_matches, print_standings};
use crate::{Context, Error};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Pairs the next round.
    Pair { id: TournamentId },
    /// Discards the active round and pairs it again.
    Restart { id: TournamentId },
    /// Pairs the active round again with two competitors forced together.
    Override {
        id: TournamentId,
        /// Competitor id or name.
        a: CompetitorRef,
        /// Competitor id or name.
        b: CompetitorRef,
    },
    /// Replaces the pairings of the active round. Every pairing is `A:B`, or `A` for a bye.
    EditPairings {
        id: TournamentId,
        #[clap(required = true)]
        pairings: Vec<String>,
    },
    /// Sets the outcome of a single match in any round.
    #[clap(name = "result")]
    SetResult {
        id: TournamentId,
        match_id: MatchId,
        outcome: Outcome,
    },
    /// Records results for the latest round. Every result is `MATCH_ID=OUTCOME`.
    Finalize {
        id: TournamentId,
        #[clap(value_parser = parse_update)]
        results: Vec<ResultUpdate>,
    },
}

impl Command {
    pub fn run(self, ctx: &mut Context) -> Result<(), Error> {
        match self {
            Self::Pair { id } => {
                let (tournament, round) =
                    ctx.update(id, |t, rng, options| t.pair_next(rng, options))?;
                print_round(&tournament, &round);
            }
            Self::Restart { id } => {
                let (tournament, round) =
                    ctx.update(id, |t, rng, options| t.restart_round(rng, options))?;
                print_round(&tournament, &round);
            }
            Self::Override { id, a, b } => {
                let (tournament, round) =
                    ctx.update(id, |t, _, options| t.override_pair(&a, &b, options))?;
                print_round(&tournament, &round);
            }
            Self::EditPairings { id, pairings } => {
                let mut tournament = ctx.load(id)?;

                let edits = pairings
                    .iter()
                    .map(|s| parse_edit(&tournament, s))
                    .collect::<Result<Vec<_>, _>>()?;

                let matches = tournament.edit_pairings(edits)?;
                ctx.store.save(&tournament)?;

                print_matches(&tournament, &matches);
            }
            Self::SetResult {
                id,
                match_id,
                outcome,
            } => {
                let (tournament, m) = ctx.update(id, |t, _, _| t.edit_result(match_id, outcome))?;
                print_matches(&tournament, &[m]);
            }
            Self::Finalize { id, results } => {
                let (_, standings) = ctx.update(id, |t, _, _| t.finalize_round(&results))?;
                print_standings(&standings);
            }
        }

        Ok(())
    }
}

fn print_round(tournament: &Tournament, round: &PairedRound) {
    println!("Round {} ({:?})", round.number, round.strategy);
    print_matches(tournament, &round.matches);
}

/// Parses `A:B` or `A` into a [`PairingEdit`], resolving both competitors in `tournament`.
fn parse_edit(tournament: &Tournament, s: &str) -> Result<PairingEdit, Error> {
    let resolve = |s: &str| -> Result<_, Error> {
        let competitor = match s.parse::<CompetitorRef>() {
            Ok(competitor) => competitor,
            Err(err) => match err {},
        };

        Ok(tournament.resolve(&competitor)?)
    };

    let (a, b) = match s.split_once(':') {
        Some((a, b)) => (a, Some(b)),
        None => (s, None),
    };

    if a.trim().is_empty() {
        return Err(Error::InvalidArgument(format!("missing competitor in {:?}", s)));
    }

    let b = match b.map(str::trim) {
        None | Some("") => None,
        Some(b) => Some(resolve(b)?),
    };

    Ok(PairingEdit::new(resolve(a)?, b))
}

/// Parses `MATCH_ID=OUTCOME` into a [`ResultUpdate`].
fn parse_update(s: &str) -> Result<ResultUpdate, String> {
    let (id, outcome) = s
        .split_once('=')
        .ok_or_else(|| format!("expected MATCH_ID=OUTCOME, got {:?}", s))?;

    let id = id
        .trim()
        .parse::<MatchId>()
        .map_err(|err| format!("invalid match id {:?}: {}", id, err))?;

    Ok(ResultUpdate::new(id, outcome.trim()))
}
