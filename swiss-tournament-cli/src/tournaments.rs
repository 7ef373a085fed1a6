use clap::Subcommand;
use swiss_tournament_core::store::Store;
use swiss_tournament_core::{Tournament, TournamentId};

use crate::utils::{print_matches, print_standings, Prompt};
use crate::{Context, Error};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Creates a new tournament. Competitors are read from stdin if none are given.
    Create {
        #[clap(short, long, default_value = "")]
        name: String,
        #[clap(short, long)]
        rounds: u32,
        competitors: Vec<String>,
    },
    List,
    /// Prints all rounds of a tournament.
    Show { id: TournamentId },
    Standings { id: TournamentId },
}

impl Command {
    pub fn run(self, ctx: &mut Context) -> Result<(), Error> {
        match self {
            Self::Create {
                name,
                rounds,
                competitors,
            } => {
                let competitors = match competitors.is_empty() {
                    true => Prompt::new("Competitor").read_all()?,
                    false => competitors,
                };

                let tournament = Tournament::create(&name, rounds, competitors)?;
                ctx.store.save(&tournament)?;

                println!("{}", tournament.id);
            }
            Self::List => {
                println!("ID | Name | Round | Competitors");
                for id in ctx.store.list()? {
                    let tournament = ctx.load(id)?;

                    println!(
                        "{} | {} | {}/{} | {}",
                        tournament.id,
                        tournament.name,
                        tournament.current_round_number(),
                        tournament.total_rounds,
                        tournament.competitors.len()
                    );
                }
            }
            Self::Show { id } => {
                let tournament = ctx.load(id)?;

                println!(
                    "{} ({}), round {} of {}, {:?}",
                    tournament.name,
                    tournament.id,
                    tournament.current_round_number(),
                    tournament.total_rounds,
                    tournament.state()
                );

                println!("ID | Name");
                for competitor in &tournament.competitors {
                    println!("{} | {}", competitor.id, competitor.name);
                }

                for round in &tournament.rounds {
                    println!();
                    println!("Round {}", round.number);
                    print_matches(&tournament, &round.matches);
                }
            }
            Self::Standings { id } => {
                let tournament = ctx.load(id)?;
                print_standings(&tournament.standings());
            }
        }

        Ok(())
    }
}
