mod config;
mod logger;
mod rounds;
mod store;
mod tournaments;
mod utils;

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use swiss_tournament_core::store::Store;
use swiss_tournament_core::{PairingOptions, Tournament, TournamentId};
use thiserror::Error;

use config::{Config, ConfigError};
use store::{FileStore, StoreError};

#[derive(Debug, Parser)]
#[clap(version, about)]
pub struct Args {
    /// Path to the config file. Missing files fall back to the defaults.
    #[clap(short, long, default_value = "config.toml")]
    config: PathBuf,
    /// Overrides the data directory from the config.
    #[clap(short, long)]
    data_dir: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[clap(flatten)]
    Tournaments(tournaments::Command),
    #[clap(flatten)]
    Rounds(rounds::Command),
}

fn main() {
    let args = Args::parse();

    if let Err(err) = run(args) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    let mut config = Config::load(&args.config)?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }

    logger::init(config.loglevel).map_err(|err| Error::Logger(err.to_string()))?;
    log::debug!("Using config: {:?}", config);

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut ctx = Context {
        store: FileStore::new(&config.data_dir)?,
        options: config.pairing,
        rng,
    };

    match args.command {
        Command::Tournaments(command) => command.run(&mut ctx),
        Command::Rounds(command) => command.run(&mut ctx),
    }
}

/// Everything a single command needs.
#[derive(Debug)]
pub struct Context {
    pub store: FileStore,
    pub options: PairingOptions,
    pub rng: StdRng,
}

impl Context {
    /// Loads the tournament with the given `id`.
    pub fn load(&self, id: TournamentId) -> Result<Tournament, Error> {
        match self.store.load(id)? {
            Some(tournament) => Ok(tournament),
            None => Err(swiss_tournament_core::Error::NotFound(id).into()),
        }
    }

    /// Loads the tournament `id`, runs `f` on it and saves the document if `f` succeeded.
    /// Returns the updated document together with the output of `f`.
    pub fn update<F, T>(&mut self, id: TournamentId, f: F) -> Result<(Tournament, T), Error>
    where
        F: FnOnce(
            &mut Tournament,
            &mut StdRng,
            &PairingOptions,
        ) -> swiss_tournament_core::Result<T>,
    {
        let mut tournament = self.load(id)?;
        let output = f(&mut tournament, &mut self.rng, &self.options)?;
        self.store.save(&tournament)?;

        Ok((tournament, output))
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] swiss_tournament_core::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to read config: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to install logger: {0}")]
    Logger(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
