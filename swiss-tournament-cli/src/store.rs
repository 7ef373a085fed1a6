use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use swiss_tournament_core::store::Store;
use swiss_tournament_core::{Tournament, TournamentId};
use thiserror::Error;

/// A [`Store`] writing every tournament as a JSON document named `t_<id>.json` into a single
/// directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens the store in `dir`, creating the directory if necessary.
    pub fn new<P>(dir: P) -> Result<Self, StoreError>
    where
        P: AsRef<Path>,
    {
        let dir = dir.as_ref().to_owned();
        fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    fn path(&self, id: TournamentId) -> PathBuf {
        self.dir.join(format!("t_{}.json", id))
    }
}

impl Store for FileStore {
    type Error = StoreError;

    fn load(&self, id: TournamentId) -> Result<Option<Tournament>, Self::Error> {
        let buf = match fs::read(self.path(id)) {
            Ok(buf) => buf,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        Ok(Some(serde_json::from_slice(&buf)?))
    }

    fn save(&self, tournament: &Tournament) -> Result<(), Self::Error> {
        let path = self.path(tournament.id);
        let tmp = path.with_extension("json.tmp");

        let buf = serde_json::to_vec_pretty(tournament)?;
        fs::write(&tmp, buf)?;
        fs::rename(&tmp, &path)?;

        log::debug!("Saved tournament {} to {}", tournament.id, path.display());
        Ok(())
    }

    fn list(&self) -> Result<Vec<TournamentId>, Self::Error> {
        let mut ids = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let name = entry?.file_name();

            let id = name
                .to_str()
                .and_then(|name| name.strip_prefix("t_"))
                .and_then(|name| name.strip_suffix(".json"))
                .and_then(|id| id.parse().ok());

            match id {
                Some(id) => ids.push(id),
                None => log::trace!("Ignoring {:?} in data directory", name),
            }
        }

        ids.sort();
        Ok(ids)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("malformed tournament document: {0}")]
    Json(#[from] serde_json::Error),
}
