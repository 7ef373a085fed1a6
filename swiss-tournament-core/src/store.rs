//! The storage contract for tournament documents.
use std::collections::HashMap;
use std::convert::Infallible;

use parking_lot::RwLock;

use crate::{Tournament, TournamentId};

/// A keyed store for [`Tournament`] documents.
///
/// The core never calls a `Store` itself. Callers load a document, run a single operation on
/// it and save it again only if the operation succeeded.
pub trait Store {
    type Error;

    fn load(&self, id: TournamentId) -> Result<Option<Tournament>, Self::Error>;

    /// Inserts or replaces the document with the id of `tournament`.
    fn save(&self, tournament: &Tournament) -> Result<(), Self::Error>;

    /// Returns the ids of all stored documents.
    fn list(&self) -> Result<Vec<TournamentId>, Self::Error>;
}

/// A [`Store`] keeping all documents in memory. Concurrent writers to the same document are
/// last write wins.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<TournamentId, Tournament>>,
}

impl MemoryStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl Store for MemoryStore {
    type Error = Infallible;

    fn load(&self, id: TournamentId) -> Result<Option<Tournament>, Self::Error> {
        Ok(self.inner.read().get(&id).cloned())
    }

    fn save(&self, tournament: &Tournament) -> Result<(), Self::Error> {
        log::debug!("Saving tournament {}", tournament.id);

        self.inner
            .write()
            .insert(tournament.id, tournament.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<TournamentId>, Self::Error> {
        let mut ids: Vec<_> = self.inner.read().keys().copied().collect();
        ids.sort();
        Ok(ids)
    }
}
