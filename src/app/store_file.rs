use std::fs;
use std::path::PathBuf;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use election_tally::{
    Constituency, ConstituencyId, ConstituencyStore, PartyResult, StoreError, StoreResult,
};

use crate::app::store_mem::{MemoryStore, StoreState};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct StoredPartyResult {
    #[serde(rename = "partyCode")]
    party_code: String,
    votes: u64,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct StoredConstituency {
    id: u64,
    name: String,
    #[serde(rename = "partyResults")]
    party_results: Vec<StoredPartyResult>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct StoreDocument {
    constituencies: Vec<StoredConstituency>,
}

impl StoreDocument {
    fn into_state(self) -> StoreState {
        let mut state = StoreState::new();
        for stored in self.constituencies {
            state.next_id = state.next_id.max(stored.id + 1);
            state.constituencies.insert(
                stored.name.clone(),
                Constituency {
                    id: ConstituencyId(stored.id),
                    name: stored.name,
                    party_results: stored
                        .party_results
                        .into_iter()
                        .map(|r| PartyResult {
                            party_code: r.party_code,
                            votes: r.votes,
                        })
                        .collect(),
                },
            );
        }
        state
    }

    fn from_state(state: &StoreState) -> StoreDocument {
        StoreDocument {
            constituencies: state
                .constituencies
                .values()
                .map(|c| StoredConstituency {
                    id: c.id.0,
                    name: c.name.clone(),
                    party_results: c
                        .party_results
                        .iter()
                        .map(|r| StoredPartyResult {
                            party_code: r.party_code.clone(),
                            votes: r.votes,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Store backed by a JSON document on disk.
///
/// The state lives in a wrapped [`MemoryStore`]; the document is read once
/// on open and rewritten after every committed transaction. A commit whose
/// write fails reports the failure and keeps the previous durable state.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl FileStore {
    pub fn open(path: &str) -> StoreResult<FileStore> {
        let p = PathBuf::from(path);
        let inner = if p.exists() {
            let contents = fs::read_to_string(&p).map_err(|e| {
                StoreError::with_source(format!("Error reading store file {}", path), e)
            })?;
            let document: StoreDocument = serde_json::from_str(&contents).map_err(|e| {
                StoreError::with_source(format!("Error parsing store file {}", path), e)
            })?;
            info!(
                "loaded {} constituencies from {}",
                document.constituencies.len(),
                path
            );
            MemoryStore::from_state(document.into_state())
        } else {
            debug!("store file {} does not exist yet", path);
            MemoryStore::new()
        };
        Ok(FileStore { path: p, inner })
    }

    fn save(&self) -> StoreResult<()> {
        let document = StoreDocument::from_state(self.inner.committed_state());
        let contents = serde_json::to_string_pretty(&document).map_err(|e| {
            StoreError::with_source(
                format!("Error rendering store file {}", self.path.display()),
                e,
            )
        })?;
        fs::write(&self.path, contents).map_err(|e| {
            StoreError::with_source(
                format!("Error writing store file {}", self.path.display()),
                e,
            )
        })
    }
}

impl ConstituencyStore for FileStore {
    fn find_all(&self) -> StoreResult<Vec<Constituency>> {
        self.inner.find_all()
    }

    fn find_by_id(&self, id: ConstituencyId) -> StoreResult<Option<Constituency>> {
        self.inner.find_by_id(id)
    }

    fn find_by_name(&self, name: &str) -> StoreResult<Option<Constituency>> {
        self.inner.find_by_name(name)
    }

    fn begin(&mut self) -> StoreResult<()> {
        self.inner.begin()
    }

    fn commit(&mut self) -> StoreResult<()> {
        // A failed write must leave the last durable state in place.
        let before = self.inner.committed_state().clone();
        self.inner.commit()?;
        if let Err(err) = self.save() {
            self.inner = MemoryStore::from_state(before);
            return Err(err);
        }
        Ok(())
    }

    fn rollback(&mut self) -> StoreResult<()> {
        self.inner.rollback()
    }

    fn upsert_constituency_with_party_results(
        &mut self,
        name: &str,
        results: &[PartyResult],
    ) -> StoreResult<Constituency> {
        self.inner
            .upsert_constituency_with_party_results(name, results)
    }
}
