use std::collections::BTreeMap;

use election_tally::{
    Constituency, ConstituencyId, ConstituencyStore, PartyResult, StoreError, StoreResult,
};

/// A full store snapshot: the constituencies keyed by their unique name,
/// plus the id counter, which rolls back with everything else.
#[derive(Debug, Clone)]
pub(crate) struct StoreState {
    pub constituencies: BTreeMap<String, Constituency>,
    pub next_id: u64,
}

impl StoreState {
    pub fn new() -> StoreState {
        StoreState {
            constituencies: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// In-memory implementation of the store contract.
///
/// Reads see the last committed state. `begin` clones it into a working
/// copy; upserts mutate only the working copy, which replaces the
/// committed state on `commit` and is discarded on `rollback`.
#[derive(Debug)]
pub struct MemoryStore {
    committed: StoreState,
    working: Option<StoreState>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore {
            committed: StoreState::new(),
            working: None,
        }
    }

    pub(crate) fn from_state(state: StoreState) -> MemoryStore {
        MemoryStore {
            committed: state,
            working: None,
        }
    }

    pub(crate) fn committed_state(&self) -> &StoreState {
        &self.committed
    }
}

impl ConstituencyStore for MemoryStore {
    fn find_all(&self) -> StoreResult<Vec<Constituency>> {
        // BTreeMap iteration gives name order.
        Ok(self.committed.constituencies.values().cloned().collect())
    }

    fn find_by_id(&self, id: ConstituencyId) -> StoreResult<Option<Constituency>> {
        Ok(self
            .committed
            .constituencies
            .values()
            .find(|c| c.id == id)
            .cloned())
    }

    fn find_by_name(&self, name: &str) -> StoreResult<Option<Constituency>> {
        Ok(self.committed.constituencies.get(name).cloned())
    }

    fn begin(&mut self) -> StoreResult<()> {
        if self.working.is_some() {
            return Err(StoreError::new("a transaction is already open"));
        }
        self.working = Some(self.committed.clone());
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        match self.working.take() {
            Some(state) => {
                self.committed = state;
                Ok(())
            }
            None => Err(StoreError::new("no open transaction to commit")),
        }
    }

    fn rollback(&mut self) -> StoreResult<()> {
        match self.working.take() {
            Some(_) => Ok(()),
            None => Err(StoreError::new("no open transaction to roll back")),
        }
    }

    fn upsert_constituency_with_party_results(
        &mut self,
        name: &str,
        results: &[PartyResult],
    ) -> StoreResult<Constituency> {
        let state = self
            .working
            .as_mut()
            .ok_or_else(|| StoreError::new("upsert outside of a transaction"))?;

        let next_id = state.next_id;
        let mut created = false;
        let constituency = state
            .constituencies
            .entry(name.to_string())
            .or_insert_with(|| {
                created = true;
                Constituency {
                    id: ConstituencyId(next_id),
                    name: name.to_string(),
                    party_results: Vec::new(),
                }
            });
        if created {
            state.next_id += 1;
        }

        for result in results {
            match constituency
                .party_results
                .iter_mut()
                .find(|r| r.party_code == result.party_code)
            {
                Some(existing) => existing.votes = result.votes,
                None => constituency.party_results.push(result.clone()),
            }
        }
        Ok(constituency.clone())
    }
}
