use std::error::Error;
use std::fmt::Display;

use crate::model::{Constituency, ConstituencyId, PartyResult};

/// Failure reported by a storage backend.
///
/// The message is backend-specific; the original cause, when there is one,
/// travels along as the error source.
#[derive(Debug)]
pub struct StoreError {
    message: String,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> StoreError {
        StoreError {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> StoreError {
        StoreError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn Error + 'static))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The persistence capability the import pipeline and the views are built
/// against: keyed upsert with relational lookup, plus transaction
/// primitives.
///
/// Reads always see the last committed state. The upsert is only valid
/// between `begin` and `commit`/`rollback`; implementations reject it
/// outside a transaction, which keeps the pipeline the single write path.
pub trait ConstituencyStore {
    fn find_all(&self) -> StoreResult<Vec<Constituency>>;
    fn find_by_id(&self, id: ConstituencyId) -> StoreResult<Option<Constituency>>;
    fn find_by_name(&self, name: &str) -> StoreResult<Option<Constituency>>;

    /// Opens a transaction. At most one can be open at a time.
    fn begin(&mut self) -> StoreResult<()>;

    /// Makes the open transaction's writes durable and closes it. On
    /// failure the transaction is discarded and the previously committed
    /// state is kept.
    fn commit(&mut self) -> StoreResult<()>;

    /// Discards the open transaction's writes.
    fn rollback(&mut self) -> StoreResult<()>;

    /// Finds or creates the constituency with this exact name, then writes
    /// each given party result over the existing entry for its code, or
    /// appends a new entry. Codes not mentioned keep their previous tally;
    /// nothing is ever deleted.
    fn upsert_constituency_with_party_results(
        &mut self,
        name: &str,
        results: &[PartyResult],
    ) -> StoreResult<Constituency>;
}
