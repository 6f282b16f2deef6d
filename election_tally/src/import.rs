use std::error::Error;
use std::fmt::Display;

use log::{debug, info, warn};

use crate::model::ImportOutcome;
use crate::parse::parse_file;
use crate::store::{ConstituencyStore, StoreError};

/// Failure of the import pipeline itself.
///
/// Per-line parse rejections are not errors at this level; they travel in
/// the [`ImportOutcome`]. An `ImportError` means the store misbehaved and
/// none of the file's rows were persisted.
#[derive(Debug)]
pub enum ImportError {
    /// A row could not be upserted; the transaction has been rolled back.
    Upsert {
        constituency: String,
        source: StoreError,
    },
    /// The store failed to open or close the transaction.
    Transaction {
        operation: &'static str,
        source: StoreError,
    },
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ImportError::Upsert { source, .. } => Some(source),
            ImportError::Transaction { source, .. } => Some(source),
        }
    }
}

impl Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Upsert {
                constituency,
                source,
            } => write!(f, "Import failed upserting '{}': {}", constituency, source),
            ImportError::Transaction { operation, source } => {
                write!(f, "Import failed to {} the transaction: {}", operation, source)
            }
        }
    }
}

/// Open transaction handle. Dropping it without a commit rolls the store
/// back, so every exit path out of the pipeline releases the transaction.
struct Tx<'a, S: ConstituencyStore> {
    store: &'a mut S,
    committed: bool,
}

impl<'a, S: ConstituencyStore> Tx<'a, S> {
    fn begin(store: &'a mut S) -> Result<Tx<'a, S>, ImportError> {
        store.begin().map_err(|source| ImportError::Transaction {
            operation: "begin",
            source,
        })?;
        Ok(Tx {
            store,
            committed: false,
        })
    }

    fn commit(mut self) -> Result<(), ImportError> {
        self.committed = true;
        self.store.commit().map_err(|source| ImportError::Transaction {
            operation: "commit",
            source,
        })
    }
}

impl<S: ConstituencyStore> Drop for Tx<'_, S> {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(err) = self.store.rollback() {
                warn!("rollback after a failed import also failed: {}", err);
            }
        }
    }
}

/// Imports one results file into the store.
///
/// The content is decoded as UTF-8 and parsed line by line; rejected lines
/// are returned as data and never abort the import. The parsed rows are
/// then upserted in file order inside a single transaction: either every
/// row commits or, on the first store failure, the transaction is rolled
/// back and the failure surfaces as an [`ImportError`]. A file with no
/// valid rows never opens a transaction.
pub fn import_file<S: ConstituencyStore>(
    store: &mut S,
    content: &[u8],
) -> Result<ImportOutcome, ImportError> {
    let text = String::from_utf8_lossy(content);
    let outcome = parse_file(&text);
    info!(
        "import: {} parsed row(s), {} rejected line(s)",
        outcome.ok.len(),
        outcome.errors.len()
    );

    if !outcome.ok.is_empty() {
        let tx = Tx::begin(store)?;
        for row in &outcome.ok {
            debug!("upserting {:?}", row.constituency_name);
            tx.store
                .upsert_constituency_with_party_results(&row.constituency_name, &row.party_results)
                .map_err(|source| ImportError::Upsert {
                    constituency: row.constituency_name.clone(),
                    source,
                })?;
        }
        tx.commit()?;
    }

    Ok(ImportOutcome {
        imported: outcome.ok.len(),
        errors: outcome.errors,
    })
}
