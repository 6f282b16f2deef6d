use std::fs;

use log::{info, warn};

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use snafu::{prelude::*, Snafu};
use text_diff::print_diff;

use election_tally::{
    compute_totals, constituency_view, import_file, ConstituencyStore, ImportError, ImportOutcome,
    PartyRegistry, StoreError,
};

use crate::args::Args;

pub mod store_file;
pub mod store_mem;
pub mod summary;

use self::store_file::FileStore;
use self::store_mem::MemoryStore;

#[derive(Debug, Snafu)]
pub enum AppError {
    #[snafu(display("Error opening results file {path}"))]
    OpeningInput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening parties file {path}"))]
    OpeningParties {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing parties file {path}"))]
    ParsingParties {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error opening reference summary {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing reference summary {path}"))]
    ParsingReference {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error writing summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("{source}"))]
    Store { source: StoreError },
    #[snafu(display("{source}"))]
    Import { source: ImportError },
    #[snafu(display("Constituency not found: {name}"))]
    ConstituencyNotFound { name: String },
    #[snafu(display("Error rendering the summary document"))]
    RenderingSummary { source: serde_json::Error },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},
}

pub type AppResult<T> = Result<T, AppError>;

/// One record of the `--parties` file.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct PartyDef {
    pub code: String,
    pub name: String,
}

fn load_registry(path: Option<&str>) -> AppResult<PartyRegistry> {
    match path {
        None => Ok(PartyRegistry::uk_default()),
        Some(p) => {
            let contents = fs::read_to_string(p).context(OpeningPartiesSnafu { path: p })?;
            let defs: Vec<PartyDef> =
                serde_json::from_str(&contents).context(ParsingPartiesSnafu { path: p })?;
            info!("loaded {} party definition(s) from {}", defs.len(), p);
            let mut registry = PartyRegistry::new();
            for def in defs.iter() {
                registry.register(&def.code, &def.name);
            }
            Ok(registry)
        }
    }
}

pub fn run(args: &Args) -> AppResult<()> {
    match args.store.as_deref() {
        Some(path) => {
            let store = FileStore::open(path).context(StoreSnafu)?;
            run_with_store(args, store)
        }
        None => run_with_store(args, MemoryStore::new()),
    }
}

fn run_with_store<S: ConstituencyStore>(args: &Args, mut store: S) -> AppResult<()> {
    let registry = load_registry(args.parties.as_deref())?;

    let outcome = match args.input.as_deref() {
        Some(path) => {
            let content = fs::read(path).context(OpeningInputSnafu { path })?;
            info!("importing results from {}", path);
            import_file(&mut store, &content).context(ImportSnafu)?
        }
        None => ImportOutcome {
            imported: 0,
            errors: Vec::new(),
        },
    };
    info!(
        "imported {} row(s), {} line(s) rejected",
        outcome.imported,
        outcome.errors.len()
    );

    let document = match args.constituency.as_deref() {
        Some(name) => {
            let constituency = store
                .find_by_name(name)
                .context(StoreSnafu)?
                .context(ConstituencyNotFoundSnafu { name })?;
            summary::constituency_to_js(&constituency_view(&constituency, &registry))
        }
        None => {
            let all = store.find_all().context(StoreSnafu)?;
            let views: Vec<_> = all.iter().map(|c| constituency_view(c, &registry)).collect();
            let totals = compute_totals(&all, &registry);
            summary::build_summary_js(&outcome, &views, &totals)
        }
    };

    let rendered = serde_json::to_string_pretty(&document).context(RenderingSummarySnafu)?;
    write_summary(args.out.as_deref(), &rendered)?;

    if let Some(reference_path) = args.reference.as_deref() {
        check_reference(reference_path, &rendered)?;
    }
    Ok(())
}

fn write_summary(out: Option<&str>, rendered: &str) -> AppResult<()> {
    match out {
        None | Some("stdout") => {
            println!("{}", rendered);
            Ok(())
        }
        Some(path) => fs::write(path, rendered).context(WritingSummarySnafu { path }),
    }
}

/// Compares the produced summary against a reference document, printing a
/// diff of the two pretty-printed forms on mismatch.
fn check_reference(path: &str, rendered: &str) -> AppResult<()> {
    let contents = fs::read_to_string(path).context(OpeningReferenceSnafu { path })?;
    let reference: JSValue =
        serde_json::from_str(&contents).context(ParsingReferenceSnafu { path })?;
    let pretty_reference =
        serde_json::to_string_pretty(&reference).context(RenderingSummarySnafu)?;
    if pretty_reference != rendered {
        warn!("Found differences with the reference summary");
        print_diff(pretty_reference.as_str(), rendered, "\n");
        return ReferenceMismatchSnafu {}.fail();
    }
    Ok(())
}
