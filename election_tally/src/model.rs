// ********* Parsed data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A single vote tally for one party, as it appeared on a result line.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PartyResult {
    pub party_code: String,
    pub votes: u64,
}

/// One successfully parsed result line.
///
/// The name is non-empty and there is at least one party result. The
/// results keep the order of the line. A line may list the same party code
/// twice; both entries are kept here and the later one wins when the row is
/// upserted into a store.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedRow {
    pub constituency_name: String,
    pub party_results: Vec<PartyResult>,
}

/// The reasons a single result line can be rejected.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum LineError {
    EmptyName,
    /// The fields after the name could not be grouped into vote,code pairs.
    OddTokenCount { tokens: usize },
    /// A vote field is not a base-10 non-negative integer.
    InvalidVotes { text: String },
    EmptyPartyCode,
    NoPartyResults,
}

impl Error for LineError {}

impl Display for LineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineError::EmptyName => write!(f, "Empty constituency name"),
            LineError::OddTokenCount { tokens } => write!(
                f,
                "Expected even number of vote,party-code pairs (got {} token(s))",
                tokens
            ),
            LineError::InvalidVotes { text } => write!(f, "Invalid votes: {}", text),
            LineError::EmptyPartyCode => write!(f, "Empty party code"),
            LineError::NoPartyResults => write!(f, "At least one party result required"),
        }
    }
}

/// A rejected line: its 1-based position in the file, the trimmed text as
/// it was read, and the reason it was rejected.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParseError {
    pub line_number: usize,
    pub line: String,
    pub error: LineError,
}

impl ParseError {
    /// The human-readable reason, as surfaced to the caller of an import.
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

/// Everything a file parse produced: the rows that parsed and the lines
/// that did not.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ParseOutcome {
    pub ok: Vec<ParsedRow>,
    pub errors: Vec<ParseError>,
}

// ********* Stored data structures ***********

/// Opaque identifier handed out by a store when a constituency is first
/// created. Stable across subsequent imports.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct ConstituencyId(pub u64);

impl Display for ConstituencyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted constituency.
///
/// The name is unique within a store and the party results hold at most one
/// entry per party code, in the order the codes were first seen.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Constituency {
    pub id: ConstituencyId,
    pub name: String,
    pub party_results: Vec<PartyResult>,
}

/// What an import returns: the number of rows committed and the per-line
/// rejections. Rejections never abort an import.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ImportOutcome {
    pub imported: usize,
    pub errors: Vec<ParseError>,
}

// ********* View data structures ***********

/// One party's line in a constituency view.
#[derive(PartialEq, Debug, Clone)]
pub struct ConstituencyParty {
    pub party_code: String,
    pub party_name: String,
    pub votes: u64,
    /// Share of the constituency total, rounded to one decimal place.
    pub share_percent: f64,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct WinningParty {
    pub code: String,
    pub name: String,
}

/// Read model for a single constituency.
#[derive(PartialEq, Debug, Clone)]
pub struct ConstituencyView {
    pub id: ConstituencyId,
    pub name: String,
    pub parties: Vec<ConstituencyParty>,
    /// `None` only when the constituency has no party results at all.
    pub winning_party: Option<WinningParty>,
}

/// One party's nationwide line: summed votes across every constituency and
/// the number of seats won.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PartyTotals {
    pub party_code: String,
    pub party_name: String,
    pub total_votes: u64,
    pub seats: u64,
}

/// Nationwide read model. Parties are sorted by code.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TotalsView {
    pub parties: Vec<PartyTotals>,
}
