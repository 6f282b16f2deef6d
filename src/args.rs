use clap::Parser;

/// This is an election results import and tallying program.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The results file to import. One constituency per line: the
    /// constituency name followed by vote,party-code pairs, all comma-separated. A backslash
    /// in front of a comma escapes it inside a name.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (file path, optional) The JSON store holding previously imported results. It is created
    /// on the first successful import if it does not exist. Without this option the import runs
    /// against an in-memory store that lives for this invocation only.
    #[clap(short, long, value_parser)]
    pub store: Option<String>,

    /// (file path, optional) A JSON list of {"code", "name"} records replacing the built-in
    /// party display names.
    #[clap(short, long, value_parser)]
    pub parties: Option<String>,

    /// (name, optional) Print the view of a single constituency instead of the full summary.
    /// The lookup happens after the import, if one was requested.
    #[clap(short, long, value_parser)]
    pub constituency: Option<String>,

    /// (file path, 'stdout' or empty) Where to write the JSON summary of the import and the
    /// aggregated views. Defaults to stdout.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path, optional) A reference summary in JSON format. If provided, eltally will
    /// check that the produced summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
