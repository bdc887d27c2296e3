use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "lexica",
    about = "Lexica — terminology release import and axiom aggregation",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import a release and optionally run the aggregation pass
    Import(ImportArgs),
    /// Import a release and report per-subject annotation statistics
    Stats(StatsArgs),
    /// Import a release and dump one subject's annotation records
    Show(ShowArgs),
}

/// Where the release content lives. With no entry the release is a plain
/// file; with `--entry` it is an archive entry; adding `--outer` makes it
/// an entry of the embedded archive named by `--outer`.
#[derive(Args)]
pub struct ReleaseArgs {
    /// Path to the release file or archive
    pub release: String,

    /// Name of the release entry inside the archive
    #[arg(long)]
    pub entry: Option<String>,

    /// Name of the embedded archive holding the entry
    #[arg(long, requires = "entry")]
    pub outer: Option<String>,
}

#[derive(Args)]
pub struct ImportArgs {
    #[command(flatten)]
    pub release: ReleaseArgs,

    /// Aggregate these subjects (legacy numeric identifiers) after import
    #[arg(long = "subject")]
    pub subjects: Vec<String>,

    /// Aggregate every subject after import
    #[arg(long, conflicts_with = "subjects")]
    pub aggregate_all: bool,
}

#[derive(Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub release: ReleaseArgs,
}

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub release: ReleaseArgs,

    /// Legacy numeric identifier of the subject to dump
    pub subject: String,
}
