//! Clap derive structures for the `impact` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// impact -- browse H-index leaderboards from the command line
#[derive(Debug, Parser)]
#[command(
    name = "impact",
    version,
    about = "Browse Impact Index leaderboards from the command line",
    long_about = "Query an Impact Index backend: list the tracked sites, page through a\n\
        site's ranking, look up a single profile, or search identifiers.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "IMPACT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'b', env = "IMPACT_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "IMPACT_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "IMPACT_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "IMPACT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Ranking column to sort the fetched page by.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortColumn {
    /// H-index score
    Index,
    /// Total counted metrics
    Metrics,
    /// Identifier, alphabetically
    Identifier,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List and inspect leaderboard sites
    #[command(alias = "s")]
    Sites(SitesArgs),

    /// Show one page of a site's leaderboard
    #[command(alias = "rank", alias = "r")]
    Ranking(RankingArgs),

    /// Look up a single profile on a site
    #[command(alias = "user")]
    Profile(ProfileArgs),

    /// Search a site's identifiers by prefix
    Search(SearchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Sites ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SitesArgs {
    #[command(subcommand)]
    pub command: SitesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SitesCommand {
    /// List every site the backend tracks
    #[command(alias = "ls")]
    List {
        /// Case-insensitive substring match on the site name
        #[arg(long, short = 'f')]
        filter: Option<String>,
    },

    /// Show a site's description, statistics, and distribution
    Show {
        /// Site name
        site: String,
    },
}

// ── Ranking ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RankingArgs {
    /// Site name
    pub site: String,

    /// Page number (1-based)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Rows per page (1-100, overrides profile)
    #[arg(long, short = 'n', value_parser = clap::value_parser!(u32).range(1..=100))]
    pub per_page: Option<u32>,

    /// Sort the page by this column
    #[arg(long, short = 's', default_value = "index")]
    pub sort: SortColumn,

    /// Sort ascending instead of descending
    #[arg(long)]
    pub asc: bool,

    /// Keep only rows whose identifier contains this text
    #[arg(long)]
    pub search: Option<String>,
}

// ── Profile ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// Site name
    pub site: String,

    /// Account identifier on that site
    pub identifier: String,
}

// ── Search ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Site name
    pub site: String,

    /// Identifier prefix to look for
    pub query: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
