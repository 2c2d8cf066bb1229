//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::core::filter::{ModelFilter, SortDirection, SortField};
use crate::core::models::ModelCapability;

/// modelsync - AI provider keys and a cached model catalog.
#[derive(Parser, Debug)]
#[command(name = "modelsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // === Global flags ===
    /// Output format
    #[arg(long, value_enum, default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Shorthand for --format json
    #[arg(long, global = true)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log level
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Emit JSONL logs to stderr
    #[arg(long, global = true)]
    pub json_output: bool,

    /// Verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// HTTP timeout in seconds
    #[arg(long, value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,

    /// Config file path
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Resolve the effective output format.
    #[must_use]
    pub const fn effective_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List known providers and whether a key is stored
    Providers,

    /// Manage provider API keys
    #[command(subcommand)]
    Keys(KeysCommand),

    /// Browse cached models (fetching when stale)
    Models(ModelsArgs),

    /// Refresh every provider whose cache is stale
    Refresh,

    /// Inspect or manage the model cache
    #[command(subcommand)]
    Cache(CacheCommand),

    /// Delete all stored keys and cached models
    Reset,
}

/// `keys` subcommands.
#[derive(Subcommand, Debug)]
pub enum KeysCommand {
    /// Store an API key (verified against the provider unless --no-verify)
    Add {
        /// Provider id (e.g. openai, anthropic)
        provider: String,
        /// The API key
        key: String,
        /// Store without a verification round-trip
        #[arg(long)]
        no_verify: bool,
    },

    /// List stored keys (masked)
    List,

    /// Remove a stored key and its cached models
    Remove {
        /// Provider id
        provider: String,
    },

    /// Re-verify a stored key
    Verify {
        /// Provider id
        provider: String,
    },
}

/// `cache` subcommands.
#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Show per-provider cache age and freshness
    Status,

    /// Clear the cache (all providers, or one)
    Clear {
        /// Only clear this provider
        #[arg(long, value_name = "PROVIDER")]
        provider: Option<String>,
    },

    /// Seed built-in models for providers without cached data
    Init,
}

/// Arguments for the `models` command.
#[derive(Args, Debug, Default)]
pub struct ModelsArgs {
    /// Only this provider (fetches when its cache is stale)
    #[arg(long, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Bypass the cache (requires --provider)
    #[arg(long, requires = "provider")]
    pub refresh: bool,

    /// Case-insensitive substring of model id or name
    #[arg(long, value_name = "TEXT")]
    pub name: Option<String>,

    /// Require a capability (repeatable; any listed capability matches)
    #[arg(long = "capability", value_name = "CAPABILITY")]
    pub capabilities: Vec<ModelCapability>,

    /// Minimum context window in tokens
    #[arg(long, value_name = "TOKENS")]
    pub min_context: Option<u64>,

    /// Maximum input price (USD per million tokens)
    #[arg(long, value_name = "USD")]
    pub max_input_cost: Option<f64>,

    /// Maximum output price (USD per million tokens)
    #[arg(long, value_name = "USD")]
    pub max_output_cost: Option<f64>,

    /// Include deprecated models
    #[arg(long)]
    pub show_deprecated: bool,

    /// Sort field (name, provider, context-length, input-cost, output-cost)
    #[arg(long, value_name = "FIELD", default_value = "name")]
    pub sort: SortField,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Page number (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Models per page
    #[arg(long, default_value_t = 20)]
    pub page_size: usize,
}

impl ModelsArgs {
    /// Filter criteria from the flags.
    #[must_use]
    pub fn filter(&self) -> ModelFilter {
        ModelFilter {
            name: self.name.clone(),
            providers: self.provider.iter().cloned().collect(),
            capabilities: self.capabilities.clone(),
            min_context_length: self.min_context,
            max_input_cost: self.max_input_cost,
            max_output_cost: self.max_output_cost,
            show_deprecated: self.show_deprecated,
        }
    }

    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        if self.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    #[default]
    Human,
    /// JSON output for scripts and agents
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_overrides_format() {
        let cli = Cli::parse_from(["modelsync", "--json", "providers"]);
        assert_eq!(cli.effective_format(), OutputFormat::Json);

        let cli = Cli::parse_from(["modelsync", "providers"]);
        assert_eq!(cli.effective_format(), OutputFormat::Human);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["modelsync", "refresh", "--timeout", "5", "--pretty"]);
        assert_eq!(cli.timeout, Some(5));
        assert!(cli.pretty);
        assert!(matches!(cli.command, Some(Commands::Refresh)));
    }

    #[test]
    fn keys_add_parses() {
        let cli = Cli::parse_from(["modelsync", "keys", "add", "openai", "sk-abc", "--no-verify"]);
        match cli.command {
            Some(Commands::Keys(KeysCommand::Add {
                provider,
                key,
                no_verify,
            })) => {
                assert_eq!(provider, "openai");
                assert_eq!(key, "sk-abc");
                assert!(no_verify);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn models_flags_build_filter() {
        let cli = Cli::parse_from([
            "modelsync",
            "models",
            "--provider",
            "openai",
            "--capability",
            "vision",
            "--capability",
            "function-calling",
            "--min-context",
            "100000",
            "--sort",
            "input-cost",
            "--desc",
            "--page-size",
            "5",
        ]);
        let Some(Commands::Models(args)) = cli.command else {
            panic!("expected models command");
        };
        let filter = args.filter();
        assert_eq!(filter.providers, vec!["openai".to_string()]);
        assert_eq!(
            filter.capabilities,
            vec![ModelCapability::Vision, ModelCapability::FunctionCalling]
        );
        assert_eq!(filter.min_context_length, Some(100_000));
        assert_eq!(args.sort, SortField::InputCost);
        assert_eq!(args.direction(), SortDirection::Desc);
        assert_eq!(args.page, 1);
        assert_eq!(args.page_size, 5);
    }

    #[test]
    fn refresh_requires_provider() {
        assert!(Cli::try_parse_from(["modelsync", "models", "--refresh"]).is_err());
    }

    #[test]
    fn unknown_capability_rejected() {
        assert!(Cli::try_parse_from(["modelsync", "models", "--capability", "telepathy"]).is_err());
    }
}
