//! CLI command definitions and argument parsing.

use crate::error::Result;
use clap::{Args, Parser, Subcommand};
use sift_domain::Schema;
use std::fs;
use std::path::PathBuf;

/// Sift - Recover structured records from free-form model output.
#[derive(Debug, Parser)]
#[command(name = "sift")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// JSON format (default)
    Json,
    /// Table format
    Table,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Recover a single record from a model response
    Recover(RecoverArgs),

    /// Recover one record per tenant from a batch response
    Batch(BatchArgs),

    /// Recover records from many responses concurrently and report strategy usage
    Replay(ReplayArgs),

    /// List built-in schemas
    Schemas,

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Schema selection shared by recovery commands.
#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Built-in schema
    #[arg(short, long, value_enum)]
    pub schema: Option<SchemaArg>,

    /// Custom schema TOML file
    #[arg(long, conflicts_with = "schema")]
    pub schema_file: Option<PathBuf>,
}

impl SchemaArgs {
    /// Resolve the selected schema, falling back to `fallback`.
    pub fn resolve(&self, fallback: SchemaArg) -> Result<Schema> {
        match &self.schema_file {
            Some(path) => Ok(Schema::from_toml(&fs::read_to_string(path)?)?),
            None => Ok(self.schema.unwrap_or(fallback).into()),
        }
    }
}

/// Arguments for the recover command.
#[derive(Debug, Parser)]
pub struct RecoverArgs {
    /// File containing the raw model response (stdin if omitted)
    #[arg(long)]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub schema: SchemaArgs,
}

/// Arguments for the batch command.
#[derive(Debug, Parser)]
pub struct BatchArgs {
    /// File containing the raw model response (stdin if omitted)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Number of tenants the response should cover
    #[arg(short = 'n', long, default_value = "1")]
    pub expected: usize,

    #[command(flatten)]
    pub schema: SchemaArgs,
}

/// Arguments for the replay command.
#[derive(Debug, Parser)]
pub struct ReplayArgs {
    /// Response files to process
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub schema: SchemaArgs,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Built-in schema argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SchemaArg {
    /// Single payment screenshot
    Upi,
    /// Bank statement matched against one transaction
    Bank,
    /// Bank statement matched against many tenants
    BankMatch,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Table => crate::config::OutputFormat::Table,
        }
    }
}

impl From<SchemaArg> for Schema {
    fn from(schema: SchemaArg) -> Self {
        match schema {
            SchemaArg::Upi => Schema::upi_transaction(),
            SchemaArg::Bank => Schema::bank_statement(),
            SchemaArg::BankMatch => Schema::bank_statement_match(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recover_command() {
        let cli = Cli::parse_from(["sift", "recover", "--file", "response.txt", "-s", "bank"]);
        match cli.command {
            Command::Recover(args) => {
                assert_eq!(args.file, Some(PathBuf::from("response.txt")));
                assert_eq!(args.schema.schema, Some(SchemaArg::Bank));
            }
            _ => panic!("Expected Recover command"),
        }
    }

    #[test]
    fn test_batch_command() {
        let cli = Cli::parse_from(["sift", "batch", "-n", "3", "--schema", "bank-match"]);
        match cli.command {
            Command::Batch(args) => {
                assert_eq!(args.expected, 3);
                assert_eq!(args.schema.schema, Some(SchemaArg::BankMatch));
            }
            _ => panic!("Expected Batch command"),
        }
    }

    #[test]
    fn test_replay_requires_files() {
        assert!(Cli::try_parse_from(["sift", "replay"]).is_err());
        let cli = Cli::parse_from(["sift", "-vv", "replay", "a.txt", "b.txt"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Replay(ref args) if args.files.len() == 2));
    }

    #[test]
    fn test_schema_and_schema_file_conflict() {
        let result = Cli::try_parse_from([
            "sift", "recover", "--schema", "upi", "--schema-file", "custom.toml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_schema_resolution_fallback() {
        let args = SchemaArgs {
            schema: None,
            schema_file: None,
        };
        let schema = args.resolve(SchemaArg::BankMatch).unwrap();
        assert_eq!(schema.index_field(), Some("tenant_id"));
    }

    #[test]
    fn test_format_conversion() {
        let format: crate::config::OutputFormat = CliFormat::Table.into();
        assert_eq!(format, crate::config::OutputFormat::Table);
    }
}
