use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "docdb",
    about = "docdb: embedded JSON document store",
    version = docdb_store::VERSION,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Store root directory
    #[arg(long, global = true, env = "DOCDB_ROOT", default_value = "./store")]
    pub root: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store a JSON object as a new document
    Write(WriteArgs),
    /// Show one document
    Read(DocArgs),
    /// Show every document in a collection
    ReadAll(CollectionArgs),
    /// Delete one document
    Delete(DocArgs),
    /// Delete a collection and all its documents
    DeleteAll(CollectionArgs),
    /// Write the sample users and read them back
    Demo,
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    pub collection: String,
    /// JSON object to store, or `-` to read it from stdin
    pub json: String,
}

#[derive(Args, Debug)]
pub struct DocArgs {
    pub collection: String,
    pub id: String,
}

#[derive(Args, Debug)]
pub struct CollectionArgs {
    pub collection: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_write() {
        let cli = Cli::try_parse_from(["docdb", "write", "users", "{\"name\":\"kosi\"}"]).unwrap();
        match cli.command {
            Command::Write(args) => {
                assert_eq!(args.collection, "users");
                assert_eq!(args.json, "{\"name\":\"kosi\"}");
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "docdb", "read-all", "users", "--root", "/tmp/db", "--format", "json", "-v",
        ])
        .unwrap();
        assert_eq!(cli.root, PathBuf::from("/tmp/db"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::ReadAll(ref a) if a.collection == "users"));
    }

    #[test]
    fn version_flag_reports_store_version() {
        let err = Cli::try_parse_from(["docdb", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
        assert!(err.to_string().contains(docdb_store::VERSION));
    }

    #[test]
    fn delete_requires_id() {
        assert!(Cli::try_parse_from(["docdb", "delete", "users"]).is_err());
    }
}
