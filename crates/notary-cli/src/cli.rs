use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "notary", about = "NotaryChain read-only ledger tools", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the read-only ledger API over HTTP
    Serve(ServeArgs),
    /// Resolve an API path against a ledger file and print the response
    Resolve(ResolveArgs),
    /// Write a demonstration ledger file
    Seed(SeedArgs),
    /// Encode or decode big-integer frames
    Int(IntArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Listen address; overrides the configuration file
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Ledger file; overrides the configuration file
    #[arg(long)]
    pub ledger: Option<PathBuf>,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Request path, e.g. /v1/blocks/100/entries/0.json
    pub path: String,
    /// Accept header value; may be repeated
    #[arg(short, long)]
    pub accept: Vec<String>,
    #[arg(long)]
    pub ledger: PathBuf,
}

#[derive(Args)]
pub struct SeedArgs {
    #[arg(short, long)]
    pub out: PathBuf,
    #[arg(long, default_value = "100")]
    pub start_id: u64,
    #[arg(long, default_value = "3")]
    pub blocks: u64,
    #[arg(long, default_value = "2")]
    pub entries: u32,
}

#[derive(Args)]
pub struct IntArgs {
    #[command(subcommand)]
    pub action: IntAction,
}

#[derive(Subcommand)]
pub enum IntAction {
    /// Print the frame for a decimal integer as hex
    Encode {
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Decode a hex frame back to a decimal integer
    Decode { hex: String },
}
