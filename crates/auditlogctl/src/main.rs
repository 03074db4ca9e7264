use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use auditlogctl::cmd_decode;
use auditlogctl::cmd_render;
use auditlogctl::cmd_versions;
use auditlogctl::common::{DocumentArgs, AUTO_SCHEMA};

#[derive(Parser, Debug)]
#[command(name = "auditlogctl", version, about = "Audit-log configuration translator")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// Output JSON where applicable
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Document to read, `-` for stdin
    #[arg(long, short, default_value = "-")]
    input: PathBuf,
    /// Schema version (`1.7`, `urn:jboss:domain:1.7`) or `auto`
    #[arg(long, default_value = AUTO_SCHEMA)]
    schema: String,
    /// Treat the document as a domain host document
    #[arg(long)]
    host: bool,
    /// Address the audit subsystem lives under, e.g. `/core-service=management`
    #[arg(long)]
    base: Option<String>,
}

impl From<InputArgs> for DocumentArgs {
    fn from(args: InputArgs) -> Self {
        DocumentArgs {
            input: args.input,
            schema: args.schema,
            host: args.host,
            base: args.base,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the create operations a document decodes to
    Decode {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Decode, apply to a fresh model and write the canonical document
    Render {
        #[command(flatten)]
        input: InputArgs,
        /// Re-decode the output and fail if the operations changed
        #[arg(long)]
        check: bool,
    },
    /// List known schema versions
    Versions,
}

fn main() -> Result<()> {
    let Cli { verbose, json, cmd } = Cli::parse();

    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.into()),
        ))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cmd {
        Cmd::Decode { input } => cmd_decode::run(input.into(), json)?,
        Cmd::Render { input, check } => cmd_render::run(input.into(), check)?,
        Cmd::Versions => cmd_versions::run(json)?,
    };

    Ok(())
}
