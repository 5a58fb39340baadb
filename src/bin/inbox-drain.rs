#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! CLI that saves every attachment in an IMAP inbox to disk

use anyhow::Context;
use clap::Parser;
use inbox_drain::RunConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "inbox-drain")]
#[command(
    about = "Download the attachments of every message in an IMAP inbox into per-subject folders"
)]
struct Args {
    /// Path to the email config file
    #[arg(short, long, default_value = "./email.conf")]
    config: PathBuf,

    /// Path to the output directory
    #[arg(short, long, default_value = "./out")]
    output: PathBuf,

    /// Do not delete emails after their attachments are saved
    #[arg(long)]
    no_delete: bool,
}

impl From<Args> for RunConfig {
    fn from(args: Args) -> Self {
        Self {
            config_path: args.config,
            output_dir: args.output,
            delete_after_parse: !args.no_delete,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let options = RunConfig::from(Args::parse());

    let summary = inbox_drain::run(&options)
        .await
        .with_context(|| format!("Failed to drain mailbox into {}", options.output_dir.display()))?;

    println!(
        "{} message(s) processed, {} attachment(s) saved, {} deleted",
        summary.processed,
        summary.attachments.len(),
        summary.deleted.len()
    );

    Ok(())
}
