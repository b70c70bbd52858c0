//! `segpatch` command line tool
//!
//! Reads a segment snapshot and edited form values as JSON, then prints or
//! submits the resulting PATCH body.

mod tracing_init;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use segpatch_client::{EditOutcome, HttpPatchSender, PatchClientConfig, SegmentEditor};
use segpatch_core::{accumulate_segment_changes, PatchSession, SegmentForm, SegmentSnapshot};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "segpatch", version, about = "Compute and submit segment PATCH instructions")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the PATCH body for an edit without sending it
    Diff {
        #[command(flatten)]
        input: EditInput,

        /// Pretty-print the JSON body
        #[arg(long)]
        pretty: bool,
    },

    /// Send the PATCH for an edit
    Submit {
        #[command(flatten)]
        input: EditInput,

        /// Client configuration (TOML)
        #[arg(long)]
        config: PathBuf,
    },
}

#[derive(Debug, Args)]
struct EditInput {
    /// Segment snapshot as fetched from the backend (JSON)
    #[arg(long)]
    snapshot: PathBuf,

    /// Edited form values (JSON)
    #[arg(long)]
    form: PathBuf,
}

impl EditInput {
    fn load(&self) -> Result<(SegmentSnapshot, SegmentForm)> {
        let snapshot: SegmentSnapshot = read_json(&self.snapshot)?;
        let form: SegmentForm = read_json(&self.form)?;
        tracing::debug!(
            segment = %snapshot.identifier,
            rules = snapshot.rules.len(),
            edited_rules = form.rules.len(),
            "loaded edit input"
        );
        Ok((snapshot, form))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("cannot parse {}", path.display()))
}

fn diff(input: &EditInput, pretty: bool) -> Result<String> {
    let (snapshot, form) = input.load()?;
    let mut session = PatchSession::new();
    accumulate_segment_changes(&mut session, &snapshot, &form)?;

    let payload = session.pending().clone().into_payload();
    let body = if pretty {
        serde_json::to_string_pretty(&payload)?
    } else {
        serde_json::to_string(&payload)?
    };
    Ok(body)
}

async fn submit(input: &EditInput, config: &Path) -> Result<()> {
    let (snapshot, form) = input.load()?;
    let config = PatchClientConfig::load(config)?;
    let mut editor = SegmentEditor::new(HttpPatchSender::new(config)?);

    match editor.submit(&snapshot, &form).await {
        Ok(EditOutcome::NoChanges) => println!("no changes to save"),
        Ok(EditOutcome::Saved { instructions, .. }) => {
            println!("saved {} ({} instructions)", snapshot.identifier, instructions.len());
        }
        Err(e) => anyhow::bail!("{}", e.user_message()),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_init::init_tracing(cli.log_json);

    match &cli.command {
        Command::Diff { input, pretty } => println!("{}", diff(input, *pretty)?),
        Command::Submit { input, config } => submit(input, config).await?,
    }
    Ok(())
}
