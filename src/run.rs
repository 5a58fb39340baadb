//! A complete pass over the mailbox

use crate::config::{ImapConfig, RunConfig};
use crate::error::Result;
use crate::message;
use crate::output;
use crate::session::MailboxSession;
use crate::writer::AttachmentWriter;
use std::path::PathBuf;
use tracing::{info, warn};

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Messages whose attachments were handled.
    pub processed: usize,
    /// Messages that could not be fetched or decoded and were left
    /// untouched.
    pub skipped: Vec<u32>,
    /// UIDs flagged `\Deleted` and expunged on close.
    pub deleted: Vec<u32>,
    /// Every file written.
    pub attachments: Vec<PathBuf>,
}

/// Validate the output directory, load the connection config and drain
/// the mailbox.
///
/// # Errors
///
/// Fails if the output directory cannot be created, the config cannot
/// be loaded, or [`drain`] fails.
pub async fn run(options: &RunConfig) -> Result<RunSummary> {
    output::ensure_root(&options.output_dir).await?;
    let config = ImapConfig::from_file(&options.config_path)?;
    drain(&config, options).await
}

/// Save the attachments of every message in the mailbox and, when
/// `delete_after_parse` is set, delete the messages.
///
/// Connection, SELECT and SEARCH failures abort the run. A message
/// that cannot be fetched or decoded is logged and skipped. A write
/// failure aborts the run; in that case the session is logged out
/// without CLOSE so nothing is expunged.
///
/// # Errors
///
/// Returns the first fatal error.
pub async fn drain(config: &ImapConfig, options: &RunConfig) -> Result<RunSummary> {
    let mut session = MailboxSession::open(config).await?;

    match process_all(&mut session, options).await {
        Ok(summary) => {
            session.close().await?;
            info!(
                "Done: {} processed, {} skipped, {} deleted, {} attachments",
                summary.processed,
                summary.skipped.len(),
                summary.deleted.len(),
                summary.attachments.len()
            );
            Ok(summary)
        }
        Err(e) => {
            session.abandon().await;
            Err(e)
        }
    }
}

async fn process_all(session: &mut MailboxSession, options: &RunConfig) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    let uids = session.search_all().await?;
    if uids.is_empty() {
        info!("No mail detected");
        return Ok(summary);
    }

    let writer = AttachmentWriter::new(&options.output_dir);
    info!(
        "Found {} messages in {}, saving attachments under {}",
        uids.len(),
        session.mailbox(),
        writer.root().display()
    );

    for uid in uids {
        let mail = match fetch_mail(session, uid).await {
            Ok(mail) => mail,
            Err(e) => {
                warn!("Skipping UID {}: {}", uid, e);
                summary.skipped.push(uid);
                continue;
            }
        };

        info!("Parsing {}", mail.subject.as_deref().unwrap_or("<no subject>"));
        let written = writer.write(&mail).await?;
        summary.attachments.extend(written);
        summary.processed += 1;

        if options.delete_after_parse {
            session.mark_deleted(uid).await?;
            summary.deleted.push(uid);
        }
    }

    Ok(summary)
}

async fn fetch_mail(session: &mut MailboxSession, uid: u32) -> Result<message::ParsedMail> {
    let raw = session.fetch_raw(uid).await?;
    message::decode(uid, &raw)
}
