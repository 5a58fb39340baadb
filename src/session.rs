//! Mailbox session: one connection, one selected folder

use crate::config::ImapConfig;
use crate::connection::{self, ImapSession};
use crate::error::{Error, Result};
use async_imap::types::Fetch;
use futures::TryStreamExt;
use tracing::{debug, info, warn};

/// A logged-in session with the configured mailbox selected.
pub struct MailboxSession {
    session: ImapSession,
    mailbox: String,
}

impl MailboxSession {
    /// Connect, log in and SELECT the configured mailbox.
    ///
    /// # Errors
    ///
    /// Returns an error if connecting, logging in or selecting fails.
    pub async fn open(config: &ImapConfig) -> Result<Self> {
        let mut session = connection::connect(config).await?;
        if let Err(e) = connection::select(&mut session, &config.mailbox).await {
            session.logout().await.ok();
            return Err(e);
        }

        Ok(Self {
            session,
            mailbox: config.mailbox.clone(),
        })
    }

    #[must_use]
    pub fn mailbox(&self) -> &str {
        &self.mailbox
    }

    /// UIDs of every message in the mailbox, ascending.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Imap`] if the search fails.
    pub async fn search_all(&mut self) -> Result<Vec<u32>> {
        let uids = self
            .session
            .uid_search("ALL")
            .await
            .map_err(|e| Error::Imap(format!("Search failed: {e}")))?;

        let mut uid_list: Vec<u32> = uids.into_iter().collect();
        uid_list.sort_unstable();
        Ok(uid_list)
    }

    /// Fetch the complete raw message without setting `\Seen`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Imap`] if the fetch fails or the server returns
    /// no body for `uid`.
    pub async fn fetch_raw(&mut self, uid: u32) -> Result<Vec<u8>> {
        let messages: Vec<Fetch> = self
            .session
            .uid_fetch(uid.to_string(), "(UID BODY.PEEK[])")
            .await
            .map_err(|e| Error::Imap(format!("Fetch failed: {e}")))?
            .try_collect()
            .await
            .map_err(|e| Error::Imap(format!("Fetch error: {e}")))?;

        messages
            .iter()
            .find_map(Fetch::body)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| Error::Imap(format!("No body found for UID {uid}")))
    }

    /// Flag a message `\Deleted`. It stays in the mailbox until
    /// [`close`](Self::close).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Imap`] if the STORE fails.
    pub async fn mark_deleted(&mut self, uid: u32) -> Result<()> {
        let updates: Vec<Fetch> = self
            .session
            .uid_store(uid.to_string(), "+FLAGS (\\Deleted)")
            .await
            .map_err(|e| Error::Imap(format!("Store failed for UID {uid}: {e}")))?
            .try_collect()
            .await
            .map_err(|e| Error::Imap(format!("Store error for UID {uid}: {e}")))?;

        debug!("Flagged UID {} as deleted ({} updates)", uid, updates.len());
        Ok(())
    }

    /// CLOSE the mailbox, expunging every `\Deleted` message, then log
    /// out.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Imap`] if the CLOSE fails. LOGOUT is attempted
    /// either way.
    pub async fn close(mut self) -> Result<()> {
        let closed = self
            .session
            .close()
            .await
            .map_err(|e| Error::Imap(format!("Failed to close {}: {e}", self.mailbox)));

        if let Err(e) = self.session.logout().await {
            warn!("Logout failed: {}", e);
        }

        closed?;
        info!("Closed {}", self.mailbox);
        Ok(())
    }

    /// Log out without CLOSE, so nothing flagged during this session is
    /// expunged by it.
    pub async fn abandon(mut self) {
        if let Err(e) = self.session.logout().await {
            warn!("Logout failed: {}", e);
        }
    }
}
