//! IMAP attachment downloader
//!
//! Connects to an IMAP mailbox, saves the attachments of every message
//! into a folder named after the message subject, and optionally
//! deletes the processed messages. One call to [`run`] is one complete
//! pass over the mailbox.
//!
//! ```text
//! <output>/<Capitalized/Subject/Path>/<attachment file name>
//! <output>/error/...        subjects that are not safe paths
//! ```

mod connection;
mod error;
mod run;
mod session;
mod writer;

pub mod config;
pub mod message;
pub mod output;
pub mod sanitize;

pub use config::{AutoTls, ImapConfig, RunConfig, TlsOptions};
pub use connection::{ImapSession, MailStream, connect};
pub use error::{Error, Result};
pub use message::{Attachment, ParsedMail};
pub use run::{RunSummary, drain, run};
pub use session::MailboxSession;
pub use writer::AttachmentWriter;
