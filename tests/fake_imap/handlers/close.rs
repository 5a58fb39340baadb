//! CLOSE command handler.
//!
//! Permanently removes every `\Deleted` message from the selected
//! folder and leaves the selected state. Unlike EXPUNGE, CLOSE sends no
//! untagged EXPUNGE responses (RFC 3501 Section 6.4.2).
//!
//! Returns whether a folder was selected (and therefore closed).

use crate::fake_imap::io::write_line;
use crate::fake_imap::mailbox::{Folder, Mailbox};
use std::sync::Mutex;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

/// Handle the CLOSE command.
pub async fn handle_close<S: AsyncRead + AsyncWrite + Unpin>(
    tag: &str,
    mailbox: &Mutex<Mailbox>,
    selected_folder: Option<&str>,
    stream: &mut BufReader<S>,
) -> bool {
    let Some(folder_name) = selected_folder else {
        let resp = format!("{tag} BAD No folder selected\r\n");
        let _ = write_line(stream, &resp).await;
        return false;
    };

    // Remove deleted messages under lock (no await inside).
    let found = {
        let mut mb = mailbox.lock().unwrap();
        let removed = mb.get_folder_mut(folder_name).map(Folder::remove_deleted);
        drop(mb);
        removed.is_some()
    };

    let resp = if found {
        format!("{tag} OK CLOSE completed\r\n")
    } else {
        format!("{tag} BAD Folder not found\r\n")
    };
    let _ = write_line(stream, &resp).await;
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_imap::mailbox::MailboxBuilder;
    use tokio::io::BufReader;

    fn make_raw_email() -> Vec<u8> {
        b"From: a@b.com\r\nSubject: Test\r\n\r\nBody".to_vec()
    }

    async fn run_close(tag: &str, mailbox: &Mutex<Mailbox>, selected: Option<&str>) -> (String, bool) {
        let (client, server) = tokio::io::duplex(4096);
        let mut stream = BufReader::new(server);

        let closed = handle_close(tag, mailbox, selected, &mut stream).await;
        drop(stream);

        let mut buf = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut BufReader::new(client), &mut buf)
            .await
            .unwrap();
        (String::from_utf8(buf).unwrap(), closed)
    }

    #[tokio::test]
    async fn removes_deleted_emails_silently() {
        let raw = make_raw_email();
        let mut mb = MailboxBuilder::new()
            .folder("INBOX")
            .email(1, &raw)
            .email(2, &raw)
            .email(3, &raw)
            .build();
        {
            let inbox = mb.get_folder_mut("INBOX").unwrap();
            inbox.emails[0].deleted = true;
            inbox.emails[2].deleted = true;
        }
        let mb = Mutex::new(mb);

        let (output, closed) = run_close("A1", &mb, Some("INBOX")).await;

        assert!(closed);
        assert_eq!(output, "A1 OK CLOSE completed\r\n");
        assert_eq!(mb.lock().unwrap().uids("INBOX"), vec![2]);
    }

    #[tokio::test]
    async fn keeps_unflagged_emails() {
        let raw = make_raw_email();
        let mb = Mutex::new(
            MailboxBuilder::new()
                .folder("INBOX")
                .email(1, &raw)
                .email(2, &raw)
                .build(),
        );

        let _ = run_close("A1", &mb, Some("INBOX")).await;

        assert_eq!(mb.lock().unwrap().uids("INBOX"), vec![1, 2]);
    }

    #[tokio::test]
    async fn no_folder_selected_returns_bad() {
        let mb = Mutex::new(MailboxBuilder::new().folder("INBOX").build());

        let (output, closed) = run_close("A1", &mb, None).await;

        assert!(!closed);
        assert!(output.contains("A1 BAD No folder selected"));
    }
}
