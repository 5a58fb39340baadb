//! Decoding raw messages into subjects and attachments

use crate::error::{Error, Result};
use mailparse::{DispositionType, MailHeaderMap, ParsedMail as MimePart};

/// Synthetic header carrying the server UID into the decoded mail.
pub const IMAP_ID_HEADER: &str = "Imap-Id";

/// File name used when an attachment does not carry a usable one.
pub const DEFAULT_ATTACHMENT_NAME: &str = "attachment";

/// A decoded message: only the parts this tool cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMail {
    /// UID taken from the `Imap-Id` header, if present.
    pub imap_id: Option<u32>,
    pub subject: Option<String>,
    pub attachments: Vec<Attachment>,
}

/// A named binary payload extracted from a MIME part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: Option<String>,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl Attachment {
    /// The name to store this attachment under.
    ///
    /// Only the last path component of the declared filename is kept,
    /// so `../../report.pdf` becomes `report.pdf`.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.filename
            .as_deref()
            .and_then(|name| name.rsplit(['/', '\\']).next())
            .map(str::trim)
            .filter(|name| !name.is_empty() && *name != "." && *name != "..")
            .unwrap_or(DEFAULT_ATTACHMENT_NAME)
    }
}

/// Decode the raw body of the message with the given UID.
///
/// An `Imap-Id: <uid>` header line is prepended before parsing so the
/// decoded mail remembers where it came from.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the MIME structure cannot be decoded.
pub fn decode(uid: u32, raw: &[u8]) -> Result<ParsedMail> {
    let mut stream = format!("{IMAP_ID_HEADER}: {uid}\r\n").into_bytes();
    stream.extend_from_slice(raw);
    parse(&stream)
}

/// Parse a complete RFC 822 message.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the MIME structure or a part body cannot
/// be decoded.
pub fn parse(raw: &[u8]) -> Result<ParsedMail> {
    let mail = mailparse::parse_mail(raw).map_err(|e| Error::Parse(e.to_string()))?;

    let subject = mail.headers.get_first_value("Subject");
    let imap_id = mail
        .headers
        .get_first_value(IMAP_ID_HEADER)
        .and_then(|id| id.trim().parse().ok());

    let mut attachments = Vec::new();
    collect_attachments(&mail, &mut attachments)?;

    Ok(ParsedMail {
        imap_id,
        subject,
        attachments,
    })
}

fn collect_attachments(part: &MimePart<'_>, out: &mut Vec<Attachment>) -> Result<()> {
    if !part.subparts.is_empty() {
        for sub in &part.subparts {
            collect_attachments(sub, out)?;
        }
        return Ok(());
    }

    if !is_attachment(part) {
        return Ok(());
    }

    let content = part
        .get_body_raw()
        .map_err(|e| Error::Parse(format!("Cannot decode attachment body: {e}")))?;

    out.push(Attachment {
        filename: declared_filename(part),
        content_type: part.ctype.mimetype.clone(),
        content,
    });
    Ok(())
}

/// A leaf part is an attachment when it says so, when it is named, or
/// when it is not a text body.
fn is_attachment(part: &MimePart<'_>) -> bool {
    if matches!(
        part.get_content_disposition().disposition,
        DispositionType::Attachment
    ) {
        return true;
    }
    if declared_filename(part).is_some() {
        return true;
    }

    let mimetype = part.ctype.mimetype.to_ascii_lowercase();
    !(mimetype.starts_with("text/") || mimetype.starts_with("multipart/"))
}

fn declared_filename(part: &MimePart<'_>) -> Option<String> {
    let disposition = part.get_content_disposition();
    disposition
        .params
        .get("filename")
        .or_else(|| part.ctype.params.get("name"))
        .filter(|name| !name.is_empty())
        .cloned()
}
