//! Subject to folder name conversion
//!
//! An email subject is turned into a relative folder path below the
//! output directory. Each `/`-separated segment gets a capital first
//! letter. Anything that could escape the output directory or that
//! common filesystems reject lands in [`FALLBACK_FOLDER`] instead.

/// Folder used for subjects that cannot be turned into a safe path.
pub const FALLBACK_FOLDER: &str = "error";

const FORBIDDEN: [char; 8] = ['<', '>', ':', '"', '|', '?', '*', '\0'];

/// Convert an email subject into a safe relative folder path.
///
/// Never fails: unsafe subjects map to [`FALLBACK_FOLDER`].
///
/// # Examples
///
/// ```
/// use inbox_drain::sanitize::folder_for_subject;
///
/// assert_eq!(folder_for_subject("invoices/march"), "Invoices/March");
/// assert_eq!(folder_for_subject("../../etc"), "error");
/// ```
#[must_use]
pub fn folder_for_subject(subject: &str) -> String {
    let folder = capitalize_path(subject);
    if is_valid_relative_path(&folder) {
        folder
    } else {
        FALLBACK_FOLDER.to_string()
    }
}

/// Capitalize every `/`-separated segment of `subject`.
#[must_use]
pub fn capitalize_path(subject: &str) -> String {
    subject
        .split('/')
        .map(capitalize_segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// Uppercase the first character and lowercase the rest of the first
/// word. Later words keep their case.
fn capitalize_segment(segment: &str) -> String {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let rest = chars.as_str();
    let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let (word, tail) = rest.split_at(word_end);

    let mut out = String::with_capacity(segment.len());
    out.extend(first.to_uppercase());
    out.push_str(&word.to_lowercase());
    out.push_str(tail);
    out
}

/// Whether `path` is a non-empty relative path that stays inside the
/// directory it is joined to. Segments made only of whitespace are
/// rejected.
#[must_use]
pub fn is_valid_relative_path(path: &str) -> bool {
    if path.is_empty()
        || path.starts_with(['/', '\\'])
        || path.contains(FORBIDDEN)
        || path.split('/').any(is_blank_segment)
        || std::path::Path::new(path).is_absolute()
    {
        return false;
    }

    !normalize(path).starts_with("..")
}

fn is_blank_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.trim().is_empty()
}

/// Lexically normalize a `/`-separated path: empty and `.` segments
/// are dropped, `..` cancels the preceding normal segment.
fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}
