//! File Inspector: local filesystem lookups feeding the conversation.

use std::path::Path;

/// Report the size of a regular file in megabytes, rounded to two decimals.
///
/// Returns `None` (after printing a single diagnostic line) when the path
/// does not name a regular file. Absence is not an error; callers decide
/// what to send instead.
pub fn file_size_report(path: impl AsRef<Path>) -> Option<String> {
    let path = path.as_ref();
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => {
            let size_mb = meta.len() as f64 / (1024.0 * 1024.0);
            Some(format!(
                "The size of the file is {} megabytes",
                format_megabytes(size_mb)
            ))
        }
        _ => {
            println!("The specified file does not exist.");
            None
        }
    }
}

/// Guess an image MIME type from the file extension.
///
/// Only the handful of types the attachment path supports; anything else is
/// `None` and gets sent as plain text.
pub fn guess_mime(path: impl AsRef<Path>) -> Option<&'static str> {
    let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

// Round to two decimals, then drop trailing zeros down to one decimal place:
// 15 MiB reads "15.0", not "15" or "15.00".
fn format_megabytes(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.1}")
    } else {
        format!("{rounded}")
    }
}
