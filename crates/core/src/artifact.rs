//! Backup artifact naming
//!
//! Every backup artifact is named `<token>.<original-filename>` where the
//! token is the creation time as a zero-padded 16-digit lowercase hex
//! millisecond epoch. The fixed width makes lexical order within a directory
//! equal to chronological creation order, which is what retention relies on.
//!
//! The token format is part of the on-disk contract: external tooling that
//! parses backup directories depends on the prefix length staying stable.

use std::time::{SystemTime, UNIX_EPOCH};

/// Width of the timestamp token in characters.
pub const TOKEN_WIDTH: usize = 16;

/// Separator between the timestamp token and the original filename.
pub const DELIMITER: char = '.';

/// Length of the `<token><delimiter>` prefix on every artifact name.
///
/// Retention scanning strips exactly this many bytes from candidate names;
/// it must stay derived from [`TOKEN_WIDTH`], never a separate literal.
pub const PREFIX_LEN: usize = TOKEN_WIDTH + 1;

/// Render `when` as a fixed-width hex millisecond token.
///
/// A clock before the Unix epoch saturates to the all-zero token rather
/// than failing; backups keep working on a badly set clock.
pub fn timestamp_token(when: SystemTime) -> String {
    let ms = when
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    format!("{ms:0width$x}", width = TOKEN_WIDTH)
}

/// Build the artifact filename for `filename` at token `token`.
pub fn artifact_name(token: &str, filename: &str) -> String {
    format!("{token}{DELIMITER}{filename}")
}

/// Recover the original filename from an artifact name.
///
/// Returns `None` for names that do not carry a well-formed
/// `<token><delimiter>` prefix, so retention never counts stray files that
/// happen to live in a backup directory.
pub fn original_name(artifact: &str) -> Option<&str> {
    let token = artifact.get(..TOKEN_WIDTH)?;
    if !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    if artifact[TOKEN_WIDTH..].chars().next() != Some(DELIMITER) {
        return None;
    }
    artifact.get(PREFIX_LEN..)
}
