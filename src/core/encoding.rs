// YAM Log Relay - core/encoding.rs
//
// Best-effort repair of log text before it is queued. Producers hand over
// whatever a server or a local file gave them; nothing here ever fails.
//
// Decoding order:
//   1. UTF-16 with a byte-order mark (Windows tools, some IMAP servers'
//      error strings) is decoded explicitly.
//   2. Everything else is treated as UTF-8, with invalid sequences replaced
//      by U+FFFD.

use std::borrow::Cow;

/// Decode bytes of unknown encoding into a `String`.
pub fn sanitize_bytes(bytes: &[u8]) -> String {
    if let Some(text) = decode_utf16_bom(bytes) {
        return text;
    }
    String::from_utf8_lossy(bytes).into_owned()
}

/// Make `text` a single render line: trailing line terminators are dropped,
/// embedded CR/LF become a space, and other control characters that would
/// corrupt a render (NUL, escape sequences) are removed. Tabs are kept.
///
/// One record is always exactly one line, so the sink's line count matches
/// what a file mirror shows.
///
/// Returns the input unchanged (borrowed) in the common case.
pub fn sanitize_text(text: &str) -> Cow<'_, str> {
    let trimmed = text.trim_end_matches(['\r', '\n']);
    if !trimmed.chars().any(|c| c.is_control() && c != '\t') {
        return Cow::Borrowed(trimmed);
    }
    Cow::Owned(
        trimmed
            .chars()
            .filter_map(|c| match c {
                '\r' | '\n' => Some(' '),
                '\t' => Some(c),
                c if c.is_control() => None,
                c => Some(c),
            })
            .collect(),
    )
}

fn decode_utf16_bom(bytes: &[u8]) -> Option<String> {
    let (body, little_endian) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (rest, true),
        [0xFE, 0xFF, rest @ ..] => (rest, false),
        _ => return None,
    };
    let units = body.chunks_exact(2).map(|pair| {
        if little_endian {
            u16::from_le_bytes([pair[0], pair[1]])
        } else {
            u16::from_be_bytes([pair[0], pair[1]])
        }
    });
    Some(
        char::decode_utf16(units)
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect(),
    )
}
