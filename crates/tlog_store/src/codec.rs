//! Text encoding and line framing of `tlog` files.
//!
//! A log is a sequence of lines. A line starting with [`KEY_MARKER`] names a
//! source; every following line up to the next marker is one path recorded
//! for that source. Files are written as UTF-16LE with a byte-order mark by
//! default, with `\r\n` line endings.

use encoding_rs::{Encoding, UTF_16LE, UTF_8};
use tlog_config::TextEncoding;

/// Prefix that marks a source key line.
pub const KEY_MARKER: char = '^';

/// Line terminator used when writing logs.
pub const LINE_END: &str = "\r\n";

const BOM_UTF16_LE: [u8; 2] = [0xFF, 0xFE];

/// One meaningful line of a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// `^<key>`: starts the block for a source. The marker is stripped.
    Key(&'a str),
    /// A path belonging to the current block.
    Entry(&'a str),
}

/// Splits decoded log text into lines.
///
/// Accepts `\r\n`, `\n` and lone `\r` terminators. Blank lines carry no
/// information and are skipped.
pub fn lines(text: &str) -> impl Iterator<Item = Line<'_>> {
    text.split(['\r', '\n'])
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.strip_prefix(KEY_MARKER) {
            Some(key) => Line::Key(key),
            None => Line::Entry(line),
        })
}

/// Decodes the raw bytes of a log file.
///
/// The encoding is taken from the byte-order mark when there is one, and is
/// `fallback` otherwise. Invalid sequences are replaced rather than rejected,
/// and a dangling odd byte at the end of UTF-16 data is dropped.
pub fn decode(bytes: &[u8], fallback: TextEncoding) -> String {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or(match fallback {
        TextEncoding::Utf16Le => (UTF_16LE, 0),
        TextEncoding::Utf8 => (UTF_8, 0),
    });
    let mut body = &bytes[bom_len..];
    if encoding != UTF_8 && body.len() % 2 == 1 {
        body = &body[..body.len() - 1];
    }
    let (text, _had_errors) = encoding.decode_without_bom_handling(body);
    text.into_owned()
}

/// Encodes log text for writing.
///
/// UTF-16LE output starts with a byte-order mark; UTF-8 output has none.
pub fn encode(text: &str, encoding: TextEncoding) -> Vec<u8> {
    match encoding {
        TextEncoding::Utf16Le => {
            let mut out = Vec::with_capacity(2 + text.len() * 2);
            out.extend_from_slice(&BOM_UTF16_LE);
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_le_bytes());
            }
            out
        }
        TextEncoding::Utf8 => text.as_bytes().to_vec(),
    }
}
