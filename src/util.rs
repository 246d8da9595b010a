use encoding::{Encoding, DecoderTrap, EncoderTrap};
use encoding::all::{ISO_8859_1, UTF_16LE, UTF_16BE};

use crate::errors::*;

///
/// # Text Encoding
///
/// [See](http://id3.org/id3v2.4.0-structure) > 4. ID3v2 frame overview
///
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TextEncoding {
    ISO88591,
    /// UTF-16 starting with a byte order mark
    UTF16,
    UTF16BE,
    UTF8
}

impl TextEncoding {
    pub fn terminator(&self) -> &'static [u8] {
        match *self {
            TextEncoding::ISO88591 | TextEncoding::UTF8 => b"\x00",
            TextEncoding::UTF16 | TextEncoding::UTF16BE => b"\x00\x00"
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> String {
        match *self {
            TextEncoding::ISO88591 => decode_with(ISO_8859_1, bytes),
            TextEncoding::UTF16 => match bytes {
                [0xff, 0xfe, rest @ ..] => decode_with(UTF_16LE, rest),
                [0xfe, 0xff, rest @ ..] => decode_with(UTF_16BE, rest),
                _ => decode_with(UTF_16LE, bytes)
            },
            TextEncoding::UTF16BE => decode_with(UTF_16BE, bytes),
            TextEncoding::UTF8 => String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

fn decode_with<E: Encoding>(encoding: &E, bytes: &[u8]) -> String {
    match encoding.decode(bytes, DecoderTrap::Replace) {
        Ok(text) => text,
        Err(e) => {
            warn!("{} decode failed: {}", encoding.name(), e);
            String::new()
        }
    }
}

/// Maps the encoding selector byte that leads most text bearing frames.
pub fn to_encoding(code: u8) -> Result<TextEncoding> {
    match code {
        0x00 => Ok(TextEncoding::ISO88591),
        0x01 => Ok(TextEncoding::UTF16),
        0x02 => Ok(TextEncoding::UTF16BE),
        0x03 => Ok(TextEncoding::UTF8),
        _ => Err(Id3Error::from(FormatErrorKind::UnknownTextEncoding(code)))
    }
}

pub fn to_iso8859_1(bytes: &[u8]) -> String {
    TextEncoding::ISO88591.decode(bytes)
}

pub fn from_iso8859_1(text: &str) -> Result<Vec<u8>> {
    ISO_8859_1.encode(text, EncoderTrap::Strict)
        .map_err(|_| Id3Error::invalid_argument(format!("'{}' is not ISO-8859-1 encodable", text)))
}

///
/// Big-endian digit expansion of `value` in `base`, left padded with zero digits
/// up to `min_bytes`.
///
/// `base` 128 gives a synchsafe integer, 256 a plain one.
///
pub fn pack_int(value: u64, base: u64, min_bytes: usize) -> Vec<u8> {
    debug_assert!(base >= 2 && base <= 256);

    let mut digits = Vec::with_capacity(min_bytes);
    let mut rest = value;
    while rest > 0 {
        digits.push((rest % base) as u8);
        rest = rest / base;
    }
    while digits.len() < min_bytes {
        digits.push(0);
    }
    digits.reverse();

    digits
}

pub fn unpack_int(digits: &[u8], base: u64) -> u64 {
    digits.iter().fold(0u64, |acc, digit| {
        acc.saturating_mul(base).saturating_add(*digit as u64)
    })
}

// bit 0 is the least significant bit
pub fn get_flag(byte: u8, position: u8) -> bool {
    (byte >> position) & 1 == 1
}

pub fn set_flag(byte: u8, position: u8) -> u8 {
    byte | 1 << position
}

/// `flags[0]` lands on bit 7, `flags[7]` on bit 0.
pub fn pack_flags(flags: &[bool]) -> Result<u8> {
    if flags.len() != 8 {
        return Err(Id3Error::invalid_argument(
            format!("Need 8 flags to pack into one byte, but got {}", flags.len())));
    }

    Ok(flags.iter().enumerate().fold(0u8, |byte, (i, flag)| {
        if *flag { set_flag(byte, 7 - i as u8) } else { byte }
    }))
}

fn is_false_sync(current: u8, next: u8) -> bool {
    current == 0xff && (next == 0x00 || next > 0xe0)
}

///
/// Inserts 0x00 after every 0xFF that is followed by 0x00 or by a byte above 0xE0.
///
/// [See](http://id3.org/id3v2.4.0-structure) > 6.1. The unsynchronisation scheme
///
pub fn unsync(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for (i, b) in bytes.iter().enumerate() {
        out.push(*b);
        if let Some(next) = bytes.get(i + 1) {
            if is_false_sync(*b, *next) {
                out.push(0x00);
            }
        }
    }

    out
}

/// Replaces every 0xFF 0x00 pair with a single 0xFF, scanning left to right.
pub fn deunsync(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        out.push(b);
        i = if b == 0xff && bytes.get(i + 1) == Some(&0x00) { i + 2 } else { i + 1 };
    }

    out
}

///
/// Returns the bytes in front of the first `terminator` whose offset is a multiple
/// of the terminator's width, or `None` when there is no such terminator.
///
/// The alignment rule keeps the low zero byte of a UTF-16 character and the
/// first byte of the terminator from being read as `00 00`.
///
pub fn extract_terminated_string<'a>(bytes: &'a [u8], terminator: &[u8]) -> Option<&'a [u8]> {
    let width = terminator.len();
    if width == 0 {
        return Some(&bytes[..0]);
    }

    let mut start = 0;
    while start + width <= bytes.len() {
        let index = start + bytes[start..].windows(width).position(|w| w == terminator)?;
        if index % width == 0 {
            return Some(&bytes[..index]);
        }
        start = index + 1;
    }

    None
}

pub fn to_hex(bytes: &[u8]) -> String {
    let strs: Vec<String> = bytes.iter()
                                 .map(|b| format!("{:02x}", b))
                                 .collect();
    strs.join(" ")
}
