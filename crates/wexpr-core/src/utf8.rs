//! Byte-level UTF-8 well-formedness check.
//!
//! Decoded strings and map keys are classified against the well-formed UTF-8
//! byte ranges (surrogates and out-of-range lead bytes excluded). The check is
//! spelled out by range rather than routed through `str::from_utf8` so the
//! accepted sequences are explicit.

/// True iff `bytes` is a well-formed UTF-8 sequence. Empty input is valid.
pub fn is_well_formed(bytes: &[u8]) -> bool {
    let mut rest = bytes;
    while !rest.is_empty() {
        match well_formed_prefix(rest) {
            Some(len) => rest = &rest[len..],
            None => return false,
        }
    }
    true
}

/// Length of the well-formed code point at the start of `bytes`, or `None`.
fn well_formed_prefix(bytes: &[u8]) -> Option<usize> {
    fn cont(b: u8) -> bool {
        (0x80..=0xBF).contains(&b)
    }
    let tail = |len: usize| bytes.len() >= len && bytes[2..len].iter().all(|&b| cont(b));

    match bytes[0] {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF if bytes.len() >= 2 && cont(bytes[1]) => Some(2),
        // Three-byte forms constrain the second byte to exclude overlong
        // encodings (E0) and surrogates (ED).
        0xE0 if bytes.len() >= 3 && (0xA0..=0xBF).contains(&bytes[1]) && tail(3) => Some(3),
        0xE1..=0xEC if bytes.len() >= 3 && cont(bytes[1]) && tail(3) => Some(3),
        0xED if bytes.len() >= 3 && (0x80..=0x9F).contains(&bytes[1]) && tail(3) => Some(3),
        0xEE..=0xEF if bytes.len() >= 3 && cont(bytes[1]) && tail(3) => Some(3),
        // Four-byte forms cap the range at U+10FFFF (F0 overlong, F4 high).
        0xF0 if bytes.len() >= 4 && (0x90..=0xBF).contains(&bytes[1]) && tail(4) => Some(4),
        0xF1..=0xF3 if bytes.len() >= 4 && cont(bytes[1]) && tail(4) => Some(4),
        0xF4 if bytes.len() >= 4 && (0x80..=0x8F).contains(&bytes[1]) && tail(4) => Some(4),
        _ => None,
    }
}
