//! Base64 transport for `<...>` binary blobs.
//!
//! Encoding is standard padded base64. Decoding is deliberately permissive:
//! bytes outside the alphabet are ignored, `=` carries no information, and a
//! trailing group with fewer than 8 usable bits is dropped. Malformed input
//! never produces an error, only fewer bytes.

use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{alphabet, Engine};

/// Accepts unpadded tails and nonzero trailing bits, so any filtered input
/// with a decodable length goes through.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Encode bytes as standard base64 with `=` padding.
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode base64, ignoring anything that is not an alphabet character.
pub fn from_base64(text: &[u8]) -> Vec<u8> {
    let mut filtered: Vec<u8> = text
        .iter()
        .copied()
        .filter(|&b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
        .collect();
    // A single leftover character holds only 6 bits, not enough for a byte.
    if filtered.len() % 4 == 1 {
        filtered.pop();
    }
    LENIENT.decode(&filtered).unwrap_or_default()
}
