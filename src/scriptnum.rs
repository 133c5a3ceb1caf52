//! Script number codec.
//!
//! Stack values that are used in numeric contexts carry a signed-magnitude
//! little-endian encoding: the magnitude occupies the low bits of each byte
//! and bit 0x80 of the final byte holds the sign.  Zero is the empty byte
//! string.  Consensus caps ordinary numeric operands at four bytes, so the
//! decoded result always fits an `i64` with room to spare for five-byte
//! intermediate results.

use crate::ScriptError;

/// Maximum operand length accepted by the numeric opcodes.
pub const SCRIPTNUM_MAX_LEN: usize = 4;

/// Encodes an integer into its minimal script-number representation.
pub fn encode_num(value: i64) -> Vec<u8> {
    if value == 0 {
        return Vec::new();
    }

    let mut result = Vec::new();
    let mut abs_value = value.unsigned_abs();

    while abs_value > 0 {
        result.push((abs_value & 0xff) as u8);
        abs_value >>= 8;
    }

    // If the most significant byte already carries the 0x80 bit, an extra
    // byte is required to hold the sign; otherwise the sign lives in the
    // final magnitude byte.
    let last = result.last_mut().expect("non-zero value has bytes");
    if *last & 0x80 != 0 {
        result.push(if value < 0 { 0x80 } else { 0x00 });
    } else if value < 0 {
        *last |= 0x80;
    }

    result
}

/// Decodes a script number without enforcing length or minimality.
pub fn decode_num(bytes: &[u8]) -> i64 {
    if bytes.is_empty() {
        return 0;
    }

    let mut result: i64 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        result |= (byte as i64) << (8 * i);
    }

    let last = bytes[bytes.len() - 1];
    if last & 0x80 != 0 {
        let mask = !(0x80i64 << (8 * (bytes.len() - 1)));
        -(result & mask)
    } else {
        result
    }
}

/// Decodes a script number, enforcing the length cap and, when requested,
/// the minimal-encoding rule.
pub fn parse_scriptnum(
    bytes: &[u8],
    require_minimal: bool,
    max_len: usize,
) -> Result<i64, ScriptError> {
    if bytes.len() > max_len {
        return Err(ScriptError::NumberOverflow);
    }
    if require_minimal && !is_minimally_encoded(bytes, max_len) {
        return Err(ScriptError::MinimalNumberEncoding);
    }
    Ok(decode_num(bytes))
}

/// Returns whether `bytes` is the shortest possible encoding of its value.
///
/// An encoding is non-minimal when the final byte contributes nothing but a
/// sign position: it is 0x00 or 0x80 while the preceding byte has room for
/// the sign bit.
pub fn is_minimally_encoded(bytes: &[u8], max_len: usize) -> bool {
    if bytes.len() > max_len {
        return false;
    }
    if bytes.is_empty() {
        return true;
    }

    let last = bytes[bytes.len() - 1];
    if (last & 0x7f) == 0 {
        if bytes.len() == 1 {
            return false;
        }
        if bytes[bytes.len() - 2] & 0x80 == 0 {
            return false;
        }
    }

    true
}
