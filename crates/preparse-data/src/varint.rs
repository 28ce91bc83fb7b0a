//! Variable-length encoding of symbol ids.
//!
//! A number is split into 7-bit groups, most significant group first. Every
//! byte but the last has its high bit set. Numbers are limited to 28 bits, so
//! an encoding is at most four bytes long.
//!
//! | value       | bytes            |
//! |-------------|------------------|
//! | `0`         | `00`             |
//! | `127`       | `7F`             |
//! | `128`       | `81 00`          |
//! | `2^28 - 1`  | `FF FF FF 7F`    |

use preparse_util::AppendBuffer;

/// Largest number [`write_number`] accepts.
pub const MAX_ENCODABLE: u32 = (1 << 28) - 1;

/// Longest possible encoding in bytes.
pub const MAX_ENCODED_LEN: usize = 4;

const CONTINUATION: u8 = 0x80;
const PAYLOAD_MASK: u32 = 0x7F;

/// Number of bytes `number` occupies once encoded.
///
/// # Panics
///
/// Panics if `number` exceeds [`MAX_ENCODABLE`].
pub fn encoded_len(number: u32) -> usize {
    assert_encodable(number);
    let mut len = 1;
    let mut rest = number >> 7;
    while rest != 0 {
        len += 1;
        rest >>= 7;
    }
    len
}

/// Appends the encoding of `number` to `out`.
///
/// # Panics
///
/// Panics if `number` exceeds [`MAX_ENCODABLE`]. Truncating instead would
/// corrupt the stream without any reader noticing.
pub fn write_number(out: &mut AppendBuffer<u8>, number: u32) {
    let len = encoded_len(number);
    for group in (1..len).rev() {
        out.add(((number >> (7 * group)) & PAYLOAD_MASK) as u8 | CONTINUATION);
    }
    out.add((number & PAYLOAD_MASK) as u8);
}

/// Encodes `number` into a fresh vector.
pub fn encode_number(number: u32) -> Vec<u8> {
    let mut out = AppendBuffer::with_capacity(MAX_ENCODED_LEN);
    write_number(&mut out, number);
    out.as_slice().to_vec()
}

/// Decodes one number starting at `*position`, advancing past it.
///
/// Returns `None` without moving `*position` if the bytes run out before a
/// final byte, or if more than [`MAX_ENCODED_LEN`] bytes carry the
/// continuation bit. Terminator padding therefore never decodes.
pub fn read_number(bytes: &[u8], position: &mut usize) -> Option<u32> {
    let mut cursor = *position;
    let mut number = 0u32;
    for _ in 0..MAX_ENCODED_LEN {
        let byte = *bytes.get(cursor)?;
        cursor += 1;
        number = (number << 7) | (u32::from(byte) & PAYLOAD_MASK);
        if byte & CONTINUATION == 0 {
            *position = cursor;
            return Some(number);
        }
    }
    None
}

#[inline]
fn assert_encodable(number: u32) {
    assert!(
        number <= MAX_ENCODABLE,
        "number {} exceeds the 28-bit encodable range",
        number
    );
}
