//! OSC type-tag bytes and the payload size table.
//!
//! Every argument is described by one ASCII byte in the type-tag string. The
//! payload size of most tags is fixed; blobs and strings size themselves from
//! their own payload and are handled by the message view.

/// 32-bit big-endian signed integer.
pub const INT32: u8 = b'i';

/// 32-bit big-endian IEEE 754 float.
pub const FLOAT32: u8 = b'f';

/// 64-bit big-endian signed integer.
pub const INT64: u8 = b'h';

/// 64-bit big-endian IEEE 754 float.
pub const FLOAT64: u8 = b'd';

/// NUL-terminated string, padded to a 4-byte boundary.
pub const STRING: u8 = b's';

/// Symbol; same wire layout as a string.
pub const SYMBOL: u8 = b'S';

/// 4-byte big-endian length prefix followed by raw bytes.
pub const BLOB: u8 = b'b';

/// ASCII character carried as 32 bits.
pub const CHAR: u8 = b'c';

/// 32-bit RGBA color.
pub const RGBA: u8 = b'r';

/// 4-byte MIDI message (port, status, data1, data2).
pub const MIDI: u8 = b'm';

/// True; no payload, the tag byte is the value.
pub const TRUE: u8 = b'T';

/// False; no payload, the tag byte is the value.
pub const FALSE: u8 = b'F';

/// Nil; no payload.
pub const NIL: u8 = b'N';

/// Infinitum; no payload.
pub const INFINITUM: u8 = b'I';

/// Payload size for tags whose size does not depend on the payload itself.
///
/// Returns `None` for blob, string, and symbol. Tags without a payload —
/// including unrecognized ones — report zero.
pub fn fixed_payload_size(tag: u8) -> Option<usize> {
    match tag {
        CHAR | RGBA | INT32 | FLOAT32 | MIDI => Some(4),
        INT64 | FLOAT64 => Some(8),
        BLOB | STRING | SYMBOL => None,
        _ => Some(0),
    }
}

/// Returns true for tags whose payload size must be read from the payload.
pub fn is_variable_size(tag: u8) -> bool {
    matches!(tag, BLOB | STRING | SYMBOL)
}

/// Returns a human-readable name for a tag byte.
pub fn tag_name(tag: u8) -> &'static str {
    match tag {
        INT32 => "int32",
        FLOAT32 => "float32",
        INT64 => "int64",
        FLOAT64 => "float64",
        STRING => "string",
        SYMBOL => "symbol",
        BLOB => "blob",
        CHAR => "char",
        RGBA => "rgba",
        MIDI => "midi",
        TRUE => "true",
        FALSE => "false",
        NIL => "nil",
        INFINITUM => "infinitum",
        _ => "unknown",
    }
}

/// Stored size of an unterminated string of `len` bytes: the smallest
/// multiple of 4 strictly greater than `len`, leaving room for the NUL.
pub const fn padded_string_length(len: usize) -> usize {
    (len + 4) & !3
}
