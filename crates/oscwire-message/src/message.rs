use tracing::trace;

use crate::error::{OscError, Result};
use crate::tags;

/// A zero-copy view over one OSC packet in an externally owned buffer.
///
/// The view keeps only derived offsets — type-tag start, data start, and the
/// buffer end — and recomputes everything else on demand. It never allocates,
/// grows, or frees storage: `B` is whatever the caller hands in (`&[u8]`,
/// `&mut [u8]`, `Vec<u8>`, `bytes::BytesMut`).
///
/// Accessors come in two flavors:
///
/// - The plain methods are the unchecked fast path. Every access is clamped
///   to the buffer end, so they are memory-safe and never panic, but they
///   perform no validation: indexing past the real argument count or reading
///   a malformed packet yields unspecified (zero or garbage) values. This is
///   a deliberate throughput-over-defensiveness trade-off for real-time use.
/// - [`try_parse`](Self::try_parse) and [`arg`](Self::arg) form the validated
///   path and report [`OscError`] on unterminated strings and out-of-range
///   offsets.
///
/// Offsets are never cached across mutation; [`message_length`] and friends
/// walk the arguments on every call and must be re-read after any structural
/// change.
///
/// [`message_length`]: Self::message_length
#[derive(Debug)]
pub struct OscMessage<B> {
    buf: B,
    types_at: usize,
    data_at: usize,
    end: usize,
}

/// One decoded OSC argument, borrowed from the packet buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OscArg<'a> {
    Int32(i32),
    Float32(f32),
    Int64(i64),
    Float64(f64),
    Str(&'a str),
    Symbol(&'a str),
    Blob(&'a [u8]),
    Char(u8),
    Rgba([u8; 4]),
    Midi([u8; 4]),
    True,
    False,
    Nil,
    Infinitum,
    /// A tag byte outside the supported set; carries no payload.
    Unknown(u8),
}

impl<'a> OscArg<'a> {
    /// The type-tag byte this argument was decoded from.
    pub fn tag(&self) -> u8 {
        match self {
            OscArg::Int32(_) => tags::INT32,
            OscArg::Float32(_) => tags::FLOAT32,
            OscArg::Int64(_) => tags::INT64,
            OscArg::Float64(_) => tags::FLOAT64,
            OscArg::Str(_) => tags::STRING,
            OscArg::Symbol(_) => tags::SYMBOL,
            OscArg::Blob(_) => tags::BLOB,
            OscArg::Char(_) => tags::CHAR,
            OscArg::Rgba(_) => tags::RGBA,
            OscArg::Midi(_) => tags::MIDI,
            OscArg::True => tags::TRUE,
            OscArg::False => tags::FALSE,
            OscArg::Nil => tags::NIL,
            OscArg::Infinitum => tags::INFINITUM,
            OscArg::Unknown(tag) => *tag,
        }
    }
}

/// Bounded strlen: distance from `start` to the first NUL, or the full region
/// length when no NUL exists before `stop`.
fn strlen_bounded(buf: &[u8], start: usize, stop: usize) -> usize {
    let stop = stop.min(buf.len());
    if start >= stop {
        return 0;
    }
    buf[start..stop]
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(stop - start)
}

/// Like [`strlen_bounded`] but reports a missing terminator.
fn scan_nul(buf: &[u8], start: usize, stop: usize) -> Option<usize> {
    let stop = stop.min(buf.len());
    if start >= stop {
        return None;
    }
    buf[start..stop].iter().position(|&b| b == 0)
}

impl<B: AsRef<[u8]>> OscMessage<B> {
    /// Bind a buffer. The message starts empty: all region offsets collapse
    /// to the buffer start and `end` marks the buffer's capacity.
    ///
    /// For a buffer that already holds a packet, follow with
    /// [`parse`](Self::parse) or [`try_parse`](Self::try_parse).
    pub fn new(buf: B) -> Self {
        let end = buf.as_ref().len();
        Self {
            buf,
            types_at: 0,
            data_at: 0,
            end,
        }
    }

    /// Reset to an empty message, keeping the buffer and its capacity.
    pub fn clear(&mut self) {
        self.types_at = 0;
        self.data_at = 0;
    }

    /// Recompute the type-tag and data offsets from the buffer contents.
    ///
    /// Assumes well-formed input: terminator scans are bounded by the buffer
    /// end, so a packet lacking a NUL yields clamped (semantically undefined,
    /// never out-of-range) offsets rather than an error. A missing type-tag
    /// string is tolerated — some legacy senders omit it — and reads as zero
    /// arguments.
    pub fn parse(&mut self) {
        let s = self.buf.as_ref();
        let addr_len = strlen_bounded(s, 0, self.end);
        self.types_at = tags::padded_string_length(addr_len).min(self.end);
        let tag_len = strlen_bounded(s, self.types_at, self.end);
        self.data_at = self
            .types_at
            .saturating_add(tags::padded_string_length(tag_len))
            .min(self.end);
        trace!(
            types_at = self.types_at,
            data_at = self.data_at,
            end = self.end,
            "parsed osc message"
        );
    }

    /// Validated variant of [`parse`](Self::parse).
    ///
    /// Fails with [`OscError::Unterminated`] when the address (or a present
    /// type-tag string) has no NUL before the buffer end, and with
    /// [`OscError::OutOfBounds`] when a padded region would pass it. A buffer
    /// that ends exactly after the padded address still parses: the type-tag
    /// string is optional.
    pub fn try_parse(&mut self) -> Result<()> {
        let s = self.buf.as_ref();
        let addr_len = scan_nul(s, 0, self.end).ok_or(OscError::Unterminated {
            region: "address",
            end: self.end,
        })?;
        let types_at = tags::padded_string_length(addr_len);
        if types_at > self.end {
            return Err(OscError::OutOfBounds {
                offset: 0,
                len: types_at,
                end: self.end,
            });
        }
        let data_at = if types_at == self.end {
            types_at
        } else {
            let tag_len = scan_nul(s, types_at, self.end).ok_or(OscError::Unterminated {
                region: "type tags",
                end: self.end,
            })?;
            let padded = tags::padded_string_length(tag_len);
            if types_at + padded > self.end {
                return Err(OscError::OutOfBounds {
                    offset: types_at,
                    len: padded,
                    end: self.end,
                });
            }
            types_at + padded
        };
        self.types_at = types_at;
        self.data_at = data_at;
        Ok(())
    }

    /// Length of the address region including its NUL padding.
    pub fn address_length(&self) -> usize {
        self.types_at
    }

    /// Length of the type-tag region including its NUL padding.
    pub fn type_tag_length(&self) -> usize {
        self.data_at - self.types_at
    }

    /// Combined length of the address and type-tag regions.
    pub fn prefix_length(&self) -> usize {
        self.data_at
    }

    /// Total encoded length: prefix plus the payload size of every argument.
    ///
    /// Walks all arguments on each call (never cached); recompute after any
    /// structural change. Blob payload sizes exclude the 4-byte length
    /// prefix, matching [`data_size`](Self::data_size).
    pub fn message_length(&self) -> usize {
        let mut len = self.prefix_length();
        let mut off = self.data_at;
        for index in 0..self.arg_count() {
            let size = self.size_at(self.data_type(index), off);
            len += size;
            off = off.saturating_add(size).min(self.end);
        }
        len
    }

    /// The bound buffer up to its capacity end.
    pub fn buffer(&self) -> &[u8] {
        let s = self.buf.as_ref();
        &s[..self.end.min(s.len())]
    }

    /// Capacity of the bound buffer.
    pub fn buffer_len(&self) -> usize {
        self.end
    }

    /// Consume the view and return the buffer.
    pub fn into_inner(self) -> B {
        self.buf
    }

    /// The address pattern, NUL-trimmed. Empty when the address bytes are not
    /// valid UTF-8.
    pub fn address(&self) -> &str {
        let s = self.buf.as_ref();
        let len = strlen_bounded(s, 0, self.end);
        std::str::from_utf8(&s[..len]).unwrap_or("")
    }

    /// The type-tag string including its leading comma, NUL-trimmed. Empty
    /// when the packet carries no type-tag string.
    pub fn type_tags(&self) -> &str {
        if self.data_at <= self.types_at {
            return "";
        }
        let s = self.buf.as_ref();
        let len = strlen_bounded(s, self.types_at, self.data_at);
        std::str::from_utf8(&s[self.types_at.min(s.len())..self.types_at.min(s.len()) + len])
            .unwrap_or("")
    }

    /// ASCII case-insensitive comparison of the address against `pattern`,
    /// over `pattern`'s length only.
    ///
    /// This is a bounded prefix match, not an exact or wildcard match:
    /// `matches("/foo")` is true for a stored address of `/foobar`.
    pub fn matches(&self, pattern: &str) -> bool {
        let s = self.buf.as_ref();
        let p = pattern.as_bytes();
        let stop = self.end.min(s.len());
        if p.len() > stop {
            return false;
        }
        s[..p.len()].eq_ignore_ascii_case(p)
    }

    /// Number of arguments: tag bytes after the leading comma, up to the
    /// terminator or the data region, whichever comes first. Zero when the
    /// type-tag string is absent.
    pub fn arg_count(&self) -> usize {
        let s = self.buf.as_ref();
        let start = (self.types_at + 1).min(self.data_at);
        let stop = self.data_at.min(s.len());
        if start >= stop {
            return 0;
        }
        s[start..stop].iter().take_while(|&&b| b != 0).count()
    }

    /// The type-tag byte of the zero-based argument `index` (one position
    /// past the leading comma). Unchecked: out-of-range indices read as 0.
    pub fn data_type(&self, index: usize) -> u8 {
        let s = self.buf.as_ref();
        let at = self.types_at.saturating_add(1).saturating_add(index);
        if at < self.end.min(s.len()) {
            s[at]
        } else {
            0
        }
    }

    /// Payload size of argument `index` in bytes.
    ///
    /// Fixed-size tags use the table in [`tags`]. A blob reports the value of
    /// its 4-byte big-endian length prefix — the prefix itself is excluded
    /// and the payload is *not* additionally padded (a deliberate deviation
    /// from the usual OSC convention, preserved for wire compatibility with
    /// this codec's peers). Strings report their padded length from a bounded
    /// terminator scan.
    pub fn data_size(&self, index: usize) -> usize {
        self.size_at(self.data_type(index), self.data_offset(index))
    }

    /// Offset of argument `index`'s payload: data start plus the sum of the
    /// preceding payload sizes. Necessarily sequential — each size may depend
    /// on decoding that argument's own payload.
    pub fn data_offset(&self, index: usize) -> usize {
        let mut off = self.data_at;
        for i in 0..index {
            off = off
                .saturating_add(self.size_at(self.data_type(i), off))
                .min(self.end);
        }
        off
    }

    fn size_at(&self, tag: u8, off: usize) -> usize {
        if let Some(n) = tags::fixed_payload_size(tag) {
            return n;
        }
        let s = self.buf.as_ref();
        match tag {
            tags::BLOB => {
                if off + 4 <= self.end.min(s.len()) {
                    u32::from_be_bytes([s[off], s[off + 1], s[off + 2], s[off + 3]]) as usize
                } else {
                    0
                }
            }
            // string or symbol
            _ => tags::padded_string_length(strlen_bounded(s, off, self.end)),
        }
    }

    fn read_fixed<const N: usize>(&self, off: usize) -> [u8; N] {
        let s = self.buf.as_ref();
        let mut out = [0u8; N];
        if off.saturating_add(N) <= self.end.min(s.len()) {
            out.copy_from_slice(&s[off..off + N]);
        }
        out
    }

    /// Big-endian i32 at argument `index`. No tag cross-check; the caller is
    /// expected to have inspected [`data_type`](Self::data_type).
    pub fn int32(&self, index: usize) -> i32 {
        i32::from_be_bytes(self.read_fixed(self.data_offset(index)))
    }

    /// Big-endian f32 at argument `index`.
    pub fn float32(&self, index: usize) -> f32 {
        f32::from_be_bytes(self.read_fixed(self.data_offset(index)))
    }

    /// Big-endian i64 at argument `index`.
    pub fn int64(&self, index: usize) -> i64 {
        i64::from_be_bytes(self.read_fixed(self.data_offset(index)))
    }

    /// Big-endian f64 at argument `index`.
    pub fn float64(&self, index: usize) -> f64 {
        f64::from_be_bytes(self.read_fixed(self.data_offset(index)))
    }

    /// String argument at `index`, NUL-trimmed. Empty on invalid UTF-8 or an
    /// out-of-range offset.
    pub fn string(&self, index: usize) -> &str {
        let s = self.buf.as_ref();
        let off = self.data_offset(index);
        let stop = self.end.min(s.len());
        if off >= stop {
            return "";
        }
        let len = strlen_bounded(s, off, stop);
        std::str::from_utf8(&s[off..off + len]).unwrap_or("")
    }

    /// Blob payload at `index`: the bytes following the length prefix,
    /// clamped to the buffer end.
    pub fn blob(&self, index: usize) -> &[u8] {
        let s = self.buf.as_ref();
        let off = self.data_offset(index);
        let stop = self.end.min(s.len());
        let start = off.saturating_add(4).min(stop);
        let finish = off
            .saturating_add(4)
            .saturating_add(self.data_size(index))
            .min(stop);
        &s[start..finish.max(start)]
    }

    /// Boolean argument: true when the tag byte is `'T'`. Booleans carry no
    /// payload; the tag itself is the value.
    pub fn bool_arg(&self, index: usize) -> bool {
        self.data_type(index) == tags::TRUE
    }

    /// Best-effort numeric projection of argument `index` to f32.
    ///
    /// Dispatches over {f, i, d, h, T}; every other tag coerces to 0.0. This
    /// is a convenience for heterogeneous control messages, not validation.
    pub fn as_float(&self, index: usize) -> f32 {
        match self.data_type(index) {
            tags::FLOAT32 => self.float32(index),
            tags::INT32 => self.int32(index) as f32,
            tags::FLOAT64 => self.float64(index) as f32,
            tags::INT64 => self.int64(index) as f32,
            tags::TRUE => 1.0,
            _ => 0.0,
        }
    }

    /// Best-effort numeric projection of argument `index` to i32.
    pub fn as_int(&self, index: usize) -> i32 {
        match self.data_type(index) {
            tags::FLOAT32 => self.float32(index) as i32,
            tags::INT32 => self.int32(index),
            tags::FLOAT64 => self.float64(index) as i32,
            tags::INT64 => self.int64(index) as i32,
            tags::TRUE => 1,
            _ => 0,
        }
    }

    /// Best-effort projection of argument `index` to bool: floats compare
    /// against 0.5, integers against zero, `'T'` is true, anything else
    /// false.
    pub fn as_bool(&self, index: usize) -> bool {
        match self.data_type(index) {
            tags::FLOAT32 => self.float32(index) > 0.5,
            tags::INT32 => self.int32(index) != 0,
            tags::FLOAT64 => self.float64(index) > 0.5,
            tags::INT64 => self.int64(index) != 0,
            tags::TRUE => true,
            _ => false,
        }
    }

    /// Decode argument `index` with full bounds validation.
    ///
    /// Fails with [`OscError::OutOfBounds`] when `index` is past the argument
    /// count or a payload would pass the buffer end, and with
    /// [`OscError::Unterminated`] when a string payload has no NUL. This is
    /// the validated counterpart of the typed getters above.
    pub fn arg(&self, index: usize) -> Result<OscArg<'_>> {
        if index >= self.arg_count() {
            return Err(OscError::OutOfBounds {
                offset: self.types_at + 1 + index,
                len: 1,
                end: self.data_at,
            });
        }
        let mut off = self.data_at;
        for i in 0..index {
            off += self.try_size_at(self.data_type(i), off)?;
        }
        let tag = self.data_type(index);
        let size = self.try_size_at(tag, off)?;
        let s = self.buf.as_ref();
        Ok(match tag {
            tags::INT32 => OscArg::Int32(i32::from_be_bytes([
                s[off],
                s[off + 1],
                s[off + 2],
                s[off + 3],
            ])),
            tags::FLOAT32 => OscArg::Float32(f32::from_be_bytes([
                s[off],
                s[off + 1],
                s[off + 2],
                s[off + 3],
            ])),
            tags::INT64 => OscArg::Int64(i64::from_be_bytes([
                s[off],
                s[off + 1],
                s[off + 2],
                s[off + 3],
                s[off + 4],
                s[off + 5],
                s[off + 6],
                s[off + 7],
            ])),
            tags::FLOAT64 => OscArg::Float64(f64::from_be_bytes([
                s[off],
                s[off + 1],
                s[off + 2],
                s[off + 3],
                s[off + 4],
                s[off + 5],
                s[off + 6],
                s[off + 7],
            ])),
            tags::STRING | tags::SYMBOL => {
                let len = scan_nul(s, off, self.end).ok_or(OscError::Unterminated {
                    region: "string argument",
                    end: self.end,
                })?;
                let text = std::str::from_utf8(&s[off..off + len]).unwrap_or("");
                if tag == tags::STRING {
                    OscArg::Str(text)
                } else {
                    OscArg::Symbol(text)
                }
            }
            tags::BLOB => OscArg::Blob(&s[off + 4..off + 4 + size]),
            tags::CHAR => OscArg::Char(s[off + 3]),
            tags::RGBA => OscArg::Rgba([s[off], s[off + 1], s[off + 2], s[off + 3]]),
            tags::MIDI => OscArg::Midi([s[off], s[off + 1], s[off + 2], s[off + 3]]),
            tags::TRUE => OscArg::True,
            tags::FALSE => OscArg::False,
            tags::NIL => OscArg::Nil,
            tags::INFINITUM => OscArg::Infinitum,
            other => OscArg::Unknown(other),
        })
    }

    fn try_size_at(&self, tag: u8, off: usize) -> Result<usize> {
        match tag {
            tags::BLOB => {
                self.check_range(off, 4)?;
                let s = self.buf.as_ref();
                let n = u32::from_be_bytes([s[off], s[off + 1], s[off + 2], s[off + 3]]) as usize;
                self.check_range(off + 4, n)?;
                Ok(n)
            }
            tags::STRING | tags::SYMBOL => {
                let s = self.buf.as_ref();
                let len = scan_nul(s, off, self.end).ok_or(OscError::Unterminated {
                    region: "string argument",
                    end: self.end,
                })?;
                let padded = tags::padded_string_length(len);
                self.check_range(off, padded)?;
                Ok(padded)
            }
            _ => {
                let n = tags::fixed_payload_size(tag).unwrap_or(0);
                self.check_range(off, n)?;
                Ok(n)
            }
        }
    }

    fn check_range(&self, offset: usize, len: usize) -> Result<()> {
        let stop = self.end.min(self.buf.as_ref().len());
        match offset.checked_add(len) {
            Some(finish) if finish <= stop => Ok(()),
            _ => Err(OscError::OutOfBounds {
                offset,
                len,
                end: stop,
            }),
        }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> OscMessage<B> {
    /// Write `src` at `at` as a NUL-terminated string padded to the next
    /// 4-byte boundary, clamped to the buffer end. Returns the number of
    /// bytes laid down (the padded length when it fits).
    fn write_padded(&mut self, at: usize, src: &[u8]) -> usize {
        let stop = self.end.min(self.buf.as_ref().len());
        if at >= stop {
            return 0;
        }
        let adv = tags::padded_string_length(src.len()).min(stop - at);
        let copy = src.len().min(adv.saturating_sub(1));
        let buf = self.buf.as_mut();
        buf[at..at + copy].copy_from_slice(&src[..copy]);
        for b in &mut buf[at + copy..at + adv] {
            *b = 0;
        }
        adv
    }

    /// Rewrite the address, preserving an existing type-tag string.
    ///
    /// When a prefix already exists, the tag region is saved to a temporary
    /// sized to the old region, the address is rewritten, and the tags are
    /// re-written at the recomputed type-tag start. Argument payloads are
    /// *not* relocated: after an address-length change their bytes sit at
    /// stale offsets and must be rewritten by the caller.
    pub fn set_address(&mut self, address: &str) {
        if self.data_at > 0 && self.types_at > 0 {
            let s = self.buf.as_ref();
            let hi = self.data_at.min(s.len());
            let lo = self.types_at.min(hi);
            let saved = s[lo..hi].to_vec();

            let adv = self.write_padded(0, address.as_bytes());
            self.types_at = adv;
            let stop = self.end.min(self.buf.as_ref().len());
            let n = saved.len().min(stop.saturating_sub(adv));
            self.buf.as_mut()[adv..adv + n].copy_from_slice(&saved[..n]);
            self.data_at = adv + n;
        } else {
            let adv = self.write_padded(0, address.as_bytes());
            self.types_at = adv;
            self.data_at = adv;
        }
    }

    /// Rewrite the address and type-tag string unconditionally.
    ///
    /// `type_tags` includes the leading comma, e.g. `",if"`. Anything
    /// previously written into the data region is invalidated.
    pub fn set_prefix(&mut self, address: &str, type_tags: &str) {
        let adv = self.write_padded(0, address.as_bytes());
        self.types_at = adv;
        let adv = self.write_padded(self.types_at, type_tags.as_bytes());
        self.data_at = self.types_at + adv;
        trace!(
            address,
            type_tags,
            prefix_length = self.data_at,
            "set osc prefix"
        );
    }

    /// Raw overwrite of `bytes` at argument `index`'s payload offset,
    /// clamped to the buffer end.
    ///
    /// The caller owns size discipline: writing a payload whose size differs
    /// from the slot's corrupts the offsets of every following argument.
    pub fn set_data(&mut self, index: usize, bytes: &[u8]) {
        let off = self.data_offset(index);
        let stop = self.end.min(self.buf.as_ref().len());
        let at = off.min(stop);
        let n = bytes.len().min(stop - at);
        self.buf.as_mut()[at..at + n].copy_from_slice(&bytes[..n]);
    }

    fn write_be<const N: usize>(&mut self, index: usize, bytes: [u8; N]) {
        let off = self.data_offset(index);
        let stop = self.end.min(self.buf.as_ref().len());
        if off.saturating_add(N) <= stop {
            self.buf.as_mut()[off..off + N].copy_from_slice(&bytes);
        }
    }

    /// Big-endian encode an i32 at argument `index`.
    pub fn set_int32(&mut self, index: usize, value: i32) {
        self.write_be(index, value.to_be_bytes());
    }

    /// Big-endian encode an f32 at argument `index`.
    pub fn set_float32(&mut self, index: usize, value: f32) {
        self.write_be(index, value.to_be_bytes());
    }

    /// Big-endian encode an i64 at argument `index`.
    pub fn set_int64(&mut self, index: usize, value: i64) {
        self.write_be(index, value.to_be_bytes());
    }

    /// Big-endian encode an f64 at argument `index`.
    pub fn set_float64(&mut self, index: usize, value: f64) {
        self.write_be(index, value.to_be_bytes());
    }

    /// Set a boolean by rewriting the tag byte to `'T'` or `'F'`; booleans
    /// carry no payload.
    pub fn set_bool(&mut self, index: usize, value: bool) {
        let at = self.types_at + 1 + index;
        let stop = self.end.min(self.buf.as_ref().len());
        if at < stop {
            self.buf.as_mut()[at] = if value { tags::TRUE } else { tags::FALSE };
        }
    }

    /// Write a string argument at `index`: bytes clamped to the buffer end,
    /// then NUL-padded to the next 4-byte boundary. Never writes past the
    /// end.
    pub fn set_string(&mut self, index: usize, value: &str) {
        let off = self.data_offset(index);
        self.write_padded(off, value.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_starts_empty() {
        let buf = [0u8; 64];
        let msg = OscMessage::new(&buf[..]);
        assert_eq!(msg.arg_count(), 0);
        assert_eq!(msg.prefix_length(), 0);
        assert_eq!(msg.message_length(), 0);
        assert_eq!(msg.address(), "");
        assert_eq!(msg.buffer_len(), 64);
    }

    #[test]
    fn set_prefix_lays_out_regions() {
        let mut buf = [0u8; 64];
        let mut msg = OscMessage::new(&mut buf[..]);
        msg.set_prefix("/a", ",ifs");

        assert_eq!(msg.address_length(), 4);
        assert_eq!(msg.type_tag_length(), 8);
        assert_eq!(msg.prefix_length(), 12);
        assert_eq!(msg.arg_count(), 3);
        assert_eq!(msg.data_type(0), b'i');
        assert_eq!(msg.data_type(1), b'f');
        assert_eq!(msg.data_type(2), b's');
        assert_eq!(msg.type_tags(), ",ifs");
    }

    #[test]
    fn written_strings_use_smallest_strictly_greater_multiple_of_4() {
        for (address, padded) in [("/ab", 4), ("/abc", 8), ("/abcdef", 8), ("/abcdefg", 12)] {
            let mut buf = [0u8; 64];
            let mut msg = OscMessage::new(&mut buf[..]);
            msg.set_prefix(address, ",");
            assert_eq!(msg.address_length(), padded, "address {address:?}");
            assert_eq!(msg.address(), address);
        }
    }

    #[test]
    fn synth_freq_scenario() {
        let mut buf = [0u8; 64];
        let mut msg = OscMessage::new(&mut buf[..]);
        msg.set_prefix("/synth/1/freq", ",f");
        msg.set_float32(0, 440.0);

        assert_eq!(msg.address(), "/synth/1/freq");
        assert_eq!(msg.arg_count(), 1);
        assert_eq!(msg.float32(0), 440.0);
        // padded address (16) + padded tags (4) + one f32
        assert_eq!(msg.message_length(), 24);
    }

    #[test]
    fn typed_roundtrips() {
        let mut buf = [0u8; 128];
        let mut msg = OscMessage::new(&mut buf[..]);
        msg.set_prefix("/rt", ",ifhds");
        msg.set_int32(0, -123_456);
        msg.set_float32(1, 3.25);
        msg.set_int64(2, -0x0123_4567_89ab_cdef);
        msg.set_float64(3, 6.022e23);
        msg.set_string(4, "hello");

        assert_eq!(msg.int32(0), -123_456);
        assert_eq!(msg.float32(1), 3.25);
        assert_eq!(msg.int64(2), -0x0123_4567_89ab_cdef);
        assert_eq!(msg.float64(3), 6.022e23);
        assert_eq!(msg.string(4), "hello");
    }

    #[test]
    fn wire_layout_is_big_endian() {
        let mut buf = [0u8; 32];
        let mut msg = OscMessage::new(&mut buf[..]);
        msg.set_prefix("/be", ",i");
        msg.set_int32(0, 0x0102_0304);
        let data_at = msg.prefix_length();
        assert_eq!(&msg.buffer()[data_at..data_at + 4], &[1, 2, 3, 4]);
    }

    #[test]
    fn message_length_is_prefix_plus_payload_sizes() {
        let mut buf = [0u8; 128];
        let mut msg = OscMessage::new(&mut buf[..]);
        msg.set_prefix("/sum", ",ifsh");
        msg.set_int32(0, 1);
        msg.set_float32(1, 2.0);
        msg.set_string(2, "abcde");
        msg.set_int64(3, 3);

        let sum: usize = (0..msg.arg_count()).map(|i| msg.data_size(i)).sum();
        assert_eq!(msg.message_length(), msg.prefix_length() + sum);
        // i32 + f32 + "abcde" padded to 8 + i64
        assert_eq!(sum, 4 + 4 + 8 + 8);
    }

    #[test]
    fn data_offsets_are_sequential() {
        let mut buf = [0u8; 128];
        let mut msg = OscMessage::new(&mut buf[..]);
        msg.set_prefix("/seq", ",sif");
        msg.set_string(0, "abc");
        msg.set_int32(1, 7);
        msg.set_float32(2, 1.5);

        let data = msg.prefix_length();
        assert_eq!(msg.data_offset(0), data);
        assert_eq!(msg.data_offset(1), data + 4);
        assert_eq!(msg.data_offset(2), data + 8);
        assert_eq!(msg.int32(1), 7);
        assert_eq!(msg.float32(2), 1.5);
    }

    #[test]
    fn matches_is_case_insensitive_and_length_bounded() {
        let mut buf = [0u8; 32];
        let mut msg = OscMessage::new(&mut buf[..]);
        msg.set_prefix("/foobar", ",");

        assert!(msg.matches("/foobar"));
        assert!(msg.matches("/FooBar"));
        // prefix match by design, not exact match
        assert!(msg.matches("/foo"));
        assert!(!msg.matches("/foobarbaz"));
        assert!(!msg.matches("/bar"));
    }

    #[test]
    fn parse_recovers_offsets_from_wire_bytes() {
        let mut scratch = [0u8; 64];
        let mut writer = OscMessage::new(&mut scratch[..]);
        writer.set_prefix("/mixer/gain", ",if");
        writer.set_int32(0, 3);
        writer.set_float32(1, 0.5);
        let wire = writer.buffer()[..writer.message_length()].to_vec();

        let mut msg = OscMessage::new(wire.as_slice());
        msg.parse();
        assert_eq!(msg.address(), "/mixer/gain");
        assert_eq!(msg.arg_count(), 2);
        assert_eq!(msg.int32(0), 3);
        assert_eq!(msg.float32(1), 0.5);
    }

    #[test]
    fn missing_type_tag_string_reads_as_zero_arguments() {
        // legacy senders may omit the type-tag string entirely
        let wire = *b"/ping\0\0\0";
        let mut msg = OscMessage::new(&wire[..]);
        msg.parse();
        assert_eq!(msg.address(), "/ping");
        assert_eq!(msg.arg_count(), 0);
        assert_eq!(msg.type_tag_length(), 0);
        assert_eq!(msg.message_length(), 8);

        let mut checked = OscMessage::new(&wire[..]);
        assert_eq!(checked.try_parse(), Ok(()));
        assert_eq!(checked.arg_count(), 0);
    }

    #[test]
    fn blob_size_comes_from_its_length_prefix() {
        let mut buf = [0u8; 64];
        let mut msg = OscMessage::new(&mut buf[..]);
        msg.set_prefix("/blob", ",b");
        let mut payload = Vec::new();
        payload.extend_from_slice(&5u32.to_be_bytes());
        payload.extend_from_slice(b"bytes");
        msg.set_data(0, &payload);

        assert_eq!(msg.data_size(0), 5);
        assert_eq!(msg.blob(0), b"bytes");
        // the prefix is excluded from the reported size by design
        assert_eq!(msg.message_length(), msg.prefix_length() + 5);
    }

    #[test]
    fn set_bool_rewrites_the_tag_byte() {
        let mut buf = [0u8; 32];
        let mut msg = OscMessage::new(&mut buf[..]);
        msg.set_prefix("/mute", ",F");

        msg.set_bool(0, true);
        assert_eq!(msg.data_type(0), b'T');
        assert_eq!(msg.data_size(0), 0);
        assert!(msg.bool_arg(0));

        msg.set_bool(0, false);
        assert_eq!(msg.data_type(0), b'F');
        assert!(!msg.bool_arg(0));
    }

    #[test]
    fn set_address_preserves_type_tags() {
        let mut buf = [0u8; 64];
        let mut msg = OscMessage::new(&mut buf[..]);
        msg.set_prefix("/a", ",if");

        msg.set_address("/much/longer/address");
        assert_eq!(msg.address(), "/much/longer/address");
        assert_eq!(msg.arg_count(), 2);
        assert_eq!(msg.data_type(0), b'i');
        assert_eq!(msg.data_type(1), b'f');
    }

    #[test]
    fn set_address_with_same_padded_length_keeps_payloads() {
        let mut buf = [0u8; 64];
        let mut msg = OscMessage::new(&mut buf[..]);
        msg.set_prefix("/a", ",i");
        msg.set_int32(0, 41);

        msg.set_address("/b");
        assert_eq!(msg.address(), "/b");
        assert_eq!(msg.int32(0), 41);
    }

    #[test]
    fn set_address_without_existing_prefix_collapses_regions() {
        let mut buf = [0u8; 32];
        let mut msg = OscMessage::new(&mut buf[..]);
        msg.set_address("/solo");
        assert_eq!(msg.address(), "/solo");
        assert_eq!(msg.type_tag_length(), 0);
        assert_eq!(msg.arg_count(), 0);
    }

    #[test]
    fn clear_resets_regions_but_keeps_capacity() {
        let mut buf = [0u8; 32];
        let mut msg = OscMessage::new(&mut buf[..]);
        msg.set_prefix("/x", ",i");
        msg.clear();
        assert_eq!(msg.prefix_length(), 0);
        assert_eq!(msg.arg_count(), 0);

        msg.set_prefix("/y", ",f");
        msg.set_float32(0, 2.0);
        assert_eq!(msg.float32(0), 2.0);
    }

    #[test]
    fn coercing_getters_project_across_types() {
        let mut buf = [0u8; 128];
        let mut msg = OscMessage::new(&mut buf[..]);
        msg.set_prefix("/c", ",ifdhTs");
        msg.set_int32(0, 3);
        msg.set_float32(1, 0.4);
        msg.set_float64(2, 2.5);
        msg.set_int64(3, 0);
        msg.set_string(5, "nan");

        assert_eq!(msg.as_float(0), 3.0);
        assert_eq!(msg.as_int(1), 0);
        assert_eq!(msg.as_int(2), 2);
        assert_eq!(msg.as_float(4), 1.0);
        assert_eq!(msg.as_int(4), 1);

        assert!(msg.as_bool(0)); // 3 != 0
        assert!(!msg.as_bool(1)); // 0.4 <= 0.5
        assert!(msg.as_bool(2)); // 2.5 > 0.5
        assert!(!msg.as_bool(3)); // 0 == 0
        assert!(msg.as_bool(4)); // T
        // strings coerce to defaults
        assert_eq!(msg.as_float(5), 0.0);
        assert_eq!(msg.as_int(5), 0);
        assert!(!msg.as_bool(5));
    }

    #[test]
    fn try_parse_rejects_unterminated_address() {
        let wire = [b'A'; 16];
        let mut msg = OscMessage::new(&wire[..]);
        assert_eq!(
            msg.try_parse(),
            Err(OscError::Unterminated {
                region: "address",
                end: 16
            })
        );
    }

    #[test]
    fn try_parse_rejects_unterminated_type_tags() {
        let mut wire = *b"/ok\0,iii,iii";
        // kill every NUL after the address
        wire[4..].iter_mut().for_each(|b| *b = b'i');
        let mut msg = OscMessage::new(&wire[..]);
        assert_eq!(
            msg.try_parse(),
            Err(OscError::Unterminated {
                region: "type tags",
                end: 12
            })
        );
    }

    #[test]
    fn checked_arg_decodes_every_tag() {
        let mut buf = [0u8; 160];
        let mut msg = OscMessage::new(&mut buf[..]);
        msg.set_prefix("/all", ",ifhdsTFNI");
        msg.set_int32(0, 9);
        msg.set_float32(1, 1.25);
        msg.set_int64(2, 10);
        msg.set_float64(3, 0.125);
        msg.set_string(4, "hi");

        assert_eq!(msg.arg(0), Ok(OscArg::Int32(9)));
        assert_eq!(msg.arg(1), Ok(OscArg::Float32(1.25)));
        assert_eq!(msg.arg(2), Ok(OscArg::Int64(10)));
        assert_eq!(msg.arg(3), Ok(OscArg::Float64(0.125)));
        assert_eq!(msg.arg(4), Ok(OscArg::Str("hi")));
        assert_eq!(msg.arg(5), Ok(OscArg::True));
        assert_eq!(msg.arg(6), Ok(OscArg::False));
        assert_eq!(msg.arg(7), Ok(OscArg::Nil));
        assert_eq!(msg.arg(8), Ok(OscArg::Infinitum));
        assert!(matches!(msg.arg(9), Err(OscError::OutOfBounds { .. })));
    }

    #[test]
    fn checked_arg_decodes_fixed_quad_tags() {
        let mut buf = [0u8; 64];
        let mut msg = OscMessage::new(&mut buf[..]);
        msg.set_prefix("/q", ",crm");
        msg.set_data(0, &[0, 0, 0, b'x']);
        msg.set_data(1, &[0x10, 0x20, 0x30, 0x40]);
        msg.set_data(2, &[0x00, 0x90, 0x3c, 0x7f]);

        assert_eq!(msg.arg(0), Ok(OscArg::Char(b'x')));
        assert_eq!(msg.arg(1), Ok(OscArg::Rgba([0x10, 0x20, 0x30, 0x40])));
        assert_eq!(msg.arg(2), Ok(OscArg::Midi([0x00, 0x90, 0x3c, 0x7f])));
    }

    #[test]
    fn checked_arg_rejects_truncated_payload() {
        // prefix says 100 bytes but the buffer ends long before that
        let mut wire = Vec::new();
        wire.extend_from_slice(b"/t\0\0,b\0\0");
        wire.extend_from_slice(&100u32.to_be_bytes());
        wire.extend_from_slice(b"xy");
        let mut msg = OscMessage::new(wire.as_slice());
        msg.try_parse().unwrap();
        assert!(matches!(msg.arg(0), Err(OscError::OutOfBounds { .. })));
    }

    #[test]
    fn checked_arg_rejects_unterminated_string_payload() {
        let mut wire = Vec::new();
        wire.extend_from_slice(b"/t\0\0,s\0\0");
        wire.extend_from_slice(b"xxxx"); // no NUL before end
        let mut msg = OscMessage::new(wire.as_slice());
        msg.try_parse().unwrap();
        assert_eq!(
            msg.arg(0),
            Err(OscError::Unterminated {
                region: "string argument",
                end: 12
            })
        );
    }

    #[test]
    fn unknown_tags_decode_as_unknown_with_no_payload() {
        let mut buf = [0u8; 32];
        let mut msg = OscMessage::new(&mut buf[..]);
        msg.set_prefix("/u", ",qi");
        msg.set_int32(1, 5);

        assert_eq!(msg.arg(0), Ok(OscArg::Unknown(b'q')));
        assert_eq!(msg.data_size(0), 0);
        assert_eq!(msg.arg(1), Ok(OscArg::Int32(5)));
    }

    #[test]
    fn set_string_never_writes_past_end() {
        let mut buf = [0u8; 12];
        let mut msg = OscMessage::new(&mut buf[..]);
        msg.set_prefix("/a", ",s");
        msg.set_string(0, "this-is-way-too-long");
        // 4 bytes remain after the prefix; the last one is the terminator
        assert_eq!(msg.string(0), "thi");
    }

    #[test]
    fn writes_into_full_buffer_are_dropped() {
        let mut buf = [0u8; 8];
        let mut msg = OscMessage::new(&mut buf[..]);
        msg.set_prefix("/full", ",i");
        // the prefix consumed the whole buffer; the i32 slot does not fit
        msg.set_int32(0, 77);
        assert_eq!(msg.int32(0), 0);
    }

    #[test]
    fn out_of_range_reads_yield_zero_values() {
        let mut buf = [0u8; 16];
        let mut msg = OscMessage::new(&mut buf[..]);
        msg.set_prefix("/z", ",i");
        assert_eq!(msg.int32(3), 0);
        assert_eq!(msg.float64(3), 0.0);
        assert_eq!(msg.string(3), "");
        assert_eq!(msg.data_type(9), 0);
    }

    #[test]
    fn bytesmut_can_back_the_view() {
        let mut storage = bytes::BytesMut::zeroed(64);
        let mut msg = OscMessage::new(&mut storage[..]);
        msg.set_prefix("/bm", ",i");
        msg.set_int32(0, 1234);
        let len = msg.message_length();
        drop(msg);

        storage.truncate(len);
        let mut reread = OscMessage::new(&storage[..]);
        reread.try_parse().unwrap();
        assert_eq!(reread.int32(0), 1234);
    }

    #[test]
    fn osc_arg_reports_its_tag() {
        assert_eq!(OscArg::Int32(1).tag(), b'i');
        assert_eq!(OscArg::Str("x").tag(), b's');
        assert_eq!(OscArg::True.tag(), b'T');
        assert_eq!(OscArg::Unknown(b'z').tag(), b'z');
    }
}
