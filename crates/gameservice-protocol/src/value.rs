//! Structured values carried in frame payloads.
//!
//! Three shapes exist on the wire, each introduced by a one-byte tag:
//!
//! | Tag          | Shape                                       |
//! |--------------|---------------------------------------------|
//! | `'s'` `0x73` | UTF-8 bytes, terminated by `0x00`           |
//! | `'b'` `0x62` | 4-byte big-endian length, then that many bytes |
//! | `'['` `0x5B` | nested values until the matching `']'` `0x5D` |
//!
//! A payload is the concatenation of its top-level values. The list that
//! conceptually wraps them is written without its outer brackets.

use std::fmt;

use crate::ProtocolError;

const TAG_STRING: u8 = b's';
const TAG_BINARY: u8 = b'b';
const TAG_LIST_OPEN: u8 = b'[';
const TAG_LIST_CLOSE: u8 = b']';

/// Deepest list nesting the decoder accepts.
pub const MAX_DEPTH: usize = 256;

/// Block size of the symmetric cipher; bounds the zero padding
/// [`decode_padded`] tolerates.
const PADDING_LIMIT: usize = 8;

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A single structured value.
///
/// `String` contents must not contain `0x00`; the terminator would cut
/// them short on the other side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Binary(Vec<u8>),
    List(Vec<Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            Self::String(s) => {
                out.push(TAG_STRING);
                out.extend_from_slice(s.as_bytes());
                out.push(0x00);
            }
            Self::Binary(bytes) => {
                out.push(TAG_BINARY);
                out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
                out.extend_from_slice(bytes);
            }
            Self::List(items) => {
                out.push(TAG_LIST_OPEN);
                for item in items {
                    item.encode_into(out);
                }
                out.push(TAG_LIST_CLOSE);
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Binary(bytes)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Binary(bytes) => {
                f.write_str("b'")?;
                for byte in bytes.iter().take(32) {
                    write!(f, "{byte:02x}")?;
                }
                if bytes.len() > 32 {
                    write!(f, "..(+{})", bytes.len() - 32)?;
                }
                f.write_str("'")
            }
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Payload encode / decode
// ---------------------------------------------------------------------------

/// Serializes top-level values into a payload (no outer brackets).
pub fn encode(values: &[Value]) -> Vec<u8> {
    let mut out = Vec::new();
    for value in values {
        value.encode_into(&mut out);
    }
    out
}

/// Parses a payload into its top-level values.
///
/// Fails on the first byte that is not a valid continuation; the rest of
/// the buffer is not inspected.
pub fn decode(bytes: &[u8]) -> Result<Vec<Value>, ProtocolError> {
    decode_top_level(bytes, false)
}

/// Like [`decode`], but tolerates a tail of fewer than 8 zero bytes left
/// by block-cipher padding.
pub fn decode_padded(bytes: &[u8]) -> Result<Vec<Value>, ProtocolError> {
    decode_top_level(bytes, true)
}

fn decode_top_level(
    bytes: &[u8],
    padded: bool,
) -> Result<Vec<Value>, ProtocolError> {
    let mut reader = Reader { buf: bytes, pos: 0 };
    let mut values = Vec::new();

    while reader.pos < bytes.len() {
        if padded && reader.is_padding() {
            break;
        }
        values.push(reader.value(0)?);
    }

    Ok(values)
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn is_padding(&self) -> bool {
        let rest = &self.buf[self.pos..];
        rest.len() < PADDING_LIMIT && rest.iter().all(|&b| b == 0)
    }

    fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ProtocolError> {
        let remaining = self.buf.len() - self.pos;
        if remaining < n {
            return Err(corrupt(format!(
                "needed {n} bytes at offset {}, {remaining} left",
                self.pos
            )));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn value(&mut self, depth: usize) -> Result<Value, ProtocolError> {
        let offset = self.pos;
        let tag = self.take(1)?[0];

        match tag {
            TAG_STRING => {
                let rest = &self.buf[self.pos..];
                let end = rest.iter().position(|&b| b == 0).ok_or_else(|| {
                    corrupt(format!("unterminated string at offset {offset}"))
                })?;
                let s = std::str::from_utf8(&rest[..end]).map_err(|e| {
                    corrupt(format!("string at offset {offset}: {e}"))
                })?;
                self.pos += end + 1;
                Ok(Value::String(s.to_owned()))
            }
            TAG_BINARY => {
                let len = self.take(4)?;
                let len = u32::from_be_bytes([len[0], len[1], len[2], len[3]]);
                let data = self.take(len as usize)?;
                Ok(Value::Binary(data.to_vec()))
            }
            TAG_LIST_OPEN => {
                if depth >= MAX_DEPTH {
                    return Err(corrupt(format!(
                        "list nesting deeper than {MAX_DEPTH} at offset {offset}"
                    )));
                }
                let mut items = Vec::new();
                loop {
                    match self.peek() {
                        None => {
                            return Err(corrupt(format!(
                                "unclosed list starting at offset {offset}"
                            )));
                        }
                        Some(TAG_LIST_CLOSE) => {
                            self.pos += 1;
                            break;
                        }
                        Some(_) => items.push(self.value(depth + 1)?),
                    }
                }
                Ok(Value::List(items))
            }
            TAG_LIST_CLOSE => Err(corrupt(format!(
                "unexpected list terminator at offset {offset}"
            ))),
            other => Err(corrupt(format!(
                "unknown tag 0x{other:02x} at offset {offset}"
            ))),
        }
    }
}

fn corrupt(detail: String) -> ProtocolError {
    ProtocolError::CorruptPayload(detail)
}

// ---------------------------------------------------------------------------
// Typed accessors
// ---------------------------------------------------------------------------

/// Returns the string at `index`, or [`ProtocolError::MissingField`].
pub fn string_at(values: &[Value], index: usize) -> Result<&str, ProtocolError> {
    values
        .get(index)
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingField {
            index,
            expected: "string",
        })
}

pub fn binary_at(values: &[Value], index: usize) -> Result<&[u8], ProtocolError> {
    values
        .get(index)
        .and_then(Value::as_bytes)
        .ok_or(ProtocolError::MissingField {
            index,
            expected: "binary",
        })
}

pub fn list_at(values: &[Value], index: usize) -> Result<&[Value], ProtocolError> {
    values
        .get(index)
        .and_then(Value::as_list)
        .ok_or(ProtocolError::MissingField {
            index,
            expected: "list",
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Value {
        Value::from(v)
    }

    #[test]
    fn test_encode_string() {
        assert_eq!(encode(&[s("abc")]), b"sabc\x00");
    }

    #[test]
    fn test_encode_binary_length_is_big_endian() {
        let bytes = encode(&[Value::Binary(vec![0xAA; 3])]);
        assert_eq!(bytes, [b'b', 0, 0, 0, 3, 0xAA, 0xAA, 0xAA]);
    }

    #[test]
    fn test_top_level_has_no_outer_brackets() {
        let payload = encode(&[s("1"), Value::List(vec![s("a"), Value::List(vec![])])]);
        assert_eq!(payload, b"s1\x00[sa\x00[]]");
    }

    #[test]
    fn test_decode_nested() {
        let decoded = decode(b"s1\x00[sa\x00b\x00\x00\x00\x01\xff[]]").unwrap();
        assert_eq!(
            decoded,
            vec![
                s("1"),
                Value::List(vec![
                    s("a"),
                    Value::Binary(vec![0xFF]),
                    Value::List(vec![]),
                ]),
            ]
        );
    }

    #[test]
    fn test_decode_empty_payload() {
        assert!(decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_tag_is_corrupt() {
        let err = decode(b"sa\x00Lxxxx").unwrap_err();
        assert!(matches!(err, ProtocolError::CorruptPayload(_)));
        assert!(err.to_string().contains("0x4c"));
    }

    #[test]
    fn test_truncated_binary_is_corrupt() {
        // Declares 16 bytes, carries 2.
        let err = decode(b"b\x00\x00\x00\x10ab").unwrap_err();
        assert!(matches!(err, ProtocolError::CorruptPayload(_)));
    }

    #[test]
    fn test_unterminated_string_is_corrupt() {
        assert!(decode(b"sabc").is_err());
    }

    #[test]
    fn test_unclosed_list_is_corrupt() {
        assert!(decode(b"[sa\x00").is_err());
    }

    #[test]
    fn test_stray_close_is_corrupt() {
        assert!(decode(b"sa\x00]").is_err());
    }

    #[test]
    fn test_invalid_utf8_is_corrupt() {
        assert!(decode(b"s\xff\xfe\x00").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let mut deep = vec![b'['; MAX_DEPTH];
        deep.extend(vec![b']'; MAX_DEPTH]);
        assert!(decode(&deep).is_ok());

        let mut too_deep = vec![b'['; MAX_DEPTH + 1];
        too_deep.extend(vec![b']'; MAX_DEPTH + 1]);
        assert!(decode(&too_deep).is_err());
    }

    #[test]
    fn test_padded_accepts_zero_tail() {
        let mut payload = encode(&[s("abc")]);
        payload.extend([0u8; 3]);
        assert_eq!(decode_padded(&payload).unwrap(), vec![s("abc")]);
        // The strict decoder sees 0x00 as an unknown tag.
        assert!(decode(&payload).is_err());
    }

    #[test]
    fn test_padded_rejects_long_zero_tail() {
        let mut payload = encode(&[s("abc")]);
        payload.extend([0u8; 8]);
        assert!(decode_padded(&payload).is_err());
    }

    #[test]
    fn test_accessors() {
        let values = vec![s("x"), Value::Binary(vec![1]), Value::List(vec![])];
        assert_eq!(string_at(&values, 0).unwrap(), "x");
        assert_eq!(binary_at(&values, 1).unwrap(), &[1]);
        assert!(list_at(&values, 2).unwrap().is_empty());

        let err = string_at(&values, 1).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::MissingField { index: 1, expected: "string" }
        ));
        assert!(list_at(&values, 9).is_err());
    }

    #[test]
    fn test_display_is_readable() {
        let value = Value::List(vec![s("a"), Value::Binary(vec![0x0f, 0xa0])]);
        assert_eq!(value.to_string(), "[\"a\", b'0fa0']");
    }
}
