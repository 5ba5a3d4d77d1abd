//! Canonical CBOR encoding for deterministic block hashing.
//!
//! Event payloads are lowered to a CBOR value through serde and then encoded
//! with RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats, no tags
//!
//! **This encoding is frozen.** Every implementation sharing a chain must
//! produce identical bytes, or hash verification breaks.

use ciborium::value::{Integer, Value};
use serde::Serialize;

use crate::crypto::BlockHash;
use crate::error::CoreError;
use crate::event::CheckoutEvent;

/// Encode a checkout event to canonical CBOR bytes.
pub fn canonical_event_bytes(event: &CheckoutEvent) -> Result<Vec<u8>, CoreError> {
    canonical_bytes(event)
}

/// Encode any serializable value to canonical CBOR bytes.
pub fn canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CoreError> {
    let value = Value::serialized(value).map_err(|e| CoreError::Serialization(e.to_string()))?;
    let mut buf = Vec::new();
    encode_value(&mut buf, &value)?;
    Ok(buf)
}

/// Build the exact byte string fed to SHA-256 for a block.
///
/// `decimal(position) || timestamp || canonical(data) || prev_hash_hex`
///
/// `prev_hash_hex` is empty for the genesis block.
pub fn digest_input(
    position: u64,
    timestamp: &str,
    data: &[u8],
    prev_hash: Option<&BlockHash>,
) -> Vec<u8> {
    let position = position.to_string();
    let prev_hex = prev_hash.map(BlockHash::to_hex).unwrap_or_default();

    let mut buf =
        Vec::with_capacity(position.len() + timestamp.len() + data.len() + prev_hex.len());
    buf.extend_from_slice(position.as_bytes());
    buf.extend_from_slice(timestamp.as_bytes());
    buf.extend_from_slice(data);
    buf.extend_from_slice(prev_hex.as_bytes());
    buf
}

/// Recursively encode a CBOR value.
fn encode_value(buf: &mut Vec<u8>, value: &Value) -> Result<(), CoreError> {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::Text(s) => encode_text(buf, s),
        Value::Array(arr) => encode_array(buf, arr)?,
        Value::Map(entries) => encode_map_canonical(buf, entries)?,
        Value::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Null => buf.push(0xf6),
        Value::Float(_) => {
            return Err(CoreError::Serialization(
                "floats not supported in canonical encoding".into(),
            ))
        }
        _ => {
            return Err(CoreError::Serialization(
                "unsupported CBOR value type".into(),
            ))
        }
    }
    Ok(())
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: Integer) {
    let n: i128 = i.into();

    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // -1 encodes as 0, -2 as 1, ...
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode an array (major type 4).
fn encode_array(buf: &mut Vec<u8>, arr: &[Value]) -> Result<(), CoreError> {
    encode_uint(buf, 4, arr.len() as u64);
    for item in arr {
        encode_value(buf, item)?;
    }
    Ok(())
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison. Duplicate keys are an error.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) -> Result<(), CoreError> {
    let mut pairs: Vec<(Vec<u8>, &Value)> = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        let mut key_buf = Vec::new();
        encode_value(&mut key_buf, k)?;
        pairs.push((key_buf, v));
    }

    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    if pairs.windows(2).any(|w| w[0].0 == w[1].0) {
        return Err(CoreError::Serialization("duplicate map key".into()));
    }

    encode_uint(buf, 5, pairs.len() as u64);
    for (key_bytes, value) in pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value(buf, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_event_encoding_exact_bytes() {
        let event = CheckoutEvent::new("b1", "u1", "2024-01-01");
        let bytes = canonical_event_bytes(&event).unwrap();

        // Keys ordered by encoded length first: user, book_id, is_genesis, checkout_date
        let expected = "a4\
            6475736572\
            627531\
            67626f6f6b5f6964\
            626231\
            6a69735f67656e65736973\
            f4\
            6d636865636b6f75745f64617465\
            6a323032342d30312d3031";
        assert_eq!(hex::encode(&bytes), expected);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let event = CheckoutEvent::new("book", "reader", "2024-02-29");
        assert_eq!(
            canonical_event_bytes(&event).unwrap(),
            canonical_event_bytes(&event.clone()).unwrap()
        );
    }

    #[test]
    fn test_map_key_order_independent_of_insertion() {
        let mut a = BTreeMap::new();
        a.insert("zz", 1u8);
        a.insert("a", 2u8);

        let value_a = Value::Map(vec![
            (Value::Text("zz".into()), Value::Integer(1.into())),
            (Value::Text("a".into()), Value::Integer(2.into())),
        ]);
        let value_b = Value::Map(vec![
            (Value::Text("a".into()), Value::Integer(2.into())),
            (Value::Text("zz".into()), Value::Integer(1.into())),
        ]);

        let mut buf_a = Vec::new();
        let mut buf_b = Vec::new();
        encode_value(&mut buf_a, &value_a).unwrap();
        encode_value(&mut buf_b, &value_b).unwrap();

        assert_eq!(buf_a, buf_b);
        assert_eq!(canonical_bytes(&a).unwrap(), buf_a);
    }

    #[test]
    fn test_integer_smallest_encoding() {
        let cases: [(i64, &str); 6] = [
            (0, "00"),
            (23, "17"),
            (24, "1818"),
            (256, "190100"),
            (-1, "20"),
            (-25, "3818"),
        ];
        for (n, expected) in cases {
            assert_eq!(hex::encode(canonical_bytes(&n).unwrap()), expected, "n = {n}");
        }
    }

    #[test]
    fn test_floats_rejected() {
        let result = canonical_bytes(&1.5f64);
        assert!(matches!(result, Err(CoreError::Serialization(_))));
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let value = Value::Map(vec![
            (Value::Text("k".into()), Value::Null),
            (Value::Text("k".into()), Value::Null),
        ]);
        let mut buf = Vec::new();
        assert!(matches!(
            encode_value(&mut buf, &value),
            Err(CoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_digest_input_layout() {
        let prev = BlockHash::from_bytes([0x01; 32]);
        let input = digest_input(12, "T", b"DATA", Some(&prev));

        let mut expected = b"12TDATA".to_vec();
        expected.extend_from_slice(prev.to_hex().as_bytes());
        assert_eq!(input, expected);

        assert_eq!(digest_input(0, "T", b"D", None), b"0TD".to_vec());
    }
}
