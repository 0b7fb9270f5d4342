//! Deterministic certificate identifiers.
//!
//! Two runs that certify the same parameters MUST produce the same ID, and
//! any change to a parameter or a count MUST change it.
//!
//! Algorithm:
//! 1. Build the canonical certificate key (schema, parameters, cumulative counts)
//! 2. Serialize via RFC 8785 (JCS): sorted keys, no whitespace
//! 3. certificateId = "c1_" || base32hex_lower(SHA256(keyBytes))

use num::BigUint;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

pub const CERTIFICATE_SCHEMA: u64 = 1;

/// Parameters and counts that identify a certificate.
#[derive(Debug, Clone, Copy)]
pub struct CertificateKey<'a> {
    pub alphabet_size: u32,
    pub bound: u32,
    pub from_depth: u32,
    pub to_depth: u32,
    pub cumulative_admissible: &'a BigUint,
    pub cumulative_blocked: &'a BigUint,
}

/// Compute the certificate ID for a key.
pub fn compute_certificate_id(key: &CertificateKey<'_>) -> String {
    let canonical = canonical_certificate_key(key);
    let hash = Sha256::digest(jcs_serialize_value(&canonical));
    format!("c1_{}", base32hex_lower_no_pad(&hash))
}

/// Counts go in as decimal strings so the key never depends on JSON number
/// precision.
fn canonical_certificate_key(key: &CertificateKey<'_>) -> Value {
    let mut map = Map::new();
    map.insert("schema".to_string(), Value::from(CERTIFICATE_SCHEMA));
    map.insert("alphabetSize".to_string(), Value::from(key.alphabet_size));
    map.insert("bound".to_string(), Value::from(key.bound));
    map.insert("fromDepth".to_string(), Value::from(key.from_depth));
    map.insert("toDepth".to_string(), Value::from(key.to_depth));
    map.insert(
        "cumulativeAdmissible".to_string(),
        Value::String(key.cumulative_admissible.to_str_radix(10)),
    );
    map.insert(
        "cumulativeBlocked".to_string(),
        Value::String(key.cumulative_blocked.to_str_radix(10)),
    );
    Value::Object(map)
}

/// RFC 8785 serialization with lexicographic key ordering.
///
/// The key only holds integers and strings, so integer formatting is the
/// only number form handled specially.
fn jcs_serialize_value(value: &Value) -> Vec<u8> {
    match value {
        Value::Null => b"null".to_vec(),
        Value::Bool(true) => b"true".to_vec(),
        Value::Bool(false) => b"false".to_vec(),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u.to_string().into_bytes()
            } else if let Some(i) = n.as_i64() {
                i.to_string().into_bytes()
            } else {
                n.to_string().into_bytes()
            }
        }
        // Display on a string Value is its escaped JSON form.
        Value::String(_) => value.to_string().into_bytes(),
        Value::Array(items) => {
            let mut buf = vec![b'['];
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                buf.extend_from_slice(&jcs_serialize_value(item));
            }
            buf.push(b']');
            buf
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            let mut buf = vec![b'{'];
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                buf.extend_from_slice(Value::String((*key).clone()).to_string().as_bytes());
                buf.push(b':');
                buf.extend_from_slice(&jcs_serialize_value(&map[*key]));
            }
            buf.push(b'}');
            buf
        }
    }
}

/// RFC 4648 base32hex, lowercase, without padding.
fn base32hex_lower_no_pad(data: &[u8]) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuv";

    let mut result = String::with_capacity(data.len() * 8 / 5 + 1);
    let mut bits: u64 = 0;
    let mut num_bits: u32 = 0;

    for &byte in data {
        bits = (bits << 8) | u64::from(byte);
        num_bits += 8;
        while num_bits >= 5 {
            num_bits -= 5;
            result.push(ALPHABET[((bits >> num_bits) & 0x1f) as usize] as char);
        }
    }
    if num_bits > 0 {
        result.push(ALPHABET[((bits << (5 - num_bits)) & 0x1f) as usize] as char);
    }
    result
}
