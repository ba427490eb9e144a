//! Values stored in a layer's schemaless user-data dictionary.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
    /// Raw bytes, serialized as a binary blob rather than an integer array.
    Data(#[serde(with = "serde_bytes")] Vec<u8>),
    List(Vec<Value>),
}

impl Value {
    /// Numeric view. Strings are parsed, since hosts often store numbers as text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::String(s) => s.trim().parse().ok(),
            Value::Data(_) | Value::List(_) => None,
        }
    }

    pub fn as_data(&self) -> Option<&[u8]> {
        match self {
            Value::Data(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_coerce() {
        assert_eq!(Value::Int(10).as_f64(), Some(10.0));
        assert_eq!(Value::String(" 1.5 ".into()).as_f64(), Some(1.5));
        assert_eq!(Value::String("wide".into()).as_f64(), None);
        assert_eq!(Value::Data(vec![1]).as_f64(), None);
    }

    #[test]
    fn data_is_a_msgpack_blob() {
        let value = Value::Data(vec![200; 256]);
        let bytes = rmp_serde::to_vec(&value).unwrap();
        // An integer array would spend two bytes per element.
        assert!(bytes.len() < 256 + 16, "encoded to {} bytes", bytes.len());
        assert!(bytes.windows(3).any(|w| w == [0xc5, 0x01, 0x00]));
        let back: Value = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn typed_views() {
        assert_eq!(Value::Data(vec![1, 2]).as_data(), Some(&[1u8, 2][..]));
        assert!(Value::Float(1.0).as_list().is_none());
    }
}
