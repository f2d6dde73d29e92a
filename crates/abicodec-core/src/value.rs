//! Decoded and to-be-encoded ABI values.
//!
//! [`Value`] is the single value representation shared by the encoder, the
//! decoder and the log splitter. Integer widths of 8, 16, 32 and 64 bits use
//! the native variants; every other width uses the 256-bit variants.

use alloy_primitives::{Address, I256, U256};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::types::FUNCTION_LEN;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Uint(u64),
    BigUint(U256),
    Int(i64),
    BigInt(I256),
    Address(Address),
    /// `bytes1` .. `bytes32`, exactly the declared length.
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    /// Address followed by a 4-byte selector.
    Function([u8; FUNCTION_LEN]),
    Str(String),
    /// Elements of a fixed array or a slice.
    Array(Vec<Value>),
    /// Tuple members keyed by name, or by position when unnamed.
    Tuple(IndexMap<String, Value>),
}

impl Value {
    /// Short kind name used in mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Uint(_) => "uint",
            Value::BigUint(_) => "big uint",
            Value::Int(_) => "int",
            Value::BigInt(_) => "big int",
            Value::Address(_) => "address",
            Value::FixedBytes(_) => "fixed bytes",
            Value::Bytes(_) => "bytes",
            Value::Function(_) => "function",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Tuple(_) => "tuple",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Uint(v) => Some(*v),
            Value::BigUint(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::BigInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Any unsigned integer value widened to 256 bits.
    pub fn as_u256(&self) -> Option<U256> {
        match self {
            Value::Uint(v) => Some(U256::from(*v)),
            Value::BigUint(v) => Some(*v),
            _ => None,
        }
    }

    /// Any signed integer value widened to 256 bits.
    pub fn as_i256(&self) -> Option<I256> {
        match self {
            Value::Int(v) => I256::try_from(*v).ok(),
            Value::BigInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            Value::Address(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Byte content of `Bytes`, `FixedBytes` and `Function` values.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) | Value::FixedBytes(b) => Some(b),
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Tuple(fields) => Some(fields),
            _ => None,
        }
    }

    /// Member of a tuple by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_tuple().and_then(|fields| fields.get(key))
    }

    /// Build a tuple from `(key, value)` pairs in order.
    pub fn tuple<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Tuple(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<U256> for Value {
    fn from(v: U256) -> Self {
        Value::BigUint(v)
    }
}

impl From<I256> for Value {
    fn from(v: I256) -> Self {
        Value::BigInt(v)
    }
}

impl From<Address> for Value {
    fn from(v: Address) -> Self {
        Value::Address(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

/// Plain JSON: big integers as decimal strings, byte values as `0x` hex,
/// addresses checksummed, tuples as objects in declaration order.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Uint(v) => serializer.serialize_u64(*v),
            Value::BigUint(v) => serializer.serialize_str(&v.to_string()),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::BigInt(v) => serializer.serialize_str(&v.to_string()),
            Value::Address(a) => serializer.serialize_str(&a.to_checksum(None)),
            Value::FixedBytes(b) | Value::Bytes(b) => {
                serializer.serialize_str(&format!("0x{}", hex::encode(b)))
            }
            Value::Function(f) => serializer.serialize_str(&format!("0x{}", hex::encode(f))),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Tuple(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Uint(v) => write!(f, "{v}"),
            Value::BigUint(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::BigInt(v) => write!(f, "{v}"),
            Value::Address(a) => write!(f, "{}", a.to_checksum(None)),
            Value::FixedBytes(b) | Value::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            Value::Function(b) => write!(f, "0x{}", hex::encode(b)),
            Value::Str(s) => write!(f, "{s}"),
            Value::Array(items) => {
                let parts: Vec<_> = items.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Value::Tuple(fields) => {
                let parts: Vec<_> = fields.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn serializes_as_plain_json() {
        let value = Value::tuple([
            ("to", Value::Address(address!("7a64be40b9f2412fbadeb519b2d119ec59d8e0cd"))),
            ("amount", Value::BigUint(U256::from(10u64).pow(U256::from(21u64)))),
            ("delta", Value::BigInt(I256::MINUS_ONE)),
            ("flags", Value::Array(vec![Value::Bool(true), Value::Uint(7)])),
            ("memo", Value::Bytes(vec![0xde, 0xad])),
        ]);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "to": "0x7a64BE40B9f2412FBaDeB519B2d119eC59D8e0CD",
                "amount": "1000000000000000000000",
                "delta": "-1",
                "flags": [true, 7],
                "memo": "0xdead",
            })
        );
    }

    #[test]
    fn tuple_keeps_declaration_order() {
        let value = Value::tuple([("z", Value::Uint(1)), ("a", Value::Uint(2))]);
        let keys: Vec<_> = value.as_tuple().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
        assert_eq!(value.to_string(), "{z: 1, a: 2}");
    }

    #[test]
    fn widening_accessors() {
        assert_eq!(Value::Uint(5).as_u256(), Some(U256::from(5u64)));
        assert_eq!(Value::Int(-5).as_i256(), Some(I256::try_from(-5i64).unwrap()));
        assert_eq!(Value::BigUint(U256::from(9u64)).as_u64(), Some(9));
        assert_eq!(Value::BigUint(U256::MAX).as_u64(), None);
        assert_eq!(Value::Str("x".into()).as_u64(), None);
        assert_eq!(Value::Function([1; 24]).as_bytes().map(<[u8]>::len), Some(24));
    }
}
