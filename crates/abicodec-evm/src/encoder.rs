//! Head/tail ABI encoder.
//!
//! Converts a [`Value`] into the byte layout a contract expects for a given
//! [`Type`]. Static members of a tuple or array are written in place; each
//! dynamic member writes an offset word (relative to the start of the
//! enclosing region) and its own encoding is appended after the head.
//!
//! # Usage
//! ```ignore
//! let ty = Type::parse("tuple(address dst, uint256 wad)")?;
//! let data = encoder::encode(&ty, &Value::tuple([
//!     ("dst", Value::Str("0x7a64BE40B9f2412FBaDeB519B2d119eC59D8e0CD".into())),
//!     ("wad", Value::Str("1000000000000000000000".into())),
//! ]))?;
//! ```

use abicodec_core::{error::EncodeError, TupleElem, Type, Value, WORD};
use alloy_primitives::{Address, I256, U256};

/// Encode `value` as `ty`. The output length is always a multiple of 32.
///
/// A tuple encodes as its head followed by its tail; any other top-level
/// type encodes exactly as it would appear in a tail (no leading offset).
pub fn encode(ty: &Type, value: &Value) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    encode_into(ty, value, &mut out)?;
    Ok(out)
}

/// Encode a list of values against a list of types as one head/tail region.
pub fn encode_values(types: &[Type], values: &[Value]) -> Result<Vec<u8>, EncodeError> {
    if types.len() != values.len() {
        return Err(EncodeError::LengthMismatch {
            ty: "argument list".into(),
            expected: types.len(),
            got: values.len(),
        });
    }
    encode_sequence(types.iter().zip(values))
}

fn encode_into(ty: &Type, value: &Value, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    match ty {
        Type::Bool => match value {
            Value::Bool(b) => out.extend_from_slice(&u256_word(U256::from(*b as u8))),
            other => return Err(mismatch(ty, other)),
        },
        Type::Uint(bits) => {
            let v = to_u256(ty, value)?;
            if v.bit_len() > *bits {
                return Err(overflow(ty, v));
            }
            out.extend_from_slice(&u256_word(v));
        }
        Type::Int(bits) => {
            let v = to_i256(ty, value)?;
            let magnitude = if v.is_negative() {
                !v.into_raw()
            } else {
                v.into_raw()
            };
            if magnitude.bit_len() >= *bits {
                return Err(overflow(ty, v));
            }
            out.extend_from_slice(&u256_word(v.into_raw()));
        }
        Type::Address => {
            let addr = to_address(ty, value)?;
            out.extend_from_slice(&[0u8; 12]);
            out.extend_from_slice(addr.as_slice());
        }
        Type::FixedBytes(len) => {
            let bytes = to_bytes(ty, value)?;
            if bytes.len() != *len {
                return Err(length_mismatch(ty, *len, bytes.len()));
            }
            pad_right_into(&bytes, out);
        }
        Type::Function => {
            let bytes = to_bytes(ty, value)?;
            if bytes.len() != ty.size() {
                return Err(length_mismatch(ty, ty.size(), bytes.len()));
            }
            pad_right_into(&bytes, out);
        }
        Type::String => match value {
            Value::Str(s) => {
                out.extend_from_slice(&usize_word(s.len()));
                pad_right_into(s.as_bytes(), out);
            }
            other => return Err(mismatch(ty, other)),
        },
        Type::Bytes => {
            let bytes = to_bytes(ty, value)?;
            out.extend_from_slice(&usize_word(bytes.len()));
            pad_right_into(&bytes, out);
        }
        Type::Slice(elem) => {
            let items = as_items(ty, value)?;
            out.extend_from_slice(&usize_word(items.len()));
            out.extend(encode_sequence(items.iter().map(|v| (elem.as_ref(), v)))?);
        }
        Type::Array(elem, len) => {
            let items = as_items(ty, value)?;
            if items.len() != *len {
                return Err(length_mismatch(ty, *len, items.len()));
            }
            out.extend(encode_sequence(items.iter().map(|v| (elem.as_ref(), v)))?);
        }
        Type::Tuple(elems) => {
            let members = tuple_members(ty, elems, value)?;
            out.extend(encode_sequence(
                elems.iter().map(|e| &e.ty).zip(members),
            )?);
        }
    }
    Ok(())
}

/// Lay out `items` as one region: heads first, then the tails of the
/// dynamic members in order.
fn encode_sequence<'a>(
    items: impl Iterator<Item = (&'a Type, &'a Value)> + Clone,
) -> Result<Vec<u8>, EncodeError> {
    let head_len: usize = items.clone().map(|(t, _)| t.head_size()).sum();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for (ty, value) in items {
        if ty.is_dynamic() {
            head.extend_from_slice(&usize_word(head_len + tail.len()));
            encode_into(ty, value, &mut tail)?;
        } else {
            encode_into(ty, value, &mut head)?;
        }
    }

    head.extend(tail);
    Ok(head)
}

/// Resolve tuple members from a keyed tuple (by name, then by position) or
/// from a positional array.
fn tuple_members<'a>(
    ty: &Type,
    elems: &[TupleElem],
    value: &'a Value,
) -> Result<Vec<&'a Value>, EncodeError> {
    match value {
        Value::Tuple(fields) => elems
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let by_name = (!e.name.is_empty()).then(|| fields.get(&e.name)).flatten();
                by_name
                    .or_else(|| fields.get(&i.to_string()))
                    .ok_or_else(|| EncodeError::MissingField(e.key(i)))
            })
            .collect(),
        Value::Array(items) => {
            if items.len() != elems.len() {
                return Err(length_mismatch(ty, elems.len(), items.len()));
            }
            Ok(items.iter().collect())
        }
        other => Err(mismatch(ty, other)),
    }
}

fn as_items<'a>(ty: &Type, value: &'a Value) -> Result<&'a [Value], EncodeError> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(mismatch(ty, other)),
    }
}

fn to_u256(ty: &Type, value: &Value) -> Result<U256, EncodeError> {
    match value {
        Value::Uint(v) => Ok(U256::from(*v)),
        Value::BigUint(v) => Ok(*v),
        Value::Int(v) => u64::try_from(*v)
            .map(U256::from)
            .map_err(|_| overflow(ty, v)),
        Value::BigInt(v) => {
            if v.is_negative() {
                Err(overflow(ty, v))
            } else {
                Ok(v.into_raw())
            }
        }
        Value::Str(s) => parse_u256(s).ok_or_else(|| invalid_literal(ty, s)),
        other => Err(mismatch(ty, other)),
    }
}

fn to_i256(ty: &Type, value: &Value) -> Result<I256, EncodeError> {
    match value {
        Value::Int(v) => I256::try_from(*v).map_err(|_| overflow(ty, v)),
        Value::BigInt(v) => Ok(*v),
        Value::Uint(v) => Ok(I256::from_raw(U256::from(*v))),
        Value::BigUint(v) => {
            if v.bit_len() >= 256 {
                Err(overflow(ty, v))
            } else {
                Ok(I256::from_raw(*v))
            }
        }
        Value::Str(s) => parse_i256(s).ok_or_else(|| invalid_literal(ty, s)),
        other => Err(mismatch(ty, other)),
    }
}

fn to_address(ty: &Type, value: &Value) -> Result<Address, EncodeError> {
    match value {
        Value::Address(a) => Ok(*a),
        Value::Bytes(b) | Value::FixedBytes(b) => {
            if b.len() != 20 {
                return Err(length_mismatch(ty, 20, b.len()));
            }
            Ok(Address::from_slice(b))
        }
        Value::Str(s) => s.trim().parse::<Address>().map_err(|_| invalid_literal(ty, s)),
        other => Err(mismatch(ty, other)),
    }
}

fn to_bytes(ty: &Type, value: &Value) -> Result<Vec<u8>, EncodeError> {
    match value {
        Value::Bytes(b) | Value::FixedBytes(b) => Ok(b.clone()),
        Value::Function(f) => Ok(f.to_vec()),
        Value::Address(a) if matches!(ty, Type::FixedBytes(20) | Type::Bytes) => Ok(a.to_vec()),
        Value::Str(s) => s
            .trim()
            .strip_prefix("0x")
            .and_then(|digits| hex::decode(digits).ok())
            .ok_or_else(|| invalid_literal(ty, s)),
        other => Err(mismatch(ty, other)),
    }
}

/// Decimal or `0x`-prefixed hex.
pub(crate) fn parse_u256(text: &str) -> Option<U256> {
    let text = text.trim();
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(digits) => U256::from_str_radix(digits, 16).ok(),
        None => U256::from_str_radix(text, 10).ok(),
    }
}

/// Optionally signed decimal or `0x`-prefixed hex magnitude.
pub(crate) fn parse_i256(text: &str) -> Option<I256> {
    let text = text.trim();
    if text.contains("0x") || text.contains("0X") {
        I256::from_hex_str(text).ok()
    } else {
        I256::from_dec_str(text).ok()
    }
}

pub(crate) fn usize_word(n: usize) -> [u8; WORD] {
    u256_word(U256::from(n))
}

fn u256_word(v: U256) -> [u8; WORD] {
    v.to_be_bytes::<32>()
}

/// Append `bytes` and zero-pad to the next word boundary.
fn pad_right_into(bytes: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(bytes);
    let rem = bytes.len() % WORD;
    if rem != 0 {
        out.resize(out.len() + WORD - rem, 0);
    }
}

fn mismatch(ty: &Type, value: &Value) -> EncodeError {
    EncodeError::TypeMismatch {
        expected: ty.to_string(),
        got: value.kind_name().to_string(),
    }
}

fn overflow(ty: &Type, value: impl ToString) -> EncodeError {
    EncodeError::Overflow {
        ty: ty.to_string(),
        value: value.to_string(),
    }
}

fn length_mismatch(ty: &Type, expected: usize, got: usize) -> EncodeError {
    EncodeError::LengthMismatch {
        ty: ty.to_string(),
        expected,
        got,
    }
}

fn invalid_literal(ty: &Type, literal: &str) -> EncodeError {
    EncodeError::InvalidLiteral {
        ty: ty.to_string(),
        literal: literal.to_string(),
    }
}
