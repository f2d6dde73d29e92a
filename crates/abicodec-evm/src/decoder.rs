//! Head/tail ABI decoder.
//!
//! Every read is bounds-checked against the current region. Offsets are
//! relative to the start of the tuple or array that contains them, and any
//! offset, length or count word wider than 63 bits is rejected before it is
//! used.
//!
//! Several offsets may point at the same tail, so the elements of all
//! dynamic arrays together are charged against a budget of one element per
//! input byte.

use abicodec_core::{error::DecodeError, TupleElem, Type, Value, WORD};
use alloy_primitives::{Address, I256, U256};
use indexmap::IndexMap;

/// Decode `data` as `ty`. The inverse of [`crate::encoder::encode`].
pub fn decode(ty: &Type, data: &[u8]) -> Result<Value, DecodeError> {
    check_input(data)?;
    decode_value(ty, data, &mut Budget::for_input(data))
}

/// Decode a tuple type straight into its keyed members.
pub fn decode_tuple(ty: &Type, data: &[u8]) -> Result<IndexMap<String, Value>, DecodeError> {
    check_input(data)?;
    let mut budget = Budget::for_input(data);
    let values = decode_sequence(ty.tuple_elems().iter().map(|e| &e.ty), data, &mut budget)?;
    into_fields(ty.tuple_elems(), values)
}

/// Decode a list of types laid out as one head/tail region.
pub fn decode_values<'a>(
    types: impl Iterator<Item = &'a Type>,
    data: &[u8],
) -> Result<Vec<Value>, DecodeError> {
    check_input(data)?;
    decode_sequence(types, data, &mut Budget::for_input(data))
}

/// Dynamic-array elements still allowed for the current input.
struct Budget {
    limit: usize,
    remaining: usize,
}

impl Budget {
    fn for_input(data: &[u8]) -> Self {
        Self {
            limit: data.len(),
            remaining: data.len(),
        }
    }

    fn charge(&mut self, count: usize) -> Result<(), DecodeError> {
        self.remaining = self
            .remaining
            .checked_sub(count)
            .ok_or(DecodeError::TooManyElements { limit: self.limit })?;
        Ok(())
    }
}

fn check_input(data: &[u8]) -> Result<(), DecodeError> {
    if data.is_empty() {
        return Err(DecodeError::EmptyInput);
    }
    if data.len() < WORD {
        return Err(DecodeError::BufferTooShort {
            needed: WORD,
            available: data.len(),
        });
    }
    Ok(())
}

/// Decode one value whose encoding starts at `data[0]`.
fn decode_value(ty: &Type, data: &[u8], budget: &mut Budget) -> Result<Value, DecodeError> {
    match ty {
        Type::Bool => {
            let word = read_word(data, 0)?;
            if word[..WORD - 1].iter().any(|b| *b != 0) || word[WORD - 1] > 1 {
                return Err(DecodeError::InvalidBool(hex::encode(word)));
            }
            Ok(Value::Bool(word[WORD - 1] == 1))
        }
        Type::Uint(bits) => {
            let word = read_word(data, 0)?;
            Ok(match bits {
                8 | 16 | 32 | 64 => Value::Uint(tail_u64(word, *bits)),
                _ => Value::BigUint(U256::from_be_slice(word)),
            })
        }
        Type::Int(bits) => {
            let word = read_word(data, 0)?;
            Ok(match bits {
                8 | 16 | 32 | 64 => {
                    let shift = 64 - *bits as u32;
                    Value::Int(((tail_u64(word, *bits) << shift) as i64) >> shift)
                }
                _ => Value::BigInt(I256::from_raw(U256::from_be_slice(word))),
            })
        }
        Type::Address => {
            let word = read_word(data, 0)?;
            Ok(Value::Address(Address::from_slice(&word[12..])))
        }
        Type::FixedBytes(len) => {
            let word = read_word(data, 0)?;
            Ok(Value::FixedBytes(word[..*len].to_vec()))
        }
        Type::Function => {
            let word = read_word(data, 0)?;
            let (func, padding) = word.split_at(ty.size());
            if padding.iter().any(|b| *b != 0) {
                return Err(DecodeError::FunctionPadding(hex::encode(padding)));
            }
            let mut out = [0u8; 24];
            out.copy_from_slice(func);
            Ok(Value::Function(out))
        }
        Type::String => {
            let bytes = read_dynamic_bytes(data)?;
            String::from_utf8(bytes.to_vec())
                .map(Value::Str)
                .map_err(|e| DecodeError::InvalidUtf8(e.to_string()))
        }
        Type::Bytes => Ok(Value::Bytes(read_dynamic_bytes(data)?.to_vec())),
        Type::Slice(elem) => {
            let count = read_usize(data, 0, "count")?;
            let region = &data[WORD..];
            let min_len = count
                .checked_mul(elem.head_size().max(1))
                .ok_or(DecodeError::LengthTooLarge { what: "count" })?;
            if min_len > region.len() {
                return Err(DecodeError::OutOfBounds {
                    what: "array count",
                    value: count,
                    available: region.len(),
                });
            }
            budget.charge(count)?;
            let items =
                decode_sequence(std::iter::repeat(elem.as_ref()).take(count), region, budget)?;
            Ok(Value::Array(items))
        }
        Type::Array(elem, len) => {
            let items =
                decode_sequence(std::iter::repeat(elem.as_ref()).take(*len), data, budget)?;
            Ok(Value::Array(items))
        }
        Type::Tuple(elems) => {
            let values = decode_sequence(elems.iter().map(|e| &e.ty), data, budget)?;
            Ok(Value::Tuple(into_fields(elems, values)?))
        }
    }
}

/// Decode consecutive head slots; dynamic members are followed through
/// their offset, measured from the start of `region`.
fn decode_sequence<'a>(
    types: impl Iterator<Item = &'a Type>,
    region: &[u8],
    budget: &mut Budget,
) -> Result<Vec<Value>, DecodeError> {
    let mut values = Vec::new();
    let mut pos = 0usize;

    for ty in types {
        if ty.is_dynamic() {
            let offset = read_usize(region, pos, "offset")?;
            if offset >= region.len() {
                return Err(DecodeError::OutOfBounds {
                    what: "offset",
                    value: offset,
                    available: region.len(),
                });
            }
            values.push(decode_value(ty, &region[offset..], budget)?);
            pos += WORD;
        } else {
            let size = ty.head_size();
            let end = pos.checked_add(size).ok_or(DecodeError::LengthTooLarge { what: "head" })?;
            if end > region.len() {
                return Err(DecodeError::BufferTooShort {
                    needed: end,
                    available: region.len(),
                });
            }
            values.push(decode_value(ty, &region[pos..], budget)?);
            pos = end;
        }
    }
    Ok(values)
}

fn into_fields(
    elems: &[TupleElem],
    values: Vec<Value>,
) -> Result<IndexMap<String, Value>, DecodeError> {
    let mut fields = IndexMap::with_capacity(elems.len());
    for (i, (elem, value)) in elems.iter().zip(values).enumerate() {
        let key = elem.key(i);
        if fields.contains_key(&key) {
            return Err(DecodeError::DuplicateField(key));
        }
        fields.insert(key, value);
    }
    Ok(fields)
}

/// Length-prefixed byte string: a length word followed by the content.
fn read_dynamic_bytes(data: &[u8]) -> Result<&[u8], DecodeError> {
    let len = read_usize(data, 0, "length")?;
    let body = &data[WORD..];
    body.get(..len).ok_or(DecodeError::OutOfBounds {
        what: "length",
        value: len,
        available: body.len(),
    })
}

fn read_word(data: &[u8], pos: usize) -> Result<&[u8], DecodeError> {
    pos.checked_add(WORD)
        .and_then(|end| data.get(pos..end))
        .ok_or(DecodeError::BufferTooShort {
            needed: pos.saturating_add(WORD),
            available: data.len(),
        })
}

/// Read a word used as a length, count or offset.
fn read_usize(data: &[u8], pos: usize, what: &'static str) -> Result<usize, DecodeError> {
    let value = U256::from_be_slice(read_word(data, pos)?);
    if value.bit_len() > 63 {
        return Err(DecodeError::LengthTooLarge { what });
    }
    usize::try_from(value).map_err(|_| DecodeError::LengthTooLarge { what })
}

/// The low `bits` of a word as an unsigned integer.
fn tail_u64(word: &[u8], bits: usize) -> u64 {
    let bytes = bits / 8;
    word[WORD - bytes..]
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
}
