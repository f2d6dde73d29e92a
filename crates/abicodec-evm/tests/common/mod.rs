//! Strategies shared by the codec property tests.
//!
//! Values are generated in the exact shape the decoder produces (native
//! widths as `Uint`/`Int`, wider ones as `BigUint`/`BigInt`, tuples keyed by
//! position), so a round trip can be checked with plain equality.

#![allow(dead_code)]

use abicodec_core::{Address, Type, Value, I256, U256};
use indexmap::IndexMap;
use proptest::prelude::*;

pub fn leaf() -> impl Strategy<Value = Type> {
    prop_oneof![
        Just(Type::Bool),
        Just(Type::Address),
        Just(Type::String),
        Just(Type::Bytes),
        Just(Type::Function),
        (1usize..=32).prop_map(|n| Type::Uint(n * 8)),
        (1usize..=32).prop_map(|n| Type::Int(n * 8)),
        (1usize..=32).prop_map(Type::FixedBytes),
    ]
}

pub fn any_type() -> impl Strategy<Value = Type> {
    leaf().prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(|t| Type::Slice(Box::new(t))),
            (inner.clone(), 1usize..3).prop_map(|(t, n)| Type::Array(Box::new(t), n)),
            prop::collection::vec(inner, 1..4).prop_map(Type::tuple_of),
        ]
    })
}

fn is_native(bits: usize) -> bool {
    matches!(bits, 8 | 16 | 32 | 64)
}

/// Low `bits` bits of a random word.
fn truncated(bytes: [u8; 32], bits: usize) -> U256 {
    U256::from_be_bytes(bytes) >> (256 - bits)
}

pub fn value_for(ty: &Type) -> BoxedStrategy<Value> {
    match ty {
        Type::Bool => any::<bool>().prop_map(Value::Bool).boxed(),
        Type::Address => any::<[u8; 20]>()
            .prop_map(|b| Value::Address(Address::from(b)))
            .boxed(),
        Type::String => "\\PC{0,40}".prop_map(Value::Str).boxed(),
        Type::Bytes => prop::collection::vec(any::<u8>(), 0..70)
            .prop_map(Value::Bytes)
            .boxed(),
        Type::FixedBytes(n) => prop::collection::vec(any::<u8>(), *n)
            .prop_map(Value::FixedBytes)
            .boxed(),
        Type::Uint(bits) if is_native(*bits) => {
            let bits = *bits;
            any::<u64>()
                .prop_map(move |v| Value::Uint(if bits == 64 { v } else { v & ((1 << bits) - 1) }))
                .boxed()
        }
        Type::Uint(bits) => {
            let bits = *bits;
            any::<[u8; 32]>()
                .prop_map(move |b| Value::BigUint(truncated(b, bits)))
                .boxed()
        }
        Type::Int(bits) if is_native(*bits) => {
            let shift = 64 - *bits as u32;
            any::<i64>()
                .prop_map(move |v| Value::Int(v.wrapping_shl(shift).wrapping_shr(shift)))
                .boxed()
        }
        Type::Int(bits) => {
            let bits = *bits;
            any::<[u8; 32]>()
                .prop_map(move |b| {
                    let mut raw = truncated(b, bits);
                    if bits < 256 && raw.bit(bits - 1) {
                        raw |= U256::MAX << bits;
                    }
                    Value::BigInt(I256::from_raw(raw))
                })
                .boxed()
        }
        Type::Array(elem, n) => prop::collection::vec(value_for(elem), *n)
            .prop_map(Value::Array)
            .boxed(),
        Type::Slice(elem) => prop::collection::vec(value_for(elem), 0..4)
            .prop_map(Value::Array)
            .boxed(),
        Type::Tuple(elems) => {
            let keys: Vec<String> = elems.iter().enumerate().map(|(i, e)| e.key(i)).collect();
            let members: Vec<BoxedStrategy<Value>> = elems.iter().map(|e| value_for(&e.ty)).collect();
            members
                .prop_map(move |values| {
                    Value::Tuple(keys.iter().cloned().zip(values).collect::<IndexMap<_, _>>())
                })
                .boxed()
        }
        Type::Function => any::<[u8; 24]>().prop_map(Value::Function).boxed(),
    }
}

pub fn typed_value() -> impl Strategy<Value = (Type, Value)> {
    any_type().prop_flat_map(|ty| {
        let value = value_for(&ty);
        (Just(ty), value)
    })
}
