//! Event-log splitting.
//!
//! An event's parameters are split by their `indexed` flag. Indexed
//! parameters are read from the log topics (one 32-byte word each, after
//! topic0 for non-anonymous events); the rest are decoded together as one
//! tuple from the data blob. The two halves are merged back into
//! declaration order.
//!
//! Reference types (string, bytes, arrays, tuples) are stored in a topic as
//! the keccak256 of their encoding, so the value is unrecoverable; decoding
//! such a topic fails with `UnsupportedIndexedType`.

use abicodec_core::{error::DecodeError, RawLog, TupleElem, Type, Value};
use alloy_primitives::B256;
use indexmap::IndexMap;

use crate::decoder;

/// Decode `log` against an event's input tuple.
pub fn parse_log(
    inputs: &Type,
    anonymous: bool,
    log: &RawLog,
) -> Result<IndexMap<String, Value>, DecodeError> {
    let topics = if anonymous {
        &log.topics[..]
    } else {
        log.topics.get(1..).unwrap_or_default()
    };
    let elems = inputs.tuple_elems();

    let indexed: Vec<&TupleElem> = elems.iter().filter(|e| e.indexed).collect();
    let mut topic_values = parse_topics(&indexed, topics)?.into_iter();

    let data_types: Vec<&Type> = elems.iter().filter(|e| !e.indexed).map(|e| &e.ty).collect();
    let mut data_values = if data_types.is_empty() {
        Vec::new()
    } else {
        decoder::decode_values(data_types.into_iter(), &log.data)?
    }
    .into_iter();

    let mut fields = IndexMap::with_capacity(elems.len());
    for (i, elem) in elems.iter().enumerate() {
        let source = if elem.indexed {
            &mut topic_values
        } else {
            &mut data_values
        };
        let Some(value) = source.next() else {
            return Err(DecodeError::LogMismatch(elem.key(i)));
        };
        let key = elem.key(i);
        if fields.contains_key(&key) {
            return Err(DecodeError::DuplicateField(key));
        }
        fields.insert(key, value);
    }
    Ok(fields)
}

/// Decode one topic per indexed field; the counts must agree.
pub fn parse_topics(fields: &[&TupleElem], topics: &[B256]) -> Result<Vec<Value>, DecodeError> {
    if fields.len() != topics.len() {
        return Err(DecodeError::TopicCount {
            expected: fields.len(),
            got: topics.len(),
        });
    }
    fields
        .iter()
        .zip(topics)
        .map(|(field, topic)| decode_topic(&field.ty, topic))
        .collect()
}

/// Decode a single indexed value from its topic word.
pub fn decode_topic(ty: &Type, topic: &B256) -> Result<Value, DecodeError> {
    match ty {
        Type::Bool => {
            if *topic == B256::ZERO {
                Ok(Value::Bool(false))
            } else if *topic == B256::with_last_byte(1) {
                Ok(Value::Bool(true))
            } else {
                Err(DecodeError::InvalidBool(hex::encode(topic)))
            }
        }
        Type::Uint(_) | Type::Int(_) | Type::Address | Type::FixedBytes(_) => {
            decoder::decode(ty, topic.as_slice())
        }
        other => Err(DecodeError::UnsupportedIndexedType(other.to_string())),
    }
}
