//! Raw and decoded event logs.

use alloy_primitives::{Address, Bytes, B256};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// An undecoded log as returned by `eth_getLogs` or a receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLog {
    /// Contract that emitted the log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// `topics[0]` is the event's topic0 unless the event is anonymous.
    pub topics: Vec<B256>,
    /// ABI-encoded non-indexed parameters.
    #[serde(default)]
    pub data: Bytes,
}

impl RawLog {
    pub fn new(topics: Vec<B256>, data: impl Into<Bytes>) -> Self {
        Self {
            address: None,
            topics,
            data: data.into(),
        }
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// First topic, if any.
    pub fn topic0(&self) -> Option<&B256> {
        self.topics.first()
    }
}

/// A log decoded against a known event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedLog {
    /// Event name, e.g. "Transfer"
    pub event: String,
    /// Canonical event signature
    pub signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// Every event parameter in declaration order, indexed or not.
    pub fields: IndexMap<String, Value>,
}

impl DecodedLog {
    /// Get a field value by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_rpc_log_shape() {
        let json = r#"{
            "address": "0x6b175474e89094c44da98b954eedeac495271d0f",
            "topics": ["0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"],
            "data": "0x00000000000000000000000000000000000000000000000000000000000003e8",
            "blockNumber": "0x10"
        }"#;
        let log: RawLog = serde_json::from_str(json).unwrap();
        assert!(log.address.is_some());
        assert_eq!(log.topics.len(), 1);
        assert_eq!(log.data.len(), 32);
        assert_eq!(log.topic0().unwrap()[0], 0xdd);
    }

    #[test]
    fn data_defaults_to_empty() {
        let log: RawLog = serde_json::from_str(r#"{"topics": []}"#).unwrap();
        assert!(log.data.is_empty());
        assert!(log.topic0().is_none());
    }
}
