//! Types for decoded function calls and custom errors.

use indexmap::IndexMap;
use serde::Serialize;

use crate::value::Value;

/// Result of decoding a function call's calldata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedCall {
    /// Function name (e.g. "transfer")
    pub function_name: String,
    /// Canonical signature (e.g. "transfer(address,uint256)")
    pub signature: String,
    /// First 4 bytes of calldata
    #[serde(serialize_with = "hex_selector")]
    pub selector: [u8; 4],
    /// Decoded input parameters in declaration order
    pub inputs: IndexMap<String, Value>,
}

impl DecodedCall {
    /// Selector as a hex string ("0xaabbccdd")
    pub fn selector_hex(&self) -> String {
        format!("0x{}", hex::encode(self.selector))
    }

    /// Look up a decoded input by name
    pub fn input(&self, name: &str) -> Option<&Value> {
        self.inputs.get(name)
    }
}

/// Revert data matched against a declared custom error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedError {
    pub error_name: String,
    pub signature: String,
    #[serde(serialize_with = "hex_selector")]
    pub selector: [u8; 4],
    pub inputs: IndexMap<String, Value>,
}

impl DecodedError {
    pub fn input(&self, name: &str) -> Option<&Value> {
        self.inputs.get(name)
    }
}

fn hex_selector<S: serde::Serializer>(selector: &[u8; 4], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format!("0x{}", hex::encode(selector)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_renders_as_hex() {
        let call = DecodedCall {
            function_name: "transfer".into(),
            signature: "transfer(address,uint256)".into(),
            selector: [0xa9, 0x05, 0x9c, 0xbb],
            inputs: IndexMap::from([("wad".to_string(), Value::Uint(1))]),
        };
        assert_eq!(call.selector_hex(), "0xa9059cbb");
        assert_eq!(call.input("wad"), Some(&Value::Uint(1)));
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["selector"], "0xa9059cbb");
        assert_eq!(json["inputs"]["wad"], 1);
    }
}
