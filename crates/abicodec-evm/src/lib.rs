//! # abicodec-evm
//!
//! EVM contract-interface engine built on the `abicodec-core` type model.
//!
//! ## Implementation notes
//! - Interfaces come from JSON ABIs or human-readable declarations
//! - Selectors and topic0 are keccak256 of the canonical signature
//! - Calldata and log data use the Solidity head/tail layout
//! - Topics[1..] → indexed parameters (each one 32-byte word)
//! - `data` → non-indexed parameters (one encoded tuple)

pub mod batch;
pub mod decoder;
pub mod encoder;
pub mod fingerprint;
pub mod interface;
pub mod json_abi;
pub mod normalizer;
pub mod signature;
pub mod topics;

pub use batch::{decode_logs, BatchDecodeResult, BatchError, ErrorMode};
pub use decoder::decode;
pub use encoder::encode;
pub use fingerprint::keccak256;
pub use interface::{canonical_signature, CustomError, Event, Interface, Method};
pub use normalizer::decode_into;
pub use signature::{parse_declaration, Declaration};
