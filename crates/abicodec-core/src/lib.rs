//! # abicodec-core
//!
//! Core types for abicodec: the ABI [`Type`] model and the grammar that
//! parses type strings into it, the [`Value`] representation shared by the
//! encoder and decoder, log and call records, and the error taxonomy.
//!
//! EVM-specific machinery (selectors, the head/tail codec, interfaces) lives
//! in `abicodec-evm`.

pub mod call;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod log;
pub mod types;
pub mod value;

pub use call::{DecodedCall, DecodedError};
pub use error::{AbiError, DecodeError, EncodeError, GrammarError, SchemaError, SignatureError};
pub use grammar::parse_type;
pub use log::{DecodedLog, RawLog};
pub use types::{Kind, TupleElem, Type, ADDRESS_LEN, FUNCTION_LEN, WORD};
pub use value::Value;

// Re-exported so downstream crates name the same primitive types.
pub use alloy_primitives::{Address, Bytes, B256, I256, U256};
