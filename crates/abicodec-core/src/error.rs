//! Error types for the abicodec grammar, interface and codec pipeline.

use thiserror::Error;

/// Malformed type text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("expected token {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("token '{0}' not expected")]
    NotExpected(String),

    #[error("unknown type '{0}'")]
    UnknownType(String),

    #[error("type '{0}' does not take a size suffix")]
    UnexpectedSize(String),

    #[error("invalid integer width {bits}: must be a multiple of 8 between 8 and 256")]
    InvalidBitWidth { bits: usize },

    #[error("invalid fixed bytes length {len}: must be between 1 and 32")]
    InvalidBytesLength { len: usize },

    #[error("malformed array size '{0}'")]
    InvalidArraySize(String),

    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),

    #[error("size suffix of '{0}' has a leading zero")]
    LeadingZero(String),

    #[error("type nests deeper than {limit} levels")]
    TooDeep { limit: usize },
}

/// Malformed human-readable function / event / error / constructor text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("failed to parse signature '{input}': {reason}")]
    Malformed { input: String, reason: String },

    #[error("unbalanced parentheses in '{0}'")]
    Unbalanced(String),

    #[error("unknown declaration kind in '{0}': expected function, event, error or constructor")]
    UnknownKind(String),

    #[error("invalid argument list: {0}")]
    Grammar(#[from] GrammarError),
}

/// Malformed or inconsistent interface description.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("multiple constructor declarations")]
    DuplicateConstructor,

    #[error("method '{0}' declared more than once")]
    DuplicateMethod(String),

    #[error("event '{0}' declared more than once")]
    DuplicateEvent(String),

    #[error("error '{0}' declared more than once")]
    DuplicateError(String),

    #[error("duplicate field name '{0}' in tuple")]
    DuplicateField(String),

    #[error("unknown entry type '{0}'")]
    UnknownEntryKind(String),

    #[error("invalid type for '{name}': {source}")]
    InvalidType {
        name: String,
        #[source]
        source: GrammarError,
    },

    #[error("invalid declaration: {0}")]
    Signature(#[from] SignatureError),

    #[error("invalid ABI JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A supplied value does not fit the expected type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("value {value} overflows {ty}")]
    Overflow { ty: String, value: String },

    #[error("length mismatch for {ty}: expected {expected}, got {got}")]
    LengthMismatch {
        ty: String,
        expected: usize,
        got: usize,
    },

    #[error("missing tuple field '{0}'")]
    MissingField(String),

    #[error("invalid {ty} literal '{literal}'")]
    InvalidLiteral { ty: String, literal: String },
}

/// Failures while reading an ABI-encoded buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    // --- Bounds ---
    #[error("empty input")]
    EmptyInput,

    #[error("buffer too short: need {needed} bytes, have {available}")]
    BufferTooShort { needed: usize, available: usize },

    #[error("{what} {value} exceeds the remaining {available} bytes")]
    OutOfBounds {
        what: &'static str,
        value: usize,
        available: usize,
    },

    #[error("{what} word is wider than 63 bits")]
    LengthTooLarge { what: &'static str },

    #[error("array elements exceed the budget of {limit} for this input")]
    TooManyElements { limit: usize },

    // --- Shape ---
    #[error("invalid boolean word 0x{0}")]
    InvalidBool(String),

    #[error("function type expects the last 8 bytes to be zero, found 0x{0}")]
    FunctionPadding(String),

    #[error("string is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    #[error("tuple with repeated field '{0}'")]
    DuplicateField(String),

    #[error("topic decoding for type '{0}' is not supported")]
    UnsupportedIndexedType(String),

    #[error("log has {got} indexed topics, event declares {expected}")]
    TopicCount { expected: usize, got: usize },

    #[error("log does not match event '{0}'")]
    LogMismatch(String),

    #[error("selector mismatch: expected {expected}, got {got}")]
    SelectorMismatch { expected: String, got: String },

    #[error("no declaration matches selector {0}")]
    UnknownSelector(String),

    #[error("no event matches topic0 {0}")]
    UnknownEvent(String),
}

impl DecodeError {
    /// Returns `true` for the bounds family (short buffers, offsets or
    /// lengths past the end, oversized length words, element budget).
    pub fn is_bounds(&self) -> bool {
        matches!(
            self,
            DecodeError::EmptyInput
                | DecodeError::BufferTooShort { .. }
                | DecodeError::OutOfBounds { .. }
                | DecodeError::LengthTooLarge { .. }
                | DecodeError::TooManyElements { .. }
        )
    }
}

/// Umbrella error for callers that drive the whole pipeline.
#[derive(Debug, Error)]
pub enum AbiError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("deserialization into target type failed: {0}")]
    Deserialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_grammar_errors() {
        let err = GrammarError::InvalidBitWidth { bits: 7 };
        assert_eq!(
            err.to_string(),
            "invalid integer width 7: must be a multiple of 8 between 8 and 256"
        );
        assert_eq!(
            GrammarError::UnknownType("uint256x".into()).to_string(),
            "unknown type 'uint256x'"
        );
    }

    #[test]
    fn bounds_family() {
        assert!(DecodeError::EmptyInput.is_bounds());
        assert!(DecodeError::LengthTooLarge { what: "offset" }.is_bounds());
        assert!(!DecodeError::InvalidBool("02".into()).is_bounds());
    }

    #[test]
    fn signature_error_wraps_grammar() {
        let err: SignatureError = GrammarError::UnknownType("foo".into()).into();
        assert!(err.to_string().contains("unknown type 'foo'"));
    }

    #[test]
    fn umbrella_is_transparent() {
        let err: AbiError = DecodeError::EmptyInput.into();
        assert_eq!(err.to_string(), "empty input");
    }
}
