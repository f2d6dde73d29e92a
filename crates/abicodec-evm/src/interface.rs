//! Contract interfaces: methods, events and custom errors.
//!
//! Each entity computes its canonical signature and Keccak fingerprint once
//! at construction; an [`Interface`] is read-only after it is built and can
//! be shared freely across threads.

use abicodec_core::{
    error::{DecodeError, EncodeError, SchemaError},
    DecodedCall, DecodedError, DecodedLog, RawLog, TupleElem, Type, Value,
};
use alloy_primitives::B256;
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::debug;

use crate::{decoder, encoder, fingerprint, json_abi, signature, topics};

/// Canonical signature: `name(t1,t2,...)`, no parameter names, no
/// `indexed`, tuples written as bare parentheses.
pub fn canonical_signature(name: &str, inputs: &Type) -> String {
    let args: Vec<String> = inputs.tuple_elems().iter().map(|e| e.ty.canonical()).collect();
    format!("{name}({})", args.join(","))
}

// ─── Method ─────────────────────────────────────────────────────────────────

/// A contract function (or the constructor, which has no name or outputs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    name: String,
    constant: bool,
    inputs: Type,
    outputs: Type,
    signature: String,
    selector: [u8; 4],
}

impl Method {
    pub fn new(
        name: impl Into<String>,
        inputs: Vec<TupleElem>,
        outputs: Vec<TupleElem>,
        constant: bool,
    ) -> Self {
        let name = name.into();
        let inputs = Type::Tuple(inputs);
        let signature = canonical_signature(&name, &inputs);
        let selector = fingerprint::selector(&signature);
        Self {
            name,
            constant,
            inputs,
            outputs: Type::Tuple(outputs),
            signature,
            selector,
        }
    }

    /// Parse `function name(args) [modifiers] [returns (args)]`.
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        Ok(signature::parse_function(text)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared `view`, `pure` or `constant`.
    pub fn is_constant(&self) -> bool {
        self.constant
    }

    pub fn inputs(&self) -> &Type {
        &self.inputs
    }

    pub fn outputs(&self) -> &Type {
        &self.outputs
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn selector(&self) -> [u8; 4] {
        self.selector
    }

    pub fn hex_selector(&self) -> String {
        fingerprint::selector_hex(&self.selector)
    }

    /// ABI-encode the inputs without the selector.
    pub fn encode_args(&self, args: &Value) -> Result<Vec<u8>, EncodeError> {
        encoder::encode(&self.inputs, args)
    }

    /// Selector followed by the encoded inputs.
    pub fn encode_call(&self, args: &Value) -> Result<Vec<u8>, EncodeError> {
        let mut calldata = self.selector.to_vec();
        calldata.extend(self.encode_args(args)?);
        Ok(calldata)
    }

    /// Decode a call's return data into the declared outputs.
    pub fn decode_output(&self, data: &[u8]) -> Result<IndexMap<String, Value>, DecodeError> {
        decoder::decode_tuple(&self.outputs, data)
    }

    /// Decode calldata (selector included) into this method's inputs.
    pub fn decode_input(&self, calldata: &[u8]) -> Result<DecodedCall, DecodeError> {
        let args = strip_selector(calldata, &self.selector)?;
        Ok(DecodedCall {
            function_name: self.name.clone(),
            signature: self.signature.clone(),
            selector: self.selector,
            inputs: decode_args(&self.inputs, args)?,
        })
    }
}

// ─── Event ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    name: String,
    anonymous: bool,
    inputs: Type,
    signature: String,
    topic0: B256,
}

impl Event {
    pub fn new(name: impl Into<String>, inputs: Vec<TupleElem>, anonymous: bool) -> Self {
        let name = name.into();
        let inputs = Type::Tuple(inputs);
        let signature = canonical_signature(&name, &inputs);
        let topic0 = fingerprint::topic0(&signature);
        Self {
            name,
            anonymous,
            inputs,
            signature,
            topic0,
        }
    }

    /// Parse `event Name(args) [anonymous]`.
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        Ok(signature::parse_event(text)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    pub fn inputs(&self) -> &Type {
        &self.inputs
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn topic0(&self) -> B256 {
        self.topic0
    }

    pub fn hex_topic0(&self) -> String {
        format!("0x{}", hex::encode(self.topic0))
    }

    /// Number of `indexed` parameters.
    pub fn indexed_count(&self) -> usize {
        self.inputs.tuple_elems().iter().filter(|e| e.indexed).count()
    }

    /// Non-anonymous: topic0 equals this event's topic0. Anonymous: the
    /// topic count equals the number of indexed parameters.
    pub fn matches(&self, log: &RawLog) -> bool {
        if self.anonymous {
            log.topics.len() == self.indexed_count()
        } else {
            log.topic0() == Some(&self.topic0)
        }
    }

    /// Decode every parameter of `log`, indexed and non-indexed.
    pub fn parse_log(&self, log: &RawLog) -> Result<DecodedLog, DecodeError> {
        if !self.matches(log) {
            return Err(DecodeError::LogMismatch(self.name.clone()));
        }
        let fields = topics::parse_log(&self.inputs, self.anonymous, log)?;
        Ok(DecodedLog {
            event: self.name.clone(),
            signature: self.signature.clone(),
            address: log.address,
            fields,
        })
    }
}

// ─── CustomError ────────────────────────────────────────────────────────────

/// A Solidity custom error, reverted as `selector ++ encoded args`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomError {
    name: String,
    inputs: Type,
    signature: String,
    selector: [u8; 4],
}

impl CustomError {
    pub fn new(name: impl Into<String>, inputs: Vec<TupleElem>) -> Self {
        let name = name.into();
        let inputs = Type::Tuple(inputs);
        let signature = canonical_signature(&name, &inputs);
        let selector = fingerprint::selector(&signature);
        Self {
            name,
            inputs,
            signature,
            selector,
        }
    }

    /// Parse `error Name(args)`.
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        Ok(signature::parse_error(text)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &Type {
        &self.inputs
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn selector(&self) -> [u8; 4] {
        self.selector
    }

    pub fn hex_selector(&self) -> String {
        fingerprint::selector_hex(&self.selector)
    }

    /// Revert data for this error: selector followed by the encoded args.
    pub fn encode(&self, args: &Value) -> Result<Vec<u8>, EncodeError> {
        let mut data = self.selector.to_vec();
        data.extend(encoder::encode(&self.inputs, args)?);
        Ok(data)
    }

    /// Decode revert data produced by [`CustomError::encode`].
    pub fn decode(&self, revert_data: &[u8]) -> Result<DecodedError, DecodeError> {
        let args = strip_selector(revert_data, &self.selector)?;
        Ok(DecodedError {
            error_name: self.name.clone(),
            signature: self.signature.clone(),
            selector: self.selector,
            inputs: decode_args(&self.inputs, args)?,
        })
    }
}

fn strip_selector<'a>(data: &'a [u8], expected: &[u8; 4]) -> Result<&'a [u8], DecodeError> {
    let (selector, rest) = split_selector(data)?;
    if &selector != expected {
        return Err(DecodeError::SelectorMismatch {
            expected: fingerprint::selector_hex(expected),
            got: fingerprint::selector_hex(&selector),
        });
    }
    Ok(rest)
}

fn split_selector(data: &[u8]) -> Result<([u8; 4], &[u8]), DecodeError> {
    if data.len() < 4 {
        return Err(DecodeError::BufferTooShort {
            needed: 4,
            available: data.len(),
        });
    }
    let (head, rest) = data.split_at(4);
    let mut selector = [0u8; 4];
    selector.copy_from_slice(head);
    Ok((selector, rest))
}

/// Argument-less declarations carry nothing after the selector.
fn decode_args(inputs: &Type, data: &[u8]) -> Result<IndexMap<String, Value>, DecodeError> {
    if inputs.tuple_elems().is_empty() {
        return Ok(IndexMap::new());
    }
    decoder::decode_tuple(inputs, data)
}

// ─── Interface ──────────────────────────────────────────────────────────────

/// A contract's full declared surface.
#[derive(Debug, Clone, Default)]
pub struct Interface {
    constructor: Option<Method>,
    methods: IndexMap<String, Method>,
    events: IndexMap<String, Event>,
    errors: IndexMap<String, CustomError>,
}

impl Interface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON ABI (an array of entries, or an artifact object
    /// with an `abi` field).
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        json_abi::parse(json)
    }

    /// Build from human-readable declarations such as
    /// `function transfer(address to, uint256 amount) returns (bool)`.
    pub fn from_signatures<I, S>(lines: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut iface = Self::new();
        for line in lines {
            iface.add(signature::parse_declaration(line.as_ref())?)?;
        }
        debug!(
            methods = iface.methods.len(),
            events = iface.events.len(),
            errors = iface.errors.len(),
            "interface built from signatures"
        );
        Ok(iface)
    }

    /// Add one parsed declaration.
    pub fn add(&mut self, decl: signature::Declaration) -> Result<(), SchemaError> {
        match decl {
            signature::Declaration::Constructor(m) => self.set_constructor(m),
            signature::Declaration::Function(m) => self.add_method(m),
            signature::Declaration::Event(e) => self.add_event(e),
            signature::Declaration::Error(e) => self.add_error(e),
        }
    }

    pub fn set_constructor(&mut self, constructor: Method) -> Result<(), SchemaError> {
        if self.constructor.is_some() {
            return Err(SchemaError::DuplicateConstructor);
        }
        check_unique_fields(constructor.inputs())?;
        self.constructor = Some(constructor);
        Ok(())
    }

    pub fn add_method(&mut self, method: Method) -> Result<(), SchemaError> {
        if self.methods.contains_key(method.signature()) {
            return Err(SchemaError::DuplicateMethod(method.signature().to_string()));
        }
        check_unique_fields(method.inputs())?;
        check_unique_fields(method.outputs())?;
        self.methods.insert(method.signature().to_string(), method);
        Ok(())
    }

    pub fn add_event(&mut self, event: Event) -> Result<(), SchemaError> {
        if self.events.contains_key(event.signature()) {
            return Err(SchemaError::DuplicateEvent(event.signature().to_string()));
        }
        check_unique_fields(event.inputs())?;
        self.events.insert(event.signature().to_string(), event);
        Ok(())
    }

    pub fn add_error(&mut self, error: CustomError) -> Result<(), SchemaError> {
        if self.errors.contains_key(error.name()) {
            return Err(SchemaError::DuplicateError(error.name().to_string()));
        }
        check_unique_fields(error.inputs())?;
        self.errors.insert(error.name().to_string(), error);
        Ok(())
    }

    pub fn constructor(&self) -> Option<&Method> {
        self.constructor.as_ref()
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.values()
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    pub fn errors(&self) -> impl Iterator<Item = &CustomError> {
        self.errors.values()
    }

    // ── Lookups ─────────────────────────────────────────────────────────────

    pub fn method_by_signature(&self, signature: &str) -> Option<&Method> {
        self.methods.get(signature)
    }

    pub fn method_by_selector(&self, selector: [u8; 4]) -> Option<&Method> {
        self.methods.values().find(|m| m.selector == selector)
    }

    /// Selector given as hex, with or without `0x`, any case.
    pub fn method_by_hex_selector(&self, hex_selector: &str) -> Option<&Method> {
        fingerprint::parse_selector(hex_selector).and_then(|s| self.method_by_selector(s))
    }

    /// All overloads sharing `name`, in declaration order.
    pub fn methods_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Method> + 'a {
        self.methods.values().filter(move |m| m.name == name)
    }

    pub fn event_by_signature(&self, signature: &str) -> Option<&Event> {
        self.events.get(signature)
    }

    pub fn event_by_topic0(&self, topic0: B256) -> Option<&Event> {
        self.events
            .values()
            .find(|e| !e.anonymous && e.topic0 == topic0)
    }

    pub fn event_by_hex_topic(&self, hex_topic: &str) -> Option<&Event> {
        fingerprint::parse_topic(hex_topic).and_then(|t| self.event_by_topic0(t))
    }

    pub fn error_by_name(&self, name: &str) -> Option<&CustomError> {
        self.errors.get(name)
    }

    pub fn error_by_selector(&self, selector: [u8; 4]) -> Option<&CustomError> {
        self.errors.values().find(|e| e.selector == selector)
    }

    // ── Whole-interface codec operations ────────────────────────────────────

    /// Encoded constructor arguments (no selector). Without a declared
    /// constructor only an empty argument list is accepted.
    pub fn encode_constructor(&self, args: &Value) -> Result<Vec<u8>, EncodeError> {
        match &self.constructor {
            Some(ctor) => ctor.encode_args(args),
            None => encoder::encode(&Type::Tuple(Vec::new()), args),
        }
    }

    /// Find the method by the calldata's selector and decode its inputs.
    pub fn decode_call(&self, calldata: &[u8]) -> Result<DecodedCall, DecodeError> {
        let (selector, _) = split_selector(calldata)?;
        let method = self
            .method_by_selector(selector)
            .ok_or_else(|| DecodeError::UnknownSelector(fingerprint::selector_hex(&selector)))?;
        method.decode_input(calldata)
    }

    /// Match revert data against the declared custom errors.
    pub fn decode_error(&self, revert_data: &[u8]) -> Result<DecodedError, DecodeError> {
        let (selector, _) = split_selector(revert_data)?;
        let error = self
            .error_by_selector(selector)
            .ok_or_else(|| DecodeError::UnknownSelector(fingerprint::selector_hex(&selector)))?;
        error.decode(revert_data)
    }

    /// Route a log to its event by topic0 (or, failing that, to a matching
    /// anonymous event) and decode it.
    pub fn parse_log(&self, log: &RawLog) -> Result<DecodedLog, DecodeError> {
        let by_topic = log.topic0().and_then(|t| self.event_by_topic0(*t));
        let event = by_topic
            .or_else(|| self.events.values().find(|e| e.anonymous && e.matches(log)))
            .ok_or_else(|| {
                DecodeError::UnknownEvent(
                    log.topic0()
                        .map(|t| t.to_string())
                        .unwrap_or_else(|| "<none>".into()),
                )
            })?;
        event.parse_log(log)
    }
}

/// Reject repeated non-empty member names at any tuple level.
fn check_unique_fields(ty: &Type) -> Result<(), SchemaError> {
    match ty {
        Type::Tuple(elems) => {
            let mut seen = HashSet::new();
            for elem in elems {
                if !elem.name.is_empty() && !seen.insert(elem.name.as_str()) {
                    return Err(SchemaError::DuplicateField(elem.name.clone()));
                }
                check_unique_fields(&elem.ty)?;
            }
            Ok(())
        }
        Type::Array(elem, _) | Type::Slice(elem) => check_unique_fields(elem),
        _ => Ok(()),
    }
}
