//! The ABI type model.
//!
//! A [`Type`] is an immutable tree describing one ABI value type. Each
//! variant carries exactly the payload its kind needs: a bit width for
//! integers, a byte length for fixed bytes, an owned element for arrays and
//! an ordered list of [`TupleElem`]s for tuples.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GrammarError;

/// Size of one ABI word in bytes.
pub const WORD: usize = 32;

/// Byte length of an `address`.
pub const ADDRESS_LEN: usize = 20;

/// Byte length of a `function` (address + selector).
pub const FUNCTION_LEN: usize = 24;

/// Kind tag of a [`Type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Bool,
    Uint,
    Int,
    String,
    Bytes,
    FixedBytes,
    Address,
    Array,
    Slice,
    Tuple,
    Function,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::Bool => "Bool",
            Kind::Uint => "Uint",
            Kind::Int => "Int",
            Kind::String => "String",
            Kind::Bytes => "Bytes",
            Kind::FixedBytes => "FixedBytes",
            Kind::Address => "Address",
            Kind::Array => "Array",
            Kind::Slice => "Slice",
            Kind::Tuple => "Tuple",
            Kind::Function => "Function",
        };
        write!(f, "{s}")
    }
}

/// One ABI value type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    /// Unsigned integer, width in bits.
    Uint(usize),
    /// Signed integer, width in bits.
    Int(usize),
    String,
    /// Dynamic byte array.
    Bytes,
    /// `bytes1` .. `bytes32`, length in bytes.
    FixedBytes(usize),
    Address,
    /// 20-byte address followed by a 4-byte selector.
    Function,
    /// Fixed-length array `T[N]`.
    Array(Box<Type>, usize),
    /// Dynamic array `T[]`.
    Slice(Box<Type>),
    Tuple(Vec<TupleElem>),
}

/// A named member of a tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleElem {
    /// Parameter name; may be empty.
    pub name: String,
    pub ty: Type,
    /// Only meaningful in an event's top-level tuple.
    pub indexed: bool,
}

impl TupleElem {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            indexed: false,
        }
    }

    pub fn indexed(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            indexed: true,
        }
    }

    /// Name used as a map key: the declared name, or the positional index
    /// when the name is empty.
    pub fn key(&self, position: usize) -> String {
        if self.name.is_empty() {
            position.to_string()
        } else {
            self.name.clone()
        }
    }
}

impl Type {
    /// Parse a type string such as `uint256[3][]` or `tuple(address to, uint256)`.
    pub fn parse(s: &str) -> Result<Self, GrammarError> {
        crate::grammar::parse_type(s)
    }

    /// Build a tuple of unnamed elements.
    pub fn tuple_of(types: impl IntoIterator<Item = Type>) -> Self {
        Type::Tuple(types.into_iter().map(|t| TupleElem::new("", t)).collect())
    }

    pub fn kind(&self) -> Kind {
        match self {
            Type::Bool => Kind::Bool,
            Type::Uint(_) => Kind::Uint,
            Type::Int(_) => Kind::Int,
            Type::String => Kind::String,
            Type::Bytes => Kind::Bytes,
            Type::FixedBytes(_) => Kind::FixedBytes,
            Type::Address => Kind::Address,
            Type::Function => Kind::Function,
            Type::Array(..) => Kind::Array,
            Type::Slice(_) => Kind::Slice,
            Type::Tuple(_) => Kind::Tuple,
        }
    }

    /// Bit width for integers, byte length for fixed bytes / address /
    /// function, element count for fixed arrays, zero otherwise.
    pub fn size(&self) -> usize {
        match self {
            Type::Uint(bits) | Type::Int(bits) => *bits,
            Type::FixedBytes(len) => *len,
            Type::Address => ADDRESS_LEN,
            Type::Function => FUNCTION_LEN,
            Type::Array(_, len) => *len,
            _ => 0,
        }
    }

    /// Element type of an array or slice.
    pub fn elem(&self) -> Option<&Type> {
        match self {
            Type::Array(elem, _) | Type::Slice(elem) => Some(elem),
            _ => None,
        }
    }

    /// Members of a tuple; empty for every other kind.
    pub fn tuple_elems(&self) -> &[TupleElem] {
        match self {
            Type::Tuple(elems) => elems,
            _ => &[],
        }
    }

    /// Whether the encoded length of this type is not statically known.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Type::String | Type::Bytes | Type::Slice(_) => true,
            Type::Array(elem, _) => elem.is_dynamic(),
            Type::Tuple(elems) => elems.iter().any(|e| e.ty.is_dynamic()),
            _ => false,
        }
    }

    /// Number of bytes this type occupies in a head region: its full
    /// encoding for static types, one offset word for dynamic ones.
    pub fn head_size(&self) -> usize {
        if self.is_dynamic() {
            return WORD;
        }
        match self {
            Type::Array(elem, len) => len.saturating_mul(elem.head_size()),
            Type::Tuple(elems) => elems
                .iter()
                .fold(0usize, |acc, e| acc.saturating_add(e.ty.head_size())),
            _ => WORD,
        }
    }

    /// Render the type. With `include_args`, tuple members carry their
    /// `indexed` flag and names so the output parses back to the same tree.
    pub fn format(&self, include_args: bool) -> String {
        self.render(include_args, true)
    }

    /// Canonical form used in signatures: no names, no `indexed`, and tuples
    /// written as bare parentheses.
    pub fn canonical(&self) -> String {
        self.render(false, false)
    }

    fn render(&self, include_args: bool, tuple_keyword: bool) -> String {
        match self {
            Type::Bool => "bool".into(),
            Type::Uint(bits) => format!("uint{bits}"),
            Type::Int(bits) => format!("int{bits}"),
            Type::String => "string".into(),
            Type::Bytes => "bytes".into(),
            Type::FixedBytes(len) => format!("bytes{len}"),
            Type::Address => "address".into(),
            Type::Function => "function".into(),
            Type::Array(elem, len) => {
                format!("{}[{len}]", elem.render(include_args, tuple_keyword))
            }
            Type::Slice(elem) => format!("{}[]", elem.render(include_args, tuple_keyword)),
            Type::Tuple(elems) => {
                let parts: Vec<String> = elems
                    .iter()
                    .map(|e| {
                        let mut part = e.ty.render(include_args, tuple_keyword);
                        if include_args {
                            if e.indexed {
                                part.push_str(" indexed");
                            }
                            if !e.name.is_empty() {
                                part.push(' ');
                                part.push_str(&e.name);
                            }
                        }
                        part
                    })
                    .collect();
                let prefix = if tuple_keyword { "tuple" } else { "" };
                format!("{prefix}({})", parts.join(","))
            }
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

impl FromStr for Type {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Type::parse(s)
    }
}
