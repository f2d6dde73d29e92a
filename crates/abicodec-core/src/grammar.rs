//! Recursive-descent parser for ABI type strings.
//!
//! ```text
//! type   := tuple | simple ('[' size? ']')*
//! tuple  := ('tuple' | ε) '(' (elem (',' elem)*)? ')'
//! elem   := type ('indexed'? IDENT?)
//! simple := LETTERS DIGITS?
//! ```
//!
//! Array suffixes apply to tuples as well and chain left to right, so
//! `uint256[3][]` is a dynamic array of three-element arrays.
//!
//! Every tuple and array level counts towards [`MAX_DEPTH`]; deeper input is
//! rejected with [`GrammarError::TooDeep`].

use crate::error::GrammarError;
use crate::lexer::{Lexer, Token};
use crate::types::{TupleElem, Type};

/// Maximum nesting of tuples and array suffixes in one type string.
pub const MAX_DEPTH: usize = 128;

/// Parse a complete type string. Input left over after the type is an error.
pub fn parse_type(input: &str) -> Result<Type, GrammarError> {
    let mut lexer = Lexer::new(input);
    let ty = read_type(&mut lexer, 0)?;
    if *lexer.peek() != Token::Eof {
        let rest = format!("{} {}", lexer.peek(), lexer.rest().trim());
        return Err(GrammarError::TrailingInput(rest.trim().to_string()));
    }
    Ok(ty)
}

fn read_type(lexer: &mut Lexer<'_>, mut depth: usize) -> Result<Type, GrammarError> {
    let mut ty = match lexer.next_token() {
        Token::Tuple => {
            let open = lexer.next_token();
            if open != Token::LParen {
                return Err(unexpected("'('", &open));
            }
            read_tuple(lexer, depth + 1)?
        }
        Token::LParen => read_tuple(lexer, depth + 1)?,
        Token::Ident(word) => decode_simple(&word)?,
        other => return Err(unexpected("type name", &other)),
    };

    while *lexer.peek() == Token::LBracket {
        lexer.next_token();
        depth += 1;
        check_depth(depth)?;
        ty = match lexer.next_token() {
            Token::RBracket => Type::Slice(Box::new(ty)),
            Token::Number(literal) => {
                let len = literal
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| GrammarError::InvalidArraySize(literal.clone()))?;
                let close = lexer.next_token();
                if close != Token::RBracket {
                    return Err(unexpected("']'", &close));
                }
                Type::Array(Box::new(ty), len)
            }
            other => return Err(GrammarError::NotExpected(other.describe())),
        };
    }
    Ok(ty)
}

/// Parse tuple members; the opening parenthesis is the current token.
fn read_tuple(lexer: &mut Lexer<'_>, depth: usize) -> Result<Type, GrammarError> {
    check_depth(depth)?;
    let mut elems = Vec::new();
    if *lexer.peek() == Token::RParen {
        lexer.next_token();
        return Ok(Type::Tuple(elems));
    }

    loop {
        let ty = read_type(lexer, depth)?;
        let mut name = String::new();
        let mut indexed = false;

        if *lexer.peek() == Token::Indexed {
            lexer.next_token();
            indexed = true;
        }
        if let Token::Ident(_) = lexer.peek() {
            if let Token::Ident(ident) = lexer.next_token() {
                name = ident;
            }
        }
        elems.push(TupleElem { name, ty, indexed });

        match lexer.next_token() {
            Token::Comma => continue,
            Token::RParen => break,
            other => return Err(GrammarError::NotExpected(other.describe())),
        }
    }
    Ok(Type::Tuple(elems))
}

fn check_depth(depth: usize) -> Result<(), GrammarError> {
    if depth > MAX_DEPTH {
        return Err(GrammarError::TooDeep { limit: MAX_DEPTH });
    }
    Ok(())
}

/// Resolve `LETTERS DIGITS?` into an elementary type.
fn decode_simple(word: &str) -> Result<Type, GrammarError> {
    let split = word.find(|c: char| c.is_ascii_digit()).unwrap_or(word.len());
    let (base, digits) = word.split_at(split);
    if base.is_empty()
        || !base.chars().all(|c| c.is_ascii_alphabetic())
        || !digits.chars().all(|c| c.is_ascii_digit())
    {
        return Err(GrammarError::UnknownType(word.to_string()));
    }
    if digits.starts_with('0') {
        return Err(GrammarError::LeadingZero(word.to_string()));
    }

    let size = if digits.is_empty() {
        None
    } else {
        Some(
            digits
                .parse::<usize>()
                .map_err(|_| GrammarError::UnknownType(word.to_string()))?,
        )
    };

    match base {
        "uint" | "int" => {
            let bits = size.unwrap_or(256);
            if bits == 0 || bits % 8 != 0 || bits > 256 {
                return Err(GrammarError::InvalidBitWidth { bits });
            }
            Ok(if base == "uint" {
                Type::Uint(bits)
            } else {
                Type::Int(bits)
            })
        }
        "bytes" => match size {
            None => Ok(Type::Bytes),
            Some(len) if (1..=32).contains(&len) => Ok(Type::FixedBytes(len)),
            Some(len) => Err(GrammarError::InvalidBytesLength { len }),
        },
        _ if size.is_some() => {
            if matches!(base, "byte" | "string" | "bool" | "address" | "function") {
                Err(GrammarError::UnexpectedSize(base.to_string()))
            } else {
                Err(GrammarError::UnknownType(word.to_string()))
            }
        }
        "byte" => Ok(Type::FixedBytes(1)),
        "string" => Ok(Type::String),
        "bool" => Ok(Type::Bool),
        "address" => Ok(Type::Address),
        "function" => Ok(Type::Function),
        _ => Err(GrammarError::UnknownType(word.to_string())),
    }
}

fn unexpected(expected: &str, found: &Token) -> GrammarError {
    GrammarError::UnexpectedToken {
        expected: expected.to_string(),
        found: found.describe(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elementary_types() {
        assert_eq!(parse_type("uint").unwrap(), Type::Uint(256));
        assert_eq!(parse_type("int").unwrap(), Type::Int(256));
        assert_eq!(parse_type("uint8").unwrap(), Type::Uint(8));
        assert_eq!(parse_type("int24").unwrap(), Type::Int(24));
        assert_eq!(parse_type("bytes").unwrap(), Type::Bytes);
        assert_eq!(parse_type("bytes32").unwrap(), Type::FixedBytes(32));
        assert_eq!(parse_type("byte").unwrap(), Type::FixedBytes(1));
        assert_eq!(parse_type("address").unwrap(), Type::Address);
        assert_eq!(parse_type("function").unwrap(), Type::Function);
        assert_eq!(parse_type("string").unwrap(), Type::String);
        assert_eq!(parse_type("bool").unwrap(), Type::Bool);
    }

    #[test]
    fn array_suffixes_chain_left_to_right() {
        let ty = parse_type("uint256[3][]").unwrap();
        assert_eq!(
            ty,
            Type::Slice(Box::new(Type::Array(Box::new(Type::Uint(256)), 3)))
        );
        assert_eq!(ty.to_string(), "uint256[3][]");
    }

    #[test]
    fn tuples_with_names_and_indexed() {
        let ty = parse_type("tuple(address indexed from, uint256 value, bool)").unwrap();
        let elems = ty.tuple_elems();
        assert_eq!(elems.len(), 3);
        assert_eq!(elems[0].name, "from");
        assert!(elems[0].indexed);
        assert_eq!(elems[1].name, "value");
        assert!(!elems[1].indexed);
        assert_eq!(elems[2].name, "");
        assert_eq!(elems[2].ty, Type::Bool);
    }

    #[test]
    fn indexed_without_name() {
        let ty = parse_type("(address indexed, uint256)").unwrap();
        assert!(ty.tuple_elems()[0].indexed);
        assert!(ty.tuple_elems()[0].name.is_empty());
    }

    #[test]
    fn nested_tuple_arrays() {
        let ty = parse_type("tuple(tuple(uint8 a, string b)[] items, bytes4 tag)").unwrap();
        assert_eq!(ty.canonical(), "((uint8,string)[],bytes4)");
        assert_eq!(ty.format(true), "tuple(tuple(uint8 a,string b)[] items,bytes4 tag)");
        assert_eq!(parse_type(&ty.format(true)).unwrap(), ty);
    }

    #[test]
    fn empty_tuple() {
        assert_eq!(parse_type("tuple()").unwrap(), Type::Tuple(vec![]));
        assert_eq!(parse_type("()").unwrap(), Type::Tuple(vec![]));
    }

    #[test]
    fn rejects_bad_widths() {
        assert_eq!(
            parse_type("uint7"),
            Err(GrammarError::InvalidBitWidth { bits: 7 })
        );
        assert_eq!(
            parse_type("int264"),
            Err(GrammarError::InvalidBitWidth { bits: 264 })
        );
        assert_eq!(
            parse_type("bytes33"),
            Err(GrammarError::InvalidBytesLength { len: 33 })
        );
        assert_eq!(
            parse_type("address20"),
            Err(GrammarError::UnexpectedSize("address".into()))
        );
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(matches!(parse_type("uint256x"), Err(GrammarError::UnknownType(_))));
        assert!(matches!(parse_type("fixed128x18"), Err(GrammarError::UnknownType(_))));
        assert!(matches!(parse_type("foo"), Err(GrammarError::UnknownType(_))));
    }

    #[test]
    fn rejects_bad_punctuation() {
        assert!(parse_type("tuple(uint256").is_err());
        assert!(parse_type("tuple uint256").is_err());
        assert!(parse_type("(uint256 a b)").is_err());
        assert!(parse_type("uint256[").is_err());
        assert!(parse_type("uint256[2").is_err());
        assert!(parse_type("uint256[x]").is_err());
        assert!(matches!(
            parse_type("uint256[0]"),
            Err(GrammarError::InvalidArraySize(_))
        ));
        assert!(parse_type("").is_err());
        assert!(parse_type(",").is_err());
    }

    #[test]
    fn rejects_trailing_input() {
        assert!(matches!(
            parse_type("uint256 )"),
            Err(GrammarError::TrailingInput(_))
        ));
    }

    #[test]
    fn nesting_is_limited() {
        let at_limit = format!("{}uint8{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(parse_type(&at_limit).is_ok());

        let deep = format!("{}uint8{}", "(".repeat(5_000), ")".repeat(5_000));
        assert_eq!(
            parse_type(&deep),
            Err(GrammarError::TooDeep { limit: MAX_DEPTH })
        );

        let unclosed = "tuple(".repeat(10_000);
        assert_eq!(
            parse_type(&unclosed),
            Err(GrammarError::TooDeep { limit: MAX_DEPTH })
        );

        let suffixes = format!("uint8{}", "[]".repeat(MAX_DEPTH + 1));
        assert_eq!(
            parse_type(&suffixes),
            Err(GrammarError::TooDeep { limit: MAX_DEPTH })
        );
        assert!(parse_type(&format!("uint8{}", "[]".repeat(MAX_DEPTH))).is_ok());
    }

    #[test]
    fn rejects_leading_zero_widths() {
        for text in ["uint08", "int016", "bytes04", "bytes0", "uint0"] {
            assert_eq!(
                parse_type(text),
                Err(GrammarError::LeadingZero(text.into())),
                "{text}"
            );
        }
        assert_eq!(parse_type("bytes10").unwrap(), Type::FixedBytes(10));
        assert_eq!(parse_type("uint80").unwrap(), Type::Uint(80));
    }

    #[test]
    fn from_str_delegates() {
        let ty: Type = "bool[2]".parse().unwrap();
        assert_eq!(ty, Type::Array(Box::new(Type::Bool), 2));
    }
}
