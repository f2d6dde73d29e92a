//! Human-readable declaration parser.
//!
//! Accepts the Solidity-style one-liners used in human-readable ABIs:
//!
//! ```text
//! function transfer(address to, uint256 amount) external returns (bool)
//! event Transfer(address indexed from, address indexed to, uint256 value)
//! error InsufficientBalance(uint256 available, uint256 required)
//! constructor(string name, string symbol) payable
//! ```
//!
//! Argument lists are located with bracket matching, wrapped in `tuple(...)`
//! and handed to the type grammar.

use abicodec_core::{error::SignatureError, TupleElem, Type};

use crate::interface::{CustomError, Event, Method};

/// One parsed declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Constructor(Method),
    Function(Method),
    Event(Event),
    Error(CustomError),
}

const FUNCTION_MODIFIERS: &[&str] = &[
    "public",
    "external",
    "internal",
    "private",
    "view",
    "pure",
    "constant",
    "payable",
    "nonpayable",
    "virtual",
    "override",
];

/// Dispatch on the leading keyword.
pub fn parse_declaration(text: &str) -> Result<Declaration, SignatureError> {
    let text = normalize(text);
    let keyword = text
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default();
    match keyword {
        "function" => parse_function(&text).map(Declaration::Function),
        "event" => parse_event(&text).map(Declaration::Event),
        "error" => parse_error(&text).map(Declaration::Error),
        "constructor" => parse_constructor(&text).map(Declaration::Constructor),
        _ => Err(SignatureError::UnknownKind(text)),
    }
}

/// `[function] name(args) [modifiers] [returns (args)]`
pub fn parse_function(text: &str) -> Result<Method, SignatureError> {
    let text = normalize(text);
    let body = strip_keyword(&text, "function");
    let (name, args, rest) = split_declaration(body, &text)?;
    require_name(name, &text)?;

    let (modifiers, returns) = parse_suffix(rest, &text)?;
    check_modifiers(&modifiers, FUNCTION_MODIFIERS, &text)?;
    let constant = modifiers
        .iter()
        .any(|m| matches!(m.as_str(), "view" | "pure" | "constant"));

    let inputs = parse_args(args)?;
    let outputs = match returns {
        Some(list) => parse_args(&list)?,
        None => Vec::new(),
    };
    Ok(Method::new(name, inputs, outputs, constant))
}

/// `[event] Name(args) [anonymous]`
pub fn parse_event(text: &str) -> Result<Event, SignatureError> {
    let text = normalize(text);
    let body = strip_keyword(&text, "event");
    let (name, args, rest) = split_declaration(body, &text)?;
    require_name(name, &text)?;
    let anonymous = match rest.trim() {
        "" => false,
        "anonymous" => true,
        other => return Err(malformed(&text, format!("unexpected '{other}' after event arguments"))),
    };
    Ok(Event::new(name, parse_args(args)?, anonymous))
}

/// `[error] Name(args)`
pub fn parse_error(text: &str) -> Result<CustomError, SignatureError> {
    let text = normalize(text);
    let body = strip_keyword(&text, "error");
    let (name, args, rest) = split_declaration(body, &text)?;
    require_name(name, &text)?;
    if !rest.trim().is_empty() {
        return Err(malformed(&text, format!("unexpected '{}' after error arguments", rest.trim())));
    }
    Ok(CustomError::new(name, parse_args(args)?))
}

/// `constructor(args) [modifiers]`
pub fn parse_constructor(text: &str) -> Result<Method, SignatureError> {
    let text = normalize(text);
    let Some(body) = text.strip_prefix("constructor") else {
        return Err(SignatureError::UnknownKind(text));
    };
    let (name, args, rest) = split_declaration(body, &text)?;
    if !name.is_empty() {
        return Err(malformed(&text, "constructor takes no name"));
    }
    let (modifiers, returns) = parse_suffix(rest, &text)?;
    if returns.is_some() {
        return Err(malformed(&text, "constructor cannot return values"));
    }
    check_modifiers(&modifiers, &["public", "internal", "payable", "nonpayable"], &text)?;
    Ok(Method::new("", parse_args(args)?, Vec::new(), false))
}

/// Fold newlines and tabs into spaces and trim.
fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> &'a str {
    match text.strip_prefix(keyword) {
        Some(rest) if rest.starts_with(' ') => rest.trim_start(),
        _ => text,
    }
}

/// Split `name(args)rest` at the first parenthesis and its match.
fn split_declaration<'a>(
    body: &'a str,
    input: &str,
) -> Result<(&'a str, &'a str, &'a str), SignatureError> {
    let open = body
        .find('(')
        .ok_or_else(|| malformed(input, "expected 'name(types)'"))?;
    let name = body[..open].trim();
    let (args, rest) = split_parens(&body[open..], input)?;
    Ok((name, args, rest))
}

/// `text` starts with `(`: return the contents up to the matching `)` and
/// whatever follows it.
fn split_parens<'a>(text: &'a str, input: &str) -> Result<(&'a str, &'a str), SignatureError> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| SignatureError::Unbalanced(input.to_string()))?;
                if depth == 0 {
                    return Ok((&text[1..i], &text[i + 1..]));
                }
            }
            _ => {}
        }
    }
    Err(SignatureError::Unbalanced(input.to_string()))
}

/// Modifier words plus an optional `returns (...)` list.
fn parse_suffix(rest: &str, input: &str) -> Result<(Vec<String>, Option<String>), SignatureError> {
    let mut words: Vec<String> = Vec::new();
    let mut returns = None;
    let mut rest = rest.trim_start();

    while !rest.is_empty() {
        if returns.is_some() {
            return Err(malformed(input, format!("unexpected '{rest}' after return list")));
        }
        if rest.starts_with('(') {
            if words.last().map(String::as_str) != Some("returns") {
                return Err(malformed(input, "unexpected '('"));
            }
            words.pop();
            let (list, after) = split_parens(rest, input)?;
            returns = Some(list.to_string());
            rest = after.trim_start();
            continue;
        }
        if rest.starts_with(')') {
            return Err(SignatureError::Unbalanced(input.to_string()));
        }
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
            .unwrap_or(rest.len());
        words.push(rest[..end].to_string());
        rest = rest[end..].trim_start();
    }

    if words.iter().any(|w| w == "returns") {
        return Err(malformed(input, "'returns' without an argument list"));
    }
    Ok((words, returns))
}

fn check_modifiers(words: &[String], allowed: &[&str], input: &str) -> Result<(), SignatureError> {
    match words.iter().find(|w| !allowed.contains(&w.as_str())) {
        Some(word) => Err(malformed(input, format!("unknown modifier '{word}'"))),
        None => Ok(()),
    }
}

fn require_name(name: &str, input: &str) -> Result<(), SignatureError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_' || c == '$');
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
        Ok(())
    } else {
        Err(malformed(input, format!("invalid name '{name}'")))
    }
}

/// Parse a comma-separated argument list through the type grammar.
fn parse_args(list: &str) -> Result<Vec<TupleElem>, SignatureError> {
    match Type::parse(&format!("tuple({list})"))? {
        Type::Tuple(elems) => Ok(elems),
        _ => Ok(Vec::new()),
    }
}

fn malformed(input: &str, reason: impl Into<String>) -> SignatureError {
    SignatureError::Malformed {
        input: input.to_string(),
        reason: reason.into(),
    }
}
