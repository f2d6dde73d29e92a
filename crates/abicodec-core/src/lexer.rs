//! Single-pass scanner for ABI type strings.
//!
//! The lexer keeps one token of lookahead: after the parser finishes a tuple
//! element it peeks to decide whether the next identifier is a parameter
//! name or the `indexed` keyword.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Eof,
    /// Identifier, possibly with trailing digits (`uint256`, `_to`).
    Ident(String),
    Number(String),
    Tuple,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Indexed,
    Invalid(char),
}

impl Token {
    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Eof => "end of input".into(),
            Token::Ident(s) => format!("identifier '{s}'"),
            Token::Number(n) => format!("number '{n}'"),
            Token::Tuple => "'tuple'".into(),
            Token::LParen => "'('".into(),
            Token::RParen => "')'".into(),
            Token::LBracket => "'['".into(),
            Token::RBracket => "']'".into(),
            Token::Comma => "','".into(),
            Token::Indexed => "'indexed'".into(),
            Token::Invalid(c) => format!("invalid character '{c}'"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    current: Token,
    peek: Token,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Self {
            input,
            pos: 0,
            current: Token::Eof,
            peek: Token::Eof,
        };
        lexer.peek = lexer.scan();
        lexer
    }

    /// Advance: the peeked token becomes current and a new one is scanned.
    pub fn next_token(&mut self) -> Token {
        let next = self.scan();
        self.current = std::mem::replace(&mut self.peek, next);
        self.current.clone()
    }

    pub fn current(&self) -> &Token {
        &self.current
    }

    pub fn peek(&self) -> &Token {
        &self.peek
    }

    /// Unconsumed text after the peeked token, for diagnostics.
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn scan(&mut self) -> Token {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        let Some(&ch) = bytes.get(self.pos) else {
            return Token::Eof;
        };

        let single = match ch {
            b',' => Some(Token::Comma),
            b'(' => Some(Token::LParen),
            b')' => Some(Token::RParen),
            b'[' => Some(Token::LBracket),
            b']' => Some(Token::RBracket),
            _ => None,
        };
        if let Some(tok) = single {
            self.pos += 1;
            return tok;
        }

        if is_letter(ch) {
            let start = self.pos;
            while self.pos < bytes.len() && (is_letter(bytes[self.pos]) || bytes[self.pos].is_ascii_digit()) {
                self.pos += 1;
            }
            let word = &self.input[start..self.pos];
            return match word {
                "tuple" => Token::Tuple,
                "indexed" => Token::Indexed,
                _ => Token::Ident(word.to_string()),
            };
        }

        if ch.is_ascii_digit() {
            let start = self.pos;
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
            return Token::Number(self.input[start..self.pos].to_string());
        }

        // Step over the whole UTF-8 character so `rest()` stays on a boundary.
        let c = self.input[self.pos..].chars().next().unwrap_or('\u{fffd}');
        self.pos += c.len_utf8();
        Token::Invalid(c)
    }
}

fn is_letter(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_' || ch == b'$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token();
            if tok == Token::Eof {
                break;
            }
            out.push(tok);
        }
        out
    }

    #[test]
    fn scans_tuple_with_names() {
        assert_eq!(
            tokens("tuple(address indexed from, uint256[2] amounts)"),
            vec![
                Token::Tuple,
                Token::LParen,
                Token::Ident("address".into()),
                Token::Indexed,
                Token::Ident("from".into()),
                Token::Comma,
                Token::Ident("uint256".into()),
                Token::LBracket,
                Token::Number("2".into()),
                Token::RBracket,
                Token::Ident("amounts".into()),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn peek_is_one_ahead() {
        let mut lexer = Lexer::new("bool ok");
        assert_eq!(lexer.peek(), &Token::Ident("bool".into()));
        lexer.next_token();
        assert_eq!(lexer.current(), &Token::Ident("bool".into()));
        assert_eq!(lexer.peek(), &Token::Ident("ok".into()));
    }

    #[test]
    fn invalid_characters_are_tokens() {
        assert_eq!(
            tokens("uint256;"),
            vec![Token::Ident("uint256".into()), Token::Invalid(';')]
        );
        assert_eq!(tokens("é"), vec![Token::Invalid('é')]);
    }

    #[test]
    fn whitespace_and_newlines_are_skipped() {
        assert_eq!(
            tokens("\n\t( bool ,\r\n string )"),
            vec![
                Token::LParen,
                Token::Ident("bool".into()),
                Token::Comma,
                Token::Ident("string".into()),
                Token::RParen,
            ]
        );
    }
}
