//! Path Lexer
//!
//! Tokenizes path expressions. Any character outside the accepted
//! grammar is reported instead of being passed through, so malformed
//! paths fail before evaluation.

/// Path token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Slash,       // /
    DoubleSlash, // //
    Dot,         // .
    DoubleDot,   // ..
    At,          // @
    Star,        // *
    Eq,          // =
    NotEq,       // !=

    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]

    Number(f64),
    Literal(String),

    /// Name, optionally prefixed (`ns:wing`)
    Name(String),

    Eof,
}

/// Lexing error: message and byte offset
pub type LexError = (String, usize);

/// Path lexer
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.remaining().chars().nth(offset)
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance(c.len_utf8());
            } else {
                break;
            }
        }
    }

    /// Tokenize the whole input, ending with `Token::Eof`
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let Some(c) = self.peek() else {
            return Ok(Token::Eof);
        };

        let single = |lexer: &mut Self, token: Token| {
            lexer.advance(1);
            Ok(token)
        };

        match c {
            '/' => {
                self.advance(1);
                if self.peek() == Some('/') {
                    self.advance(1);
                    Ok(Token::DoubleSlash)
                } else {
                    Ok(Token::Slash)
                }
            }
            '.' => {
                if self.peek_at(1) == Some('.') {
                    self.advance(2);
                    Ok(Token::DoubleDot)
                } else if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
                    self.read_number()
                } else {
                    single(self, Token::Dot)
                }
            }
            '@' => single(self, Token::At),
            '*' => single(self, Token::Star),
            '=' => single(self, Token::Eq),
            '(' => single(self, Token::LeftParen),
            ')' => single(self, Token::RightParen),
            '[' => single(self, Token::LeftBracket),
            ']' => single(self, Token::RightBracket),
            '!' if self.peek_at(1) == Some('=') => {
                self.advance(2);
                Ok(Token::NotEq)
            }
            '"' | '\'' => self.read_literal(c),
            '0'..='9' => self.read_number(),
            _ if is_name_start_char(c) => self.read_name(),
            _ => Err((format!("unexpected character '{c}'"), self.pos)),
        }
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                self.advance(1);
            } else {
                break;
            }
        }
        self.input[start..self.pos]
            .parse()
            .map(Token::Number)
            .map_err(|_| (format!("invalid number '{}'", &self.input[start..self.pos]), start))
    }

    fn read_literal(&mut self, quote: char) -> Result<Token, LexError> {
        let start = self.pos;
        self.advance(1);
        let Some(len) = self.remaining().find(quote) else {
            return Err(("unterminated string literal".to_string(), start));
        };
        let value = self.remaining()[..len].to_string();
        self.advance(len + 1);
        Ok(Token::Literal(value))
    }

    /// NCName, optionally followed by `:` and a second NCName
    fn read_name(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        self.read_ncname();
        if self.peek() == Some(':') && self.peek_at(1).is_some_and(is_name_start_char) {
            self.advance(1);
            self.read_ncname();
        }
        Ok(Token::Name(self.input[start..self.pos].to_string()))
    }

    fn read_ncname(&mut self) {
        while let Some(c) = self.peek() {
            if is_name_char(c) {
                self.advance(c.len_utf8());
            } else {
                break;
            }
        }
    }
}

fn is_name_start_char(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.') || (!c.is_ascii() && !c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        Lexer::new(input).tokenize().unwrap()
    }

    #[test]
    fn test_simple_path() {
        assert_eq!(
            lex("/plane/wings/wing[2]"),
            vec![
                Token::Slash,
                Token::Name("plane".into()),
                Token::Slash,
                Token::Name("wings".into()),
                Token::Slash,
                Token::Name("wing".into()),
                Token::LeftBracket,
                Token::Number(2.0),
                Token::RightBracket,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_descendant_attribute() {
        assert_eq!(
            lex("//@uID"),
            vec![Token::DoubleSlash, Token::At, Token::Name("uID".into()), Token::Eof]
        );
    }

    #[test]
    fn test_prefixed_name_and_literal() {
        assert_eq!(
            lex("c:wing[@name='a b']"),
            vec![
                Token::Name("c:wing".into()),
                Token::LeftBracket,
                Token::At,
                Token::Name("name".into()),
                Token::Eq,
                Token::Literal("a b".into()),
                Token::RightBracket,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_dots_and_functions() {
        assert_eq!(
            lex("../text()"),
            vec![
                Token::DoubleDot,
                Token::Slash,
                Token::Name("text".into()),
                Token::LeftParen,
                Token::RightParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_illegal_characters() {
        assert!(Lexer::new("/a/b#c").tokenize().is_err());
        assert!(Lexer::new("/a/%b").tokenize().is_err());
        assert!(Lexer::new("/a[@x='open]").tokenize().is_err());
        assert!(Lexer::new("/a;b").tokenize().is_err());
    }
}
