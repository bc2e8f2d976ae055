use super::token::{Pos, Token};
use crate::error::Error;
use std::iter::Peekable;
use std::vec::IntoIter;

/// Token cursor: current token plus `advance`, no rewind.
pub struct Parser {
    tokens: Peekable<IntoIter<Token>>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens: tokens.into_iter().peekable(),
        }
    }
}

impl Parser {
    /// Peek : Watch next token without consuming it
    pub fn peek(&mut self) -> Option<&Token> {
        self.tokens.peek()
    }

    /// Next : Consume next token and return it
    pub fn next(&mut self) -> Option<Token> {
        self.tokens.next()
    }

    /// Position of the next token, if any.
    pub fn pos(&mut self) -> Option<Pos> {
        self.tokens.peek().map(|token| token.pos)
    }

    /// Peek and check next token is match with condition
    pub fn check_if<F: Fn(&Token) -> bool>(&mut self, cond: F) -> bool {
        self.tokens.peek().is_some_and(cond)
    }

    /// Consume if next token is match with condition
    pub fn consume_if<F: Fn(&Token) -> bool>(&mut self, cond: F) -> Option<Token> {
        self.tokens.next_if(|token| cond(token))
    }

    /// Next token must be match with condition
    pub fn expect_tobe<F: Fn(&Token) -> bool>(
        &mut self,
        expected: &str,
        cond: F,
    ) -> Result<Token, Error> {
        match self.tokens.next_if(|token| cond(token)) {
            Some(token) => Ok(token),
            None => Err(self.unexpected(expected)),
        }
    }

    /// Error for the next token not being `expected`.
    pub fn unexpected(&mut self, expected: &str) -> Error {
        match self.tokens.peek() {
            Some(token) => Error::UnexpectedToken {
                expected: expected.to_string(),
                found: token.kind.to_string(),
                pos: token.pos,
            },
            None => Error::UnexpectedEof {
                expected: expected.to_string(),
            },
        }
    }
}

#[macro_export]
macro_rules! check {
    ($parser:expr, $kind:pat) => {
        $parser.check_if(|token| matches!(&token.kind, $kind))
    };
}

#[macro_export]
macro_rules! expect {
    ($parser:expr, $kind:pat, $expected:expr) => {
        $parser.expect_tobe($expected, |token| matches!(&token.kind, $kind))
    };
}

#[macro_export]
macro_rules! optional {
    ($parser:expr, $trigger:pat) => {
        $parser.consume_if(|token| matches!(&token.kind, $trigger))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{lexer::tokenize, token::TokenKind::*};

    #[test]
    fn expect_and_check() {
        let mut parser = Parser::new(tokenize("x ;").unwrap());
        assert!(check!(parser, Ident(_)));
        assert!(!check!(parser, Symbol(';')));
        assert!(expect!(parser, Ident(_), "identifier").is_ok());
        assert!(optional!(parser, Symbol(',')).is_none());
        let err = expect!(parser, Symbol('{'), "`{`").unwrap_err();
        assert!(matches!(err, Error::UnexpectedToken { ref expected, .. } if expected == "`{`"));
        assert!(expect!(parser, Symbol(';'), "`;`").is_ok());
        assert!(matches!(
            expect!(parser, Symbol(';'), "`;`"),
            Err(Error::UnexpectedEof { .. })
        ));
    }
}
