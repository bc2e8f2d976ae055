use super::token::{Keyword, Pos, Token, TokenKind, SYMBOLS};
use crate::error::Error;
use arch::reg::MAX_ADDR;
use std::iter::Peekable;
use std::str::Chars;

pub struct Lexer<'a> {
    iter: Peekable<Chars<'a>>,
    pos: Pos,
}

impl<'a> Lexer<'a> {
    pub fn new(code: &'a str) -> Self {
        Self {
            iter: code.chars().peekable(),
            pos: Pos { line: 1, col: 1 },
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl Lexer<'_> {
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.iter.clone().nth(n)
    }

    fn consume(&mut self) -> Option<char> {
        let ch = self.iter.next()?;
        if ch == '\n' {
            self.pos.line += 1;
            self.pos.col = 1;
        } else {
            self.pos.col += 1;
        }
        Some(ch)
    }

    fn consume_while<F: Fn(char) -> bool>(&mut self, cond: F) -> String {
        let mut lexeme = String::new();
        while let Some(ch) = self.iter.peek().copied() {
            if !cond(ch) {
                break;
            }
            lexeme.push(ch);
            self.consume();
        }
        lexeme
    }
}

// ----------------------------------------------------------------------------
// Lexer
// ----------------------------------------------------------------------------

impl Lexer<'_> {
    pub fn parse(mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();
        while let Some(ch0) = self.peek_nth(0) {
            let pos = self.pos;

            // 0. Skip whitespaces
            if ch0.is_whitespace() {
                self.consume();
                continue;
            }

            // 1. Comments
            match (ch0, self.peek_nth(1)) {
                ('/', Some('/')) => {
                    self.consume_while(|ch| ch != '\n');
                    continue;
                }
                ('/', Some('*')) => {
                    self.skip_block_comment(pos)?;
                    continue;
                }
                _ => {}
            }

            // 2. String literal
            if ch0 == '"' {
                tokens.push(Token::new(self.parse_text(pos)?, pos));
                continue;
            }

            // 3. Identifier or keyword
            if ch0.is_ascii_alphabetic() || ch0 == '_' {
                let lexeme = self.consume_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
                let kind = match lexeme.parse::<Keyword>() {
                    Ok(kw) => TokenKind::Keyword(kw),
                    Err(_) => TokenKind::Ident(lexeme),
                };
                tokens.push(Token::new(kind, pos));
                continue;
            }

            // 4. Integer literal
            if ch0.is_ascii_digit() {
                let lexeme = self.consume_while(|ch| ch.is_ascii_digit());
                let value = lexeme
                    .parse::<u16>()
                    .ok()
                    .filter(|n| *n <= MAX_ADDR)
                    .ok_or(Error::IntegerOverflow { text: lexeme, pos })?;
                tokens.push(Token::new(TokenKind::IntConst(value), pos));
                continue;
            }

            // 5. Symbol
            if SYMBOLS.contains(ch0) {
                self.consume();
                tokens.push(Token::new(TokenKind::Symbol(ch0), pos));
                continue;
            }

            return Err(Error::UnknownChar { ch: ch0, pos });
        }
        Ok(tokens)
    }

    fn skip_block_comment(&mut self, start: Pos) -> Result<(), Error> {
        self.consume(); // '/'
        self.consume(); // '*'
        while let Some(ch) = self.consume() {
            if ch == '*' && self.iter.peek() == Some(&'/') {
                self.consume();
                return Ok(());
            }
        }
        Err(Error::UnterminatedComment { pos: start })
    }

    /// "..." on a single line, no escapes.
    fn parse_text(&mut self, start: Pos) -> Result<TokenKind, Error> {
        self.consume(); // opening '"'
        let mut lexeme = String::new();
        loop {
            match self.iter.peek().copied() {
                Some('"') => {
                    self.consume();
                    return Ok(TokenKind::StringConst(lexeme));
                }
                None | Some('\n') => return Err(Error::UnterminatedString { pos: start }),
                Some(ch) if u32::from(ch) > u32::from(MAX_ADDR) => {
                    return Err(Error::UnknownChar { ch, pos: self.pos })
                }
                Some(ch) => {
                    lexeme.push(ch);
                    self.consume();
                }
            }
        }
    }
}

/// Tokenize a whole unit.
pub fn tokenize(code: &str) -> Result<Vec<Token>, Error> {
    Lexer::new(code).parse()
}
