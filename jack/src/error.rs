use crate::grammar::token::Pos;
use color_print::cprintln;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unrecognized character `{ch}`")]
    UnknownChar { ch: char, pos: Pos },

    #[error("Unterminated string constant")]
    UnterminatedString { pos: Pos },

    #[error("Unterminated block comment")]
    UnterminatedComment { pos: Pos },

    #[error("Integer constant `{text}` is out of range (0..=32767)")]
    IntegerOverflow { text: String, pos: Pos },

    #[error("Expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        pos: Pos,
    },

    #[error("Expected {expected}, found end of file")]
    UnexpectedEof { expected: String },

    #[error("Undefined variable `{name}`")]
    UndefinedVariable { name: String, pos: Pos },

    #[error("Unexpected input after the end of the class")]
    TrailingInput { pos: Pos },

    #[error("No `.jack` files in {0}")]
    NoInput(String),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),
}

impl Error {
    pub fn pos(&self) -> Option<Pos> {
        match self {
            Error::UnknownChar { pos, .. }
            | Error::UnterminatedString { pos }
            | Error::UnterminatedComment { pos }
            | Error::IntegerOverflow { pos, .. }
            | Error::UnexpectedToken { pos, .. }
            | Error::UndefinedVariable { pos, .. }
            | Error::TrailingInput { pos } => Some(*pos),
            Error::UnexpectedEof { .. }
            | Error::NoInput(_)
            | Error::FileOpen(..)
            | Error::FileCreate(..) => None,
        }
    }

    /// Print error with the offending line and a caret under the column
    pub fn print_diag(&self, file: &str, source: &str) {
        cprintln!("<red,bold>error</>: {}", self);
        let Some(pos) = self.pos() else {
            return;
        };
        let line_content = source.lines().nth(pos.line - 1).unwrap_or("");
        cprintln!("     <blue>--></> <underline>{}:{}</>", file, pos);
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", pos.line, line_content);
        cprintln!(
            "      <blue>|</> {}<red,bold>^</>",
            " ".repeat(pos.col.saturating_sub(1))
        );
    }
}
