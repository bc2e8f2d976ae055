use color_print::cprintln;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid computation `{comp}` in `{text}`")]
    InvalidComp {
        line: usize,
        text: String,
        comp: String,
    },

    #[error("Invalid destination `{dest}` in `{text}`")]
    InvalidDest {
        line: usize,
        text: String,
        dest: String,
    },

    #[error("Invalid jump condition `{jump}` in `{text}`")]
    InvalidJump {
        line: usize,
        text: String,
        jump: String,
    },

    #[error("Invalid address: `{text}`")]
    InvalidAddress { line: usize, text: String },

    #[error("Invalid label: `{text}`")]
    InvalidLabel { line: usize, text: String },

    #[error("Re-defined label: `{name}` (first defined at line {prev})")]
    RedefinedLabel {
        line: usize,
        name: String,
        prev: usize,
    },

    #[error("Re-defined predefined symbol: `{name}`")]
    RedefinedPredefined { line: usize, name: String },

    #[error("Program does not fit in ROM ({size} words)")]
    RomOverflow { line: usize, size: usize },

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),
}

impl Error {
    /// 1-based source line the error points at.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::InvalidComp { line, .. }
            | Error::InvalidDest { line, .. }
            | Error::InvalidJump { line, .. }
            | Error::InvalidAddress { line, .. }
            | Error::InvalidLabel { line, .. }
            | Error::RedefinedLabel { line, .. }
            | Error::RedefinedPredefined { line, .. }
            | Error::RomOverflow { line, .. } => Some(*line),
            Error::FileOpen(..) | Error::FileCreate(..) => None,
        }
    }

    /// Print error with diagnostic information showing file location and line content
    pub fn print_diag(&self, file: &str, source: &str) {
        cprintln!("<red,bold>error</>: {}", self);
        let Some(line_num) = self.line() else {
            return;
        };
        let line_content = source.lines().nth(line_num - 1).unwrap_or("");
        cprintln!("     <blue>--></> <underline>{}:{}</>", file, line_num);
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", line_num, line_content);
        cprintln!("      <blue>|</>");
    }
}
