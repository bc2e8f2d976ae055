use color_print::cprintln;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{source}: `{text}`")]
    Parse {
        line: usize,
        text: String,
        #[source]
        source: arch::Error,
    },

    #[error("Stack underflow: `{text}` needs {need} value(s), only {have} on the stack")]
    StackUnderflow {
        line: usize,
        text: String,
        need: usize,
        have: usize,
    },

    #[error("No `.vm` file found in {0}")]
    NoInput(String),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),
}

impl Error {
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Parse { line, .. } | Error::StackUnderflow { line, .. } => Some(*line),
            _ => None,
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
