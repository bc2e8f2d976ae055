use color_print::cprintln;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Program does not fit in ROM: {0} words")]
    RomTooLarge(usize),

    #[error("Invalid machine word `{text}` at line {line}")]
    InvalidWord { line: usize, text: String },

    #[error("Undefined instruction {word:016b} at {pc:04X}")]
    Decode {
        pc: u16,
        word: u16,
        #[source]
        source: arch::Error,
    },

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to load config: {0}")]
    Config(String, #[source] serde_yaml::Error),
}

impl Error {
    pub fn print_diag(&self) {
        cprintln!("<red,bold>error</>: {}", self);
        if let Some(source) = std::error::Error::source(self) {
            cprintln!("     <blue>=</> {}", source);
        }
    }
}
