use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown computation: `{0}`")]
    UnknownComp(String),

    #[error("Unknown destination: `{0}`")]
    UnknownDest(String),

    #[error("Unknown jump condition: `{0}`")]
    UnknownJump(String),

    #[error("Cannot decode word: {0:016b}")]
    UndefinedWord(u16),

    #[error("Unknown command: `{0}`")]
    UnknownCommand(String),

    #[error("Unknown segment: `{0}`")]
    UnknownSegment(String),

    #[error("More argument required")]
    MissingArgument,

    #[error("Too many arguments")]
    ExtraArgument,

    #[error("Cannot parse `{0}` as {1}")]
    ParseArgument(String, String),

    #[error("Index {1} is out of range for segment `{0}` (max {2})")]
    IndexOutOfRange(String, u16, u16),

    #[error("Cannot pop into segment `constant`")]
    PopConstant,

    #[error("Invalid symbol name: `{0}`")]
    InvalidSymbol(String),
}
