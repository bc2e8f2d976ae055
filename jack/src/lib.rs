pub mod compile;
pub mod error;
pub mod grammar;
pub mod symbols;
pub mod writer;

pub use compile::{Compiled, Engine};
pub use error::Error;

/// Compile one class to stack-machine code. Nothing is produced on failure.
pub fn compile(source: &str) -> Result<Compiled, Error> {
    let tokens = grammar::lexer::tokenize(source)?;
    Engine::new(tokens).compile()
}
