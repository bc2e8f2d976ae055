//! Stack-machine to Hack assembly translator.
//!
//! Segment addressing: `local/argument/this/that` go through the
//! `LCL/ARG/THIS/THAT` base registers, `temp` is `R5..R12`, `pointer`
//! is `THIS/THAT` itself and `static i` becomes the symbol `Unit.i`.

pub mod error;
pub mod parser;
pub mod translator;

pub use error::Error;
pub use parser::{parse, Line};
pub use translator::{translate, Translator, ENTRY};
