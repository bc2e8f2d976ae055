pub mod alu;
pub mod error;
pub mod inst;
pub mod reg;
pub mod vm;

pub use error::Error;
