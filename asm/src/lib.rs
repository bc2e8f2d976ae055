//! Two-pass assembler for the Hack platform.
//!
//! Pass 1 binds every `(LABEL)` to the ROM address of the next real
//! instruction. Pass 2 binds unknown `@symbol`s to fresh RAM cells
//! (from `R16` upwards, first reference wins) and encodes each line
//! into a 16-bit word.

pub mod error;
pub mod ident;
pub mod parser;
pub mod util;

pub use error::Error;
pub use ident::{Ident, Idents};
pub use parser::{clean, Imm, Line, Stmt};

use arch::{inst::Inst, reg::ROM_SIZE};

/// Result of assembling one unit.
#[derive(Debug, Clone)]
pub struct Program {
    /// Parsed statements; real instructions carry their ROM address.
    pub lines: Vec<(Line, Stmt, Option<(u16, Inst)>)>,
    pub idents: Idents,
}

impl Program {
    pub fn words(&self) -> Vec<u16> {
        self.lines
            .iter()
            .filter_map(|(_, _, inst)| inst.map(|(_, inst)| inst.to_bin()))
            .collect()
    }

    /// One 16-character binary word per line.
    pub fn to_text(&self) -> String {
        self.lines
            .iter()
            .filter_map(|(_, _, inst)| inst.map(|(_, inst)| inst.to_bin_str() + "\n"))
            .collect()
    }
}

/// Assemble source text into a program.
pub fn assemble(source: &str) -> Result<Program, Error> {
    let lines = clean(source);

    // 1. Parse lines & collect labels
    let mut idents = Idents::new();
    let mut stmts = Vec::with_capacity(lines.len());
    let mut pc: usize = 0;
    for line in lines {
        let stmt = Stmt::parse(&line)?;
        if pc >= ROM_SIZE {
            return Err(Error::RomOverflow {
                line: line.no,
                size: ROM_SIZE,
            });
        }
        match &stmt {
            Stmt::Label(name) => match idents.insert_label(name, line.no, pc as u16) {
                None => {}
                Some((Ident::Label(prev), _)) => {
                    return Err(Error::RedefinedLabel {
                        line: line.no,
                        name: name.clone(),
                        prev,
                    })
                }
                Some(_) => {
                    return Err(Error::RedefinedPredefined {
                        line: line.no,
                        name: name.clone(),
                    })
                }
            },
            _ => pc += 1,
        }
        stmts.push((line, stmt));
    }

    // 2. Resolve symbols & encode
    let mut pc: u16 = 0;
    let mut resolved = Vec::with_capacity(stmts.len());
    for (line, stmt) in stmts {
        let inst = stmt.resolve(&mut idents).map(|inst| {
            let addr = pc;
            pc += 1;
            (addr, inst)
        });
        resolved.push((line, stmt, inst));
    }

    Ok(Program {
        lines: resolved,
        idents,
    })
}
