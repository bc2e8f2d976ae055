use arch::{inst::Inst, reg::MAX_ADDR, vm::is_symbol};
use color_print::cformat;

use crate::{error::Error, ident::Idents};

// ----------------------------------------------------------------------------
// Line

/// A comment-free, whitespace-free source line with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub no: usize,
    pub text: String,
}

/// Strip `//` comments and whitespace, drop blank lines.
pub fn clean(source: &str) -> Vec<Line> {
    source
        .lines()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let code = raw.split("//").next().unwrap_or("");
            let text: String = code.chars().filter(|c| !c.is_whitespace()).collect();
            if text.is_empty() {
                None
            } else {
                Some(Line { no: idx + 1, text })
            }
        })
        .collect()
}

// ----------------------------------------------------------------------------
// Statement

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `(NAME)` pseudo-instruction
    Label(String),
    /// `@value` / `@symbol`
    Addr(Imm),
    /// `dest=comp;jump`, already encoded against the tables
    Calc(Inst),
}

impl Stmt {
    pub fn parse(line: &Line) -> Result<Stmt, Error> {
        let text = line.text.as_str();

        // (LOOP)
        if let Some(rest) = text.strip_prefix('(') {
            return match rest.strip_suffix(')') {
                Some(name) if is_symbol(name) => Ok(Stmt::Label(name.to_string())),
                _ => Err(Error::InvalidLabel {
                    line: line.no,
                    text: text.to_string(),
                }),
            };
        }

        // @value
        if let Some(operand) = text.strip_prefix('@') {
            return match Imm::parse(operand) {
                Some(imm) => Ok(Stmt::Addr(imm)),
                None => Err(Error::InvalidAddress {
                    line: line.no,
                    text: text.to_string(),
                }),
            };
        }

        // dest=comp;jump
        Inst::parse_calc(text).map(Stmt::Calc).map_err(|err| {
            let (line, text) = (line.no, text.to_string());
            match err {
                arch::Error::UnknownDest(dest) => Error::InvalidDest { line, text, dest },
                arch::Error::UnknownJump(jump) => Error::InvalidJump { line, text, jump },
                arch::Error::UnknownComp(comp) => Error::InvalidComp { line, text, comp },
                other => Error::InvalidComp {
                    line,
                    text,
                    comp: other.to_string(),
                },
            }
        })
    }

    /// Pass 2: turn the statement into an instruction, binding new variables.
    pub fn resolve(&self, idents: &mut Idents) -> Option<Inst> {
        match self {
            Stmt::Label(_) => None,
            Stmt::Addr(imm) => Some(Inst::A(imm.resolve(idents))),
            Stmt::Calc(inst) => Some(*inst),
        }
    }
}

impl Stmt {
    pub fn cformat(&self) -> String {
        match self {
            Stmt::Label(name) => cformat!("<g>({})</>", name),
            Stmt::Addr(imm) => cformat!("<r>@</>{}", imm.cfmt()),
            Stmt::Calc(inst) => inst.cformat(),
        }
    }
}

// ----------------------------------------------------------------------------
// Immediate

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Imm {
    Literal(u16),
    Ident(String),
}

impl Imm {
    fn parse(s: &str) -> Option<Imm> {
        if s.chars().all(|c| c.is_ascii_digit()) && !s.is_empty() {
            match s.parse::<u16>() {
                Ok(v) if v <= MAX_ADDR => Some(Imm::Literal(v)),
                _ => None,
            }
        } else if is_symbol(s) {
            Some(Imm::Ident(s.to_string()))
        } else {
            None
        }
    }

    pub fn resolve(&self, idents: &mut Idents) -> u16 {
        match self {
            Imm::Literal(v) => *v,
            Imm::Ident(s) => idents.resolve(s),
        }
    }

    fn cfmt(&self) -> String {
        match self {
            Imm::Literal(v) => cformat!("<y>{}</>", v),
            Imm::Ident(s) => cformat!("<c>{}</>", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch::{alu::Comp, inst::Dest, inst::Jump};

    fn line(text: &str) -> Line {
        Line {
            no: 1,
            text: text.to_string(),
        }
    }

    #[test]
    fn clean_lines() {
        let lines = clean("// header\n\n  @2 // two\nD = A\n   \n(END)\n");
        assert_eq!(
            lines,
            vec![
                Line { no: 3, text: "@2".to_string() },
                Line { no: 4, text: "D=A".to_string() },
                Line { no: 6, text: "(END)".to_string() },
            ]
        );
    }

    #[test]
    fn parse_statements() {
        assert_eq!(Stmt::parse(&line("(LOOP)")).unwrap(), Stmt::Label("LOOP".to_string()));
        assert_eq!(Stmt::parse(&line("@21")).unwrap(), Stmt::Addr(Imm::Literal(21)));
        assert_eq!(
            Stmt::parse(&line("@Main.0")).unwrap(),
            Stmt::Addr(Imm::Ident("Main.0".to_string()))
        );
        assert_eq!(
            Stmt::parse(&line("D;JGT")).unwrap(),
            Stmt::Calc(Inst::C(Dest::Null, Comp::D, Jump::JGT))
        );
    }

    #[test]
    fn reject_statements() {
        assert!(matches!(Stmt::parse(&line("@32768")), Err(Error::InvalidAddress { .. })));
        assert!(matches!(Stmt::parse(&line("@1x")), Err(Error::InvalidAddress { .. })));
        assert!(matches!(Stmt::parse(&line("@")), Err(Error::InvalidAddress { .. })));
        assert!(matches!(Stmt::parse(&line("(LOOP")), Err(Error::InvalidLabel { .. })));
        assert!(matches!(Stmt::parse(&line("(1A)")), Err(Error::InvalidLabel { .. })));
        assert!(matches!(Stmt::parse(&line("D=D*A")), Err(Error::InvalidComp { .. })));
        assert!(matches!(Stmt::parse(&line("Q=A")), Err(Error::InvalidDest { .. })));
        assert!(matches!(Stmt::parse(&line("0;JUMP")), Err(Error::InvalidJump { .. })));
    }
}
