//! Stack-machine command set shared by the compiler (producer)
//! and the translator (consumer).
//!
//! One command per line:
//! `push SEG IDX`, `pop SEG IDX`, `add` .. `not`, `label X`, `goto X`,
//! `if-goto X`, `function F N`, `call F N`, `return`.

use crate::{
    error::Error,
    reg::{MAX_ADDR, STATIC_SIZE, TEMP_SIZE},
};

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, EnumIter, Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Segment {
    Constant,
    Local,
    Argument,
    This,
    That,
    Temp,
    Pointer,
    Static,
}

impl Segment {
    /// Largest index this segment accepts.
    pub fn max_index(self) -> u16 {
        match self {
            Segment::Temp => TEMP_SIZE - 1,
            Segment::Pointer => 1,
            Segment::Static => STATIC_SIZE - 1,
            _ => MAX_ADDR,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, EnumIter, Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Arith {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl Arith {
    /// Number of operands popped from the stack.
    pub fn arity(self) -> usize {
        match self {
            Arith::Neg | Arith::Not => 1,
            _ => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Push(Segment, u16),
    Pop(Segment, u16),
    Arith(Arith),
    Label(String),
    Goto(String),
    IfGoto(String),
    Function(String, u16),
    Call(String, u16),
    Return,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Push(seg, idx) => write!(f, "push {seg} {idx}"),
            Command::Pop(seg, idx) => write!(f, "pop {seg} {idx}"),
            Command::Arith(op) => write!(f, "{op}"),
            Command::Label(name) => write!(f, "label {name}"),
            Command::Goto(name) => write!(f, "goto {name}"),
            Command::IfGoto(name) => write!(f, "if-goto {name}"),
            Command::Function(name, n) => write!(f, "function {name} {n}"),
            Command::Call(name, n) => write!(f, "call {name} {n}"),
            Command::Return => write!(f, "return"),
        }
    }
}

impl Command {
    /// Parse one comment-free, non-blank line.
    pub fn parse(line: &str) -> Result<Command, Error> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let (op, args) = words
            .split_first()
            .ok_or_else(|| Error::UnknownCommand(line.to_string()))?;

        macro_rules! arg {
            ($index:expr) => {
                *args.get($index).ok_or(Error::MissingArgument)?
            };
        }
        macro_rules! argc {
            ($n:expr) => {
                if args.len() > $n {
                    return Err(Error::ExtraArgument);
                }
            };
        }

        let cmd = match *op {
            "push" | "pop" => {
                argc!(2);
                let seg = arg!(0);
                let seg = seg
                    .parse::<Segment>()
                    .map_err(|_| Error::UnknownSegment(seg.to_string()))?;
                let idx = parse_u16(arg!(1), "index")?;
                if idx > seg.max_index() {
                    return Err(Error::IndexOutOfRange(seg.to_string(), idx, seg.max_index()));
                }
                if *op == "push" {
                    Command::Push(seg, idx)
                } else if seg == Segment::Constant {
                    return Err(Error::PopConstant);
                } else {
                    Command::Pop(seg, idx)
                }
            }
            "label" | "goto" | "if-goto" => {
                argc!(1);
                let name = symbol(arg!(0))?;
                match *op {
                    "label" => Command::Label(name),
                    "goto" => Command::Goto(name),
                    _ => Command::IfGoto(name),
                }
            }
            "function" | "call" => {
                argc!(2);
                let name = symbol(arg!(0))?;
                let n = parse_u16(arg!(1), "count")?;
                if n > MAX_ADDR {
                    return Err(Error::ParseArgument(n.to_string(), "count".to_string()));
                }
                if *op == "function" {
                    Command::Function(name, n)
                } else {
                    Command::Call(name, n)
                }
            }
            "return" => {
                argc!(0);
                Command::Return
            }
            _ => match op.parse::<Arith>() {
                Ok(arith) => {
                    argc!(0);
                    Command::Arith(arith)
                }
                Err(_) => return Err(Error::UnknownCommand(op.to_string())),
            },
        };
        Ok(cmd)
    }
}

fn parse_u16(s: &str, what: &str) -> Result<u16, Error> {
    s.parse::<u16>()
        .map_err(|_| Error::ParseArgument(s.to_string(), what.to_string()))
}

/// Label and function names: letters, digits, `_ . $ :`, not starting with a digit.
pub fn is_symbol(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || matches!(c, '_' | '.' | '$' | ':') => chars
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':')),
        _ => false,
    }
}

fn symbol(s: &str) -> Result<String, Error> {
    if is_symbol(s) {
        Ok(s.to_string())
    } else {
        Err(Error::InvalidSymbol(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_parse {
        ($($name:ident: $line:expr => $cmd:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let cmd = Command::parse($line).unwrap();
                    assert_eq!(cmd, $cmd);
                    assert_eq!(cmd.to_string(), $line);
                }
            )*
        }
    }

    test_parse! {
        parse_push_constant: "push constant 7" => Command::Push(Segment::Constant, 7),
        parse_pop_that: "pop that 3" => Command::Pop(Segment::That, 3),
        parse_add: "add" => Command::Arith(Arith::Add),
        parse_not: "not" => Command::Arith(Arith::Not),
        parse_label: "label WHILE_EXP0" => Command::Label("WHILE_EXP0".to_string()),
        parse_if_goto: "if-goto IF_TRUE1" => Command::IfGoto("IF_TRUE1".to_string()),
        parse_function: "function Main.main 2" => Command::Function("Main.main".to_string(), 2),
        parse_call: "call Math.multiply 2" => Command::Call("Math.multiply".to_string(), 2),
        parse_return: "return" => Command::Return,
    }

    #[test]
    fn tolerate_extra_spaces() {
        assert_eq!(
            Command::parse("  push   local\t1 ").unwrap(),
            Command::Push(Segment::Local, 1)
        );
    }

    macro_rules! test_reject {
        ($($name:ident: $line:expr => $err:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(Command::parse($line), Err($err));
                }
            )*
        }
    }

    test_reject! {
        reject_pop_constant: "pop constant 0" => Error::PopConstant,
        reject_unknown_segment: "push heap 0" => Error::UnknownSegment("heap".to_string()),
        reject_temp_range: "pop temp 8" => Error::IndexOutOfRange("temp".to_string(), 8, 7),
        reject_pointer_range: "push pointer 2" => Error::IndexOutOfRange("pointer".to_string(), 2, 1),
        reject_constant_range: "push constant 32768" => Error::IndexOutOfRange("constant".to_string(), 32768, 32767),
        reject_negative: "push local -1" => Error::ParseArgument("-1".to_string(), "index".to_string()),
        reject_missing_index: "push local" => Error::MissingArgument,
        reject_extra: "add 1" => Error::ExtraArgument,
        reject_unknown: "mul" => Error::UnknownCommand("mul".to_string()),
        reject_bad_label: "goto 1abc" => Error::InvalidSymbol("1abc".to_string()),
    }

    #[test]
    fn arity() {
        assert_eq!(Arith::Neg.arity(), 1);
        assert_eq!(Arith::Eq.arity(), 2);
    }
}
