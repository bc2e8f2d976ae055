use crate::{alu::Comp, error::Error, reg::MAX_ADDR};

use color_print::cformat;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};

/// Destination field: any combination of A, D and M.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[repr(u8)]
pub enum Dest {
    #[default]
    #[strum(to_string = "")]
    Null = 0b000,
    M = 0b001,
    D = 0b010,
    MD = 0b011,
    A = 0b100,
    AM = 0b101,
    AD = 0b110,
    AMD = 0b111,
}

impl Dest {
    pub fn a(self) -> bool {
        u8::from(self) & 0b100 != 0
    }
    pub fn d(self) -> bool {
        u8::from(self) & 0b010 != 0
    }
    pub fn m(self) -> bool {
        u8::from(self) & 0b001 != 0
    }
}

/// Jump field: branch when the ALU output satisfies the condition.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[repr(u8)]
pub enum Jump {
    #[default]
    #[strum(to_string = "")]
    Null = 0b000,
    JGT = 0b001,
    JEQ = 0b010,
    JGE = 0b011,
    JLT = 0b100,
    JNE = 0b101,
    JLE = 0b110,
    JMP = 0b111,
}

impl Jump {
    /// Evaluate the condition against a signed ALU output.
    pub fn taken(self, out: u16) -> bool {
        let out = out as i16;
        let bits = u8::from(self);
        (bits & 0b100 != 0 && out < 0)
            || (bits & 0b010 != 0 && out == 0)
            || (bits & 0b001 != 0 && out > 0)
    }
}

// ----------------------------------------------------------------------------
// Instruction

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inst {
    /// `@value`
    A(u16),
    /// `dest=comp;jump`
    C(Dest, Comp, Jump),
}

impl Inst {
    /// Parse the `[DEST=]COMP[;JUMP]` form.
    pub fn parse_calc(s: &str) -> Result<Inst, Error> {
        let (dest, rest) = match s.split_once('=') {
            Some((dest, rest)) => (Some(dest), rest),
            None => (None, s),
        };
        let (comp, jump) = match rest.split_once(';') {
            Some((comp, jump)) => (comp, Some(jump)),
            None => (rest, None),
        };

        let dest = match dest {
            Some(d) if !d.is_empty() => d
                .parse::<Dest>()
                .map_err(|_| Error::UnknownDest(d.to_string()))?,
            Some(d) => return Err(Error::UnknownDest(d.to_string())),
            None => Dest::Null,
        };
        let comp = comp
            .parse::<Comp>()
            .map_err(|_| Error::UnknownComp(comp.to_string()))?;
        let jump = match jump {
            Some(j) if !j.is_empty() => j
                .parse::<Jump>()
                .map_err(|_| Error::UnknownJump(j.to_string()))?,
            Some(j) => return Err(Error::UnknownJump(j.to_string())),
            None => Jump::Null,
        };
        Ok(Inst::C(dest, comp, jump))
    }

    pub fn to_bin(&self) -> u16 {
        match self {
            Inst::A(value) => {
                debug_assert!(*value <= MAX_ADDR, "address out of range: {value}");
                *value
            }
            Inst::C(dest, comp, jump) => {
                0b111 << 13
                    | (u16::from(comp.code()) << 6)
                    | (u16::from(u8::from(*dest)) << 3)
                    | u16::from(u8::from(*jump))
            }
        }
    }

    pub fn from_bin(bin: u16) -> Result<Inst, Error> {
        if bin & 0x8000 == 0 {
            return Ok(Inst::A(bin));
        }
        let comp = Comp::try_from(((bin >> 6) & 0x7F) as u8).map_err(|_| Error::UndefinedWord(bin))?;
        let dest = Dest::try_from(((bin >> 3) & 0b111) as u8).map_err(|_| Error::UndefinedWord(bin))?;
        let jump = Jump::try_from((bin & 0b111) as u8).map_err(|_| Error::UndefinedWord(bin))?;
        Ok(Inst::C(dest, comp, jump))
    }

    /// 16-character `0`/`1` text form.
    pub fn to_bin_str(&self) -> String {
        format!("{:016b}", self.to_bin())
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inst::A(value) => write!(f, "@{value}"),
            Inst::C(dest, comp, jump) => {
                if *dest != Dest::Null {
                    write!(f, "{dest}=")?;
                }
                write!(f, "{comp}")?;
                if *jump != Jump::Null {
                    write!(f, ";{jump}")?;
                }
                Ok(())
            }
        }
    }
}

impl Inst {
    pub fn cformat(&self) -> String {
        match self {
            Inst::A(value) => cformat!("<r>@</><y>{}</>", value),
            Inst::C(dest, comp, jump) => cformat!(
                "<b>{:>3}</>{}<r>{:<3}</>{}<g>{}</>",
                dest.to_string(),
                if *dest == Dest::Null { " " } else { "=" },
                comp.to_string(),
                if *jump == Jump::Null { " " } else { ";" },
                jump.to_string()
            ),
        }
    }
}
