use indexmap::IndexMap;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Frame registers. They live in the lowest RAM cells.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[repr(u16)]
pub enum Reg {
    SP = 0,
    LCL = 1,
    ARG = 2,
    THIS = 3,
    THAT = 4,
}

impl Reg {
    pub fn addr(self) -> u16 {
        self.into()
    }
}

// ----------------------------------------------------------------------------
// Memory map

/// `temp` segment: R5..R12
pub const TEMP_BASE: u16 = 5;
pub const TEMP_SIZE: u16 = 8;

/// Scratch registers used by the translator.
pub const R13: u16 = 13;
pub const R14: u16 = 14;

/// First cell handed out to assembler variables (and VM statics).
pub const VAR_BASE: u16 = 16;
pub const STATIC_SIZE: u16 = 240;

/// The stack starts right above the static area.
pub const STACK_BASE: u16 = 256;

pub const SCREEN: u16 = 0x4000;
pub const KBD: u16 = 0x6000;

/// Largest value an address instruction can carry (15 bits).
pub const MAX_ADDR: u16 = 0x7FFF;

pub const RAM_SIZE: usize = 0x8000;
pub const ROM_SIZE: usize = 0x8000;

/// Symbols every assembly unit starts with.
pub static PREDEFINED: Lazy<IndexMap<String, u16>> = Lazy::new(|| {
    let mut map = IndexMap::new();
    for reg in Reg::iter() {
        map.insert(reg.to_string(), reg.addr());
    }
    for i in 0..16 {
        map.insert(format!("R{i}"), i);
    }
    map.insert("SCREEN".to_string(), SCREEN);
    map.insert("KBD".to_string(), KBD);
    map
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_symbols() {
        assert_eq!(PREDEFINED.len(), 23);
        assert_eq!(PREDEFINED.get("SP"), Some(&0));
        assert_eq!(PREDEFINED.get("THAT"), Some(&4));
        assert_eq!(PREDEFINED.get("R15"), Some(&15));
        assert_eq!(PREDEFINED.get("SCREEN"), Some(&16384));
        assert_eq!(PREDEFINED.get("KBD"), Some(&24576));
    }

    #[test]
    fn reg_names_and_addresses() {
        assert_eq!("LCL".parse::<Reg>(), Ok(Reg::LCL));
        assert_eq!(Reg::THAT.to_string(), "THAT");
        assert_eq!(Reg::ARG.addr(), 2);
    }
}
