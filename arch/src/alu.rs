use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Computation field of a compute instruction.
/// The discriminant is the 7-bit `a c1 c2 c3 c4 c5 c6` code.
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
#[repr(u8)]
pub enum Comp {
    #[strum(to_string = "0")]
    Zero = 0b0101010,
    #[strum(to_string = "1")]
    One = 0b0111111,
    #[strum(to_string = "-1")]
    NegOne = 0b0111010,
    #[strum(to_string = "D")]
    D = 0b0001100,
    #[strum(to_string = "A")]
    A = 0b0110000,
    #[strum(to_string = "!D")]
    NotD = 0b0001101,
    #[strum(to_string = "!A")]
    NotA = 0b0110001,
    #[strum(to_string = "-D")]
    NegD = 0b0001111,
    #[strum(to_string = "-A")]
    NegA = 0b0110011,
    #[strum(to_string = "D+1")]
    DPlusOne = 0b0011111,
    #[strum(to_string = "A+1")]
    APlusOne = 0b0110111,
    #[strum(to_string = "D-1")]
    DMinusOne = 0b0001110,
    #[strum(to_string = "A-1")]
    AMinusOne = 0b0110010,
    #[strum(to_string = "D+A")]
    DPlusA = 0b0000010,
    #[strum(to_string = "D-A")]
    DMinusA = 0b0010011,
    #[strum(to_string = "A-D")]
    AMinusD = 0b0000111,
    #[strum(to_string = "D&A")]
    DAndA = 0b0000000,
    #[strum(to_string = "D|A")]
    DOrA = 0b0010101,
    #[strum(to_string = "M")]
    M = 0b1110000,
    #[strum(to_string = "!M")]
    NotM = 0b1110001,
    #[strum(to_string = "-M")]
    NegM = 0b1110011,
    #[strum(to_string = "M+1")]
    MPlusOne = 0b1110111,
    #[strum(to_string = "M-1")]
    MMinusOne = 0b1110010,
    #[strum(to_string = "D+M")]
    DPlusM = 0b1000010,
    #[strum(to_string = "D-M")]
    DMinusM = 0b1010011,
    #[strum(to_string = "M-D")]
    MMinusD = 0b1000111,
    #[strum(to_string = "D&M")]
    DAndM = 0b1000000,
    #[strum(to_string = "D|M")]
    DOrM = 0b1010101,
}

impl Comp {
    pub fn code(self) -> u8 {
        self.into()
    }

    /// `a` bit: the second operand is memory instead of the A register.
    pub fn reads_memory(self) -> bool {
        self.code() & 0b1000000 != 0
    }
}

/// ALU model driven by the six control bits of the computation code.
/// `x` is D, `y` is A or M depending on the `a` bit.
pub fn valu(comp: Comp, d: u16, a: u16, m: u16) -> u16 {
    let code = comp.code();
    let bit = |n: u8| code & (1 << n) != 0;

    let mut x = d;
    let mut y = if comp.reads_memory() { m } else { a };
    if bit(5) {
        x = 0;
    }
    if bit(4) {
        x = !x;
    }
    if bit(3) {
        y = 0;
    }
    if bit(2) {
        y = !y;
    }
    let out = if bit(1) { x.wrapping_add(y) } else { x & y };
    if bit(0) {
        !out
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    macro_rules! test_valu {
        ($($name:ident: $comp:expr, ($d:expr, $a:expr, $m:expr) => $out:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(valu($comp, $d, $a, $m), $out);
                }
            )*
        }
    }

    test_valu! {
        valu_zero: Comp::Zero, (7, 3, 5) => 0,
        valu_one: Comp::One, (7, 3, 5) => 1,
        valu_neg_one: Comp::NegOne, (7, 3, 5) => 0xFFFF,
        valu_d: Comp::D, (7, 3, 5) => 7,
        valu_not_a: Comp::NotA, (7, 3, 5) => !3,
        valu_neg_m: Comp::NegM, (7, 3, 5) => 5u16.wrapping_neg(),
        valu_d_plus_one: Comp::DPlusOne, (7, 3, 5) => 8,
        valu_m_minus_one: Comp::MMinusOne, (7, 3, 0) => 0xFFFF,
        valu_d_plus_a: Comp::DPlusA, (7, 3, 5) => 10,
        valu_d_minus_a: Comp::DMinusA, (3, 7, 5) => 3u16.wrapping_sub(7),
        valu_m_minus_d: Comp::MMinusD, (7, 3, 5) => 5u16.wrapping_sub(7),
        valu_d_and_m: Comp::DAndM, (0b1100, 0, 0b1010) => 0b1000,
        valu_d_or_a: Comp::DOrA, (0b1100, 0b1010, 0) => 0b1110,
    }

    #[test]
    fn comp_text_roundtrip() {
        for comp in Comp::iter() {
            assert_eq!(comp.to_string().parse::<Comp>().ok(), Some(comp));
        }
        assert_eq!(Comp::iter().count(), 28);
        assert!("A+D".parse::<Comp>().is_err());
    }

    #[test]
    fn comp_code() {
        assert_eq!(Comp::A.code(), 0b0110000);
        assert_eq!(Comp::try_from(0b1110000u8).ok(), Some(Comp::M));
        assert!(Comp::try_from(0b1111111u8).is_err());
        assert!(Comp::DPlusM.reads_memory());
        assert!(!Comp::DPlusA.reads_memory());
    }
}
