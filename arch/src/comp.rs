use num_enum::IntoPrimitive;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Computation field of a C-instruction.
///
/// The discriminant is the canonical 7-bit `a c1..c6` field of the Hack
/// ALU computation table.
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
    EnumString,
    Display,
)]
#[repr(u8)]
pub enum Comp {
    #[strum(serialize = "0")]
    Zero = 0b0101010,
    #[strum(serialize = "1")]
    One = 0b0111111,
    #[strum(serialize = "-1")]
    NegOne = 0b0111010,
    D = 0b0001100,
    A = 0b0110000,
    M = 0b1110000,
    #[strum(serialize = "!D")]
    NotD = 0b0001101,
    #[strum(serialize = "!A")]
    NotA = 0b0110001,
    #[strum(serialize = "!M")]
    NotM = 0b1110001,
    #[strum(serialize = "-D")]
    NegD = 0b0001111,
    #[strum(serialize = "-A")]
    NegA = 0b0110011,
    #[strum(serialize = "-M")]
    NegM = 0b1110011,
    #[strum(serialize = "D+1")]
    DPlus1 = 0b0011111,
    #[strum(serialize = "A+1")]
    APlus1 = 0b0110111,
    #[strum(serialize = "M+1")]
    MPlus1 = 0b1110111,
    #[strum(serialize = "D-1")]
    DMinus1 = 0b0001110,
    #[strum(serialize = "A-1")]
    AMinus1 = 0b0110010,
    #[strum(serialize = "M-1")]
    MMinus1 = 0b1110010,
    #[strum(serialize = "D+A")]
    DPlusA = 0b0000010,
    #[strum(serialize = "D+M")]
    DPlusM = 0b1000010,
    #[strum(serialize = "D-A")]
    DMinusA = 0b0010011,
    #[strum(serialize = "D-M")]
    DMinusM = 0b1010011,
    #[strum(serialize = "A-D")]
    AMinusD = 0b0000111,
    #[strum(serialize = "M-D")]
    MMinusD = 0b1000111,
    #[strum(serialize = "D&A")]
    DAndA = 0b0000000,
    #[strum(serialize = "D&M")]
    DAndM = 0b1000000,
    #[strum(serialize = "D|A")]
    DOrA = 0b0010101,
    #[strum(serialize = "D|M")]
    DOrM = 0b1010101,
}

impl Comp {
    pub fn parse(s: &str) -> Result<Self, String> {
        s.parse::<Self>()
            .map_err(|_| format!("Unknown computation: {s}"))
    }

    /// The `a` bit selecting between the A register and memory input.
    pub fn a_bit(self) -> u16 {
        (u8::from(self) >> 6) as u16
    }

    /// The `c1..c6` ALU control bits.
    pub fn c_bits(self) -> u16 {
        (u8::from(self) & 0x3F) as u16
    }
}

#[test]
fn test() {
    assert_eq!("D+1".parse::<Comp>(), Ok(Comp::DPlus1));
    assert_eq!("0".parse::<Comp>(), Ok(Comp::Zero));
    assert_eq!("-1".parse::<Comp>(), Ok(Comp::NegOne));
    assert_eq!(Comp::DPlus1.to_string(), "D+1");
    assert_eq!(u8::from(Comp::Zero), 0b0101010);
    assert_eq!(u8::from(Comp::MPlus1), 0b1110111);
    assert_eq!(Comp::DAndM.a_bit(), 1);
    assert_eq!(Comp::DAndA.c_bits(), 0);
    assert!("D+2".parse::<Comp>().is_err());
    assert!("A+D".parse::<Comp>().is_err());
}
