use num_enum::IntoPrimitive;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Jump field of a C-instruction. The discriminant is the `j1 j2 j3`
/// bit field.
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
pub enum Jump {
    JGT = 1,
    JEQ = 2,
    JGE = 3,
    JLT = 4,
    JNE = 5,
    JLE = 6,
    JMP = 7,
}

impl Jump {
    pub fn parse(s: &str) -> Result<Self, String> {
        s.parse::<Self>().map_err(|_| format!("Unknown jump: {s}"))
    }

    pub fn bits(self) -> u16 {
        u8::from(self) as u16
    }
}

#[test]
fn test() {
    assert_eq!("JGT".parse::<Jump>(), Ok(Jump::JGT));
    assert_eq!(Jump::JMP.bits(), 7);
    assert_eq!(Jump::JLE.to_string(), "JLE");
    assert!("JXX".parse::<Jump>().is_err());
}
