use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};

/// Destination field of a C-instruction. The discriminant is the
/// `d1 d2 d3` bit field (A, D, M in order).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromPrimitive,
    IntoPrimitive,
)]
#[repr(u8)]
pub enum Dest {
    #[default]
    None = 0,
    M = 1,
    D = 2,
    MD = 3,
    A = 4,
    AM = 5,
    AD = 6,
    AMD = 7,
}

impl Dest {
    /// Parses a set of destination letters. Letters may come in any order
    /// but must be distinct.
    pub fn parse(s: &str) -> Result<Self, String> {
        if s.is_empty() {
            return Err("Empty destination".to_string());
        }
        let mut bits = 0u8;
        for c in s.chars() {
            let bit = match c {
                'A' => 4,
                'D' => 2,
                'M' => 1,
                _ => return Err(format!("Invalid destination letter: {c}")),
            };
            if bits & bit != 0 {
                return Err(format!("Duplicate destination letter: {c}"));
            }
            bits |= bit;
        }
        Ok(Self::from(bits))
    }

    pub fn bits(self) -> u16 {
        u8::from(self) as u16
    }

    pub fn letters(self) -> &'static str {
        match self {
            Dest::None => "",
            Dest::M => "M",
            Dest::D => "D",
            Dest::MD => "MD",
            Dest::A => "A",
            Dest::AM => "AM",
            Dest::AD => "AD",
            Dest::AMD => "AMD",
        }
    }
}

impl std::fmt::Display for Dest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.letters())
    }
}

#[test]
fn test() {
    assert_eq!(Dest::parse("MD"), Ok(Dest::MD));
    assert_eq!(Dest::parse("DM"), Ok(Dest::MD));
    assert_eq!(Dest::parse("AMD"), Ok(Dest::AMD));
    assert!(Dest::parse("DD").is_err());
    assert!(Dest::parse("").is_err());
    assert!(Dest::parse("X").is_err());
    assert_eq!(Dest::AD.bits(), 6);
    assert_eq!(Dest::M.to_string(), "M");
}
