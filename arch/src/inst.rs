use crate::{comp::Comp, dest::Dest, jump::Jump};

use color_print::cformat;
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Decoded instructions

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Inst {
    A(AInst),
    C(CInst),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AInst {
    pub value: u16,
    /// Present when the operand was a symbol rather than a literal.
    pub symbol: Option<SymbolRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRef {
    pub name: String,
    /// True when this occurrence allocated the variable.
    pub initial: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CInst {
    pub dest: Dest,
    pub comp: Comp,
    pub jump: Option<Jump>,
}

// ----------------------------------------------------------------------------
// C-instruction token resolution

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CInstError {
    /// The token does not match `(dest '=')? comp (';' jump)?`.
    Grammar,
    /// The token matches the grammar shape but the computation is not in
    /// the fixed ALU table.
    UnknownComp(String),
}

impl CInst {
    /// Resolves a whole accumulated C-instruction token. The token must
    /// match the grammar end to end; trailing junk is rejected.
    pub fn parse(text: &str) -> Result<Self, CInstError> {
        let (body, jump) = match text.split_once(';') {
            Some((body, jump)) => {
                let jump = jump.parse::<Jump>().map_err(|_| CInstError::Grammar)?;
                (body, Some(jump))
            }
            None => (text, None),
        };
        let (dest, comp_text) = match body.split_once('=') {
            Some((dest, comp)) => {
                let dest = Dest::parse(dest).map_err(|_| CInstError::Grammar)?;
                (dest, comp)
            }
            None => (Dest::None, body),
        };
        if comp_text.is_empty() {
            return Err(CInstError::Grammar);
        }
        match comp_text.parse::<Comp>() {
            Ok(comp) => Ok(CInst { dest, comp, jump }),
            Err(_) if comp_shape_ok(comp_text) => {
                Err(CInstError::UnknownComp(comp_text.to_string()))
            }
            Err(_) => Err(CInstError::Grammar),
        }
    }
}

fn is_operand(c: char) -> bool {
    matches!(c, 'A' | 'D' | 'M' | '0' | '1')
}

/// Shape of a computation expression reachable through the assembly
/// grammar: `operandA (operator operandB)?` with a unary minus only on `1`.
fn comp_shape_ok(s: &str) -> bool {
    let chars: Vec<char> = s.chars().collect();
    let idx = match chars.first() {
        Some('-') => match chars.get(1) {
            Some('1') => 2,
            _ => return false,
        },
        Some(&c) if is_operand(c) => 1,
        _ => return false,
    };
    if chars.len() == idx {
        return true;
    }
    chars.len() == idx + 2 && matches!(chars[idx], '+' | '-') && is_operand(chars[idx + 1])
}

impl std::fmt::Display for CInst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.dest != Dest::None {
            write!(f, "{}=", self.dest)?;
        }
        write!(f, "{}", self.comp)?;
        if let Some(jump) = self.jump {
            write!(f, ";{jump}")?;
        }
        Ok(())
    }
}

impl Inst {
    pub fn cformat(&self) -> String {
        match self {
            Inst::A(a) => match &a.symbol {
                Some(sym) => {
                    cformat!("<red>@</><green>0x{:0>4X}</> <blue>({})</>", a.value, sym.name)
                }
                None => cformat!("<red>@</><yellow>0x{:0>4X}</>", a.value),
            },
            Inst::C(c) => {
                let dest = match c.dest {
                    Dest::None => String::new(),
                    dest => format!("{dest}="),
                };
                let jump = match c.jump {
                    Some(jump) => format!(";{jump}"),
                    None => String::new(),
                };
                cformat!("<blue>{}</><red>{}</><green>{}</>", dest, c.comp, jump)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_c() {
        assert_eq!(
            CInst::parse("D=D+1"),
            Ok(CInst {
                dest: Dest::D,
                comp: Comp::DPlus1,
                jump: None,
            })
        );
        assert_eq!(
            CInst::parse("0;JMP"),
            Ok(CInst {
                dest: Dest::None,
                comp: Comp::Zero,
                jump: Some(Jump::JMP),
            })
        );
        assert_eq!(
            CInst::parse("D;JGT"),
            Ok(CInst {
                dest: Dest::None,
                comp: Comp::D,
                jump: Some(Jump::JGT),
            })
        );
        assert_eq!(
            CInst::parse("AMD=D|M;JEQ"),
            Ok(CInst {
                dest: Dest::AMD,
                comp: Comp::DOrM,
                jump: Some(Jump::JEQ),
            })
        );
        assert_eq!(
            CInst::parse("!D"),
            Ok(CInst {
                dest: Dest::None,
                comp: Comp::NotD,
                jump: None,
            })
        );
    }

    #[test]
    fn parse_c_errors() {
        assert_eq!(
            CInst::parse("D=1+1"),
            Err(CInstError::UnknownComp("1+1".to_string()))
        );
        assert_eq!(
            CInst::parse("D=0-D"),
            Err(CInstError::UnknownComp("0-D".to_string()))
        );
        assert_eq!(CInst::parse("AD=AM+1"), Err(CInstError::Grammar));
        assert_eq!(CInst::parse("DD=1"), Err(CInstError::Grammar));
        assert_eq!(CInst::parse("D="), Err(CInstError::Grammar));
        assert_eq!(CInst::parse("D;JXX"), Err(CInstError::Grammar));
        assert_eq!(CInst::parse(""), Err(CInstError::Grammar));
    }

    #[test]
    fn display() {
        let inst = CInst {
            dest: Dest::D,
            comp: Comp::DPlus1,
            jump: Some(Jump::JGT),
        };
        assert_eq!(inst.to_string(), "D=D+1;JGT");
        let inst = CInst {
            dest: Dest::None,
            comp: Comp::Zero,
            jump: Some(Jump::JMP),
        };
        assert_eq!(inst.to_string(), "0;JMP");
    }
}
