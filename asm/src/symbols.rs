use indexmap::IndexMap;
use once_cell::sync::Lazy;
use tracing::debug;

/// First address handed out to user variables.
pub const VARIABLE_BASE: u16 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub address: u16,
    pub built_in: bool,
}

const BUILT_INS: &[(&str, u16)] = &[
    ("R0", 0),
    ("R1", 1),
    ("R2", 2),
    ("R3", 3),
    ("R4", 4),
    ("R5", 5),
    ("R6", 6),
    ("R7", 7),
    ("R8", 8),
    ("R9", 9),
    ("R10", 10),
    ("R11", 11),
    ("R12", 12),
    ("R13", 13),
    ("R14", 14),
    ("R15", 15),
    ("SCREEN", 16384),
    ("KBD", 24576),
    ("SP", 0),
    ("LCL", 1),
    ("ARG", 2),
    ("THIS", 3),
    ("THAT", 4),
];

static SEED: Lazy<IndexMap<String, Symbol>> = Lazy::new(|| {
    BUILT_INS
        .iter()
        .map(|&(name, address)| {
            (
                name.to_string(),
                Symbol {
                    address,
                    built_in: true,
                },
            )
        })
        .collect()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    Duplicate,
    BuiltIn,
}

/// Flat symbol namespace seeded with the built-in registers and memory
/// map. Built-ins are never reassigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbols {
    map: IndexMap<String, Symbol>,
    next_address: u16,
}

impl Symbols {
    pub fn new() -> Self {
        Self {
            map: SEED.clone(),
            next_address: VARIABLE_BASE,
        }
    }

    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.map.get(name).copied()
    }

    /// Binds a label to an instruction address. Fails when the name is
    /// already taken, distinguishing built-in collisions.
    pub fn bind_label(&mut self, name: &str, address: u16) -> Result<(), BindError> {
        match self.map.get(name) {
            Some(sym) if sym.built_in => Err(BindError::BuiltIn),
            Some(_) => Err(BindError::Duplicate),
            None => {
                debug!(label = name, address, "label bound");
                self.map.insert(
                    name.to_string(),
                    Symbol {
                        address,
                        built_in: false,
                    },
                );
                Ok(())
            }
        }
    }

    /// Allocates the next variable address. Only ever called for names
    /// absent from the table.
    pub fn allocate_variable(&mut self, name: &str) -> u16 {
        let address = self.next_address;
        self.next_address += 1;
        debug!(variable = name, address, "variable allocated");
        self.map.insert(
            name.to_string(),
            Symbol {
                address,
                built_in: false,
            },
        );
        address
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Symbol)> {
        self.map.iter()
    }
}

impl Default for Symbols {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_built_ins() {
        let symbols = Symbols::new();
        assert_eq!(symbols.len(), 23);
        assert_eq!(
            symbols.get("R0"),
            Some(Symbol {
                address: 0,
                built_in: true,
            })
        );
        assert_eq!(
            symbols.get("SCREEN"),
            Some(Symbol {
                address: 16384,
                built_in: true,
            })
        );
        assert_eq!(
            symbols.get("KBD"),
            Some(Symbol {
                address: 24576,
                built_in: true,
            })
        );
        assert_eq!(symbols.get("SP").map(|s| s.address), Some(0));
        assert_eq!(symbols.get("THAT").map(|s| s.address), Some(4));
        assert_eq!(symbols.get("LOOP"), None);
    }

    #[test]
    fn allocation_and_binding() {
        let mut symbols = Symbols::new();
        assert_eq!(symbols.allocate_variable("i"), 16);
        assert_eq!(symbols.allocate_variable("j"), 17);
        assert_eq!(symbols.bind_label("LOOP", 3), Ok(()));
        assert_eq!(symbols.bind_label("LOOP", 4), Err(BindError::Duplicate));
        assert_eq!(symbols.bind_label("SP", 0), Err(BindError::BuiltIn));
        assert_eq!(symbols.bind_label("i", 5), Err(BindError::Duplicate));
    }
}
