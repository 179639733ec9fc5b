//! Single-pass assembler for the Hack architecture: a character-level
//! state machine producing decoded instructions and a resolved symbol
//! table. Binary word emission is out of scope.

pub mod classify;
pub mod cursor;
pub mod driver;
pub mod error;
pub mod machine;
pub mod state;
pub mod symbols;
pub mod util;

pub use driver::assemble;
