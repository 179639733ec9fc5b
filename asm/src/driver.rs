use tracing::debug;

use crate::classify::{classify, CharClass};
use crate::cursor::Cursor;
use crate::error::{AsmError, ErrorKind};
use crate::machine::transition;
use crate::state::{AssemblerResult, AssemblerState};

/// Assembles Hack source text into decoded instructions and a resolved
/// symbol table. Any error aborts the whole run; there is no partial
/// result.
pub fn assemble(source: &str) -> Result<AssemblerResult, AsmError> {
    let mut cursor = Cursor::new(source);
    let mut state = AssemblerState::new();

    // a transition bug must not hang the loop; a well-formed run takes
    // exactly this many steps
    let limit = cursor.step_limit();
    let mut steps = 0usize;

    loop {
        steps += 1;
        if steps > limit {
            let (line, column) = cursor.pos();
            return Err(AsmError::new(
                ErrorKind::IterationLimit(limit),
                line,
                column,
                cursor.source_line(line),
            ));
        }
        match cursor.current() {
            Some(ch) => {
                transition(&mut state, &cursor, classify(ch), ch)?;
                cursor.advance();
            }
            None => {
                // route end-of-input through the finalization handlers so
                // a trailing instruction without a newline still closes
                transition(&mut state, &cursor, CharClass::EndOfInput, '\0')?;
                break;
            }
        }
    }

    debug!(
        instructions = state.result.instructions.len(),
        symbols = state.result.symbols.len(),
        "assembly finished"
    );
    Ok(state.result)
}
