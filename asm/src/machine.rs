use arch::inst::{AInst, CInst, CInstError, Inst, SymbolRef};
use tracing::{debug, trace};

use crate::classify::CharClass;
use crate::cursor::Cursor;
use crate::error::{AsmError, ErrorKind};
use crate::state::{AssemblerState, CurrentInstruction, InstructionKind};
use crate::symbols::BindError;

const JUMPS: [&str; 7] = ["JGT", "JGE", "JLT", "JLE", "JNE", "JEQ", "JMP"];

fn err_at(kind: ErrorKind, cursor: &Cursor) -> AsmError {
    let (line, column) = cursor.pos();
    AsmError::new(kind, line, column, cursor.source_line(line))
}

fn illegal(cursor: &Cursor, ch: char) -> AsmError {
    err_at(ErrorKind::UnexpectedChar(ch), cursor)
}

/// Applies one transition of the instruction-kind state machine. May
/// mutate the instruction buffer, emit a completed instruction or label,
/// flip the current kind, or fail with a positioned error.
pub fn transition(
    state: &mut AssemblerState,
    cursor: &Cursor,
    class: CharClass,
    ch: char,
) -> Result<(), AsmError> {
    use CharClass::*;
    use InstructionKind::*;

    trace!(kind = ?state.current.kind, ?class, ?ch, pos = ?cursor.pos(), "transition");

    match (state.current.kind, class) {
        // --------------------------------------------------------------
        // null: between instructions
        (Null, Space | NewLine | EndOfInput) => Ok(()),
        (Null, At) => {
            start(state, cursor, A);
            Ok(())
        }
        (Null, Paren) if ch == '(' => {
            start(state, cursor, Label);
            Ok(())
        }
        (Null, Digit) if matches!(ch, '0' | '1') => {
            start(state, cursor, C);
            state.current.text.push(ch);
            Ok(())
        }
        (Null, Alpha) if matches!(ch, 'A' | 'M' | 'D') => {
            start(state, cursor, C);
            state.current.text.push(ch);
            Ok(())
        }
        (Null, Slash) => detect_comment(state, cursor, ch),
        (Null, Star) if cursor.peek_prev() == Some('/') => {
            open_multiline(state, cursor);
            Ok(())
        }
        (Null, _) => Err(illegal(cursor, ch)),

        // --------------------------------------------------------------
        // nullAwaitingNewLine: a pseudo-instruction closed on this line
        (NullAwaitingNewLine, Space | EndOfInput) => Ok(()),
        (NullAwaitingNewLine, NewLine) => {
            state.current = CurrentInstruction::null();
            state.previous = Null;
            Ok(())
        }
        (NullAwaitingNewLine, Slash) => detect_comment(state, cursor, ch),
        (NullAwaitingNewLine, Star) if cursor.peek_prev() == Some('/') => {
            open_multiline(state, cursor);
            Ok(())
        }
        (NullAwaitingNewLine, _) => Err(err_at(ErrorKind::MissingNewLine(ch), cursor)),

        // --------------------------------------------------------------
        // comment: absorbs until the line break
        (Comment, NewLine | EndOfInput) => {
            // the closing newline is also the newline a pending
            // pseudo-instruction was waiting for
            state.current = CurrentInstruction::null();
            state.previous = Null;
            Ok(())
        }
        (Comment, _) => {
            state.current.text.push(ch);
            Ok(())
        }

        // --------------------------------------------------------------
        // multilineComment: absorbs until `*/`
        (MultilineComment, Slash) if cursor.peek_prev() == Some('*') => {
            let pending = state.previous == NullAwaitingNewLine
                && !state.current.text.contains('\n');
            state.current = CurrentInstruction::null();
            if pending {
                state.current.kind = NullAwaitingNewLine;
            }
            state.previous = Null;
            Ok(())
        }
        (MultilineComment, EndOfInput) => {
            let (line, column) = state.current.start;
            Err(AsmError::new(
                ErrorKind::UnterminatedComment,
                line,
                column,
                cursor.source_line(line),
            ))
        }
        (MultilineComment, _) => {
            state.current.text.push(ch);
            Ok(())
        }

        // --------------------------------------------------------------
        // label: accumulating between `(` and `)`
        (Label, Space) => Ok(()),
        (Label, Alpha) => {
            state.current.text.push(ch);
            Ok(())
        }
        (Label, Digit) => {
            if state.current.text.is_empty() {
                Err(err_at(ErrorKind::LabelStartsWithDigit, cursor))
            } else {
                state.current.text.push(ch);
                Ok(())
            }
        }
        (Label, Paren) if ch == ')' => close_label(state, cursor),
        (Label, Paren) => Err(err_at(ErrorKind::MissingCloseParen(ch), cursor)),
        (Label, NewLine | Slash) => Err(err_at(ErrorKind::UnterminatedLabel, cursor)),
        (Label, EndOfInput) => {
            let (line, column) = state.current.start;
            Err(AsmError::new(
                ErrorKind::UnterminatedLabel,
                line,
                column,
                cursor.source_line(line),
            ))
        }
        (Label, _) => Err(illegal(cursor, ch)),

        // --------------------------------------------------------------
        // A: accumulating the operand after `@`
        (A, Alpha) => {
            let text = &state.current.text;
            if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
                Err(err_at(ErrorKind::SymbolStartsWithDigit, cursor))
            } else {
                state.current.text.push(ch);
                Ok(())
            }
        }
        (A, Digit) => {
            state.current.text.push(ch);
            Ok(())
        }
        (A, Space) => {
            if state.current.text.is_empty() {
                Ok(())
            } else {
                finalize_a(state, cursor)
            }
        }
        (A, NewLine | EndOfInput) => {
            if state.current.text.is_empty() {
                Err(err_at(ErrorKind::EmptyAInstruction, cursor))
            } else {
                finalize_a(state, cursor)
            }
        }
        (A, Slash) if matches!(cursor.peek_next(), Some('/') | Some('*')) => {
            if state.current.text.is_empty() {
                return Err(err_at(ErrorKind::EmptyAInstruction, cursor));
            }
            finalize_a(state, cursor)?;
            detect_comment(state, cursor, ch)
        }
        (A, _) => Err(illegal(cursor, ch)),

        // --------------------------------------------------------------
        // C: accumulating a dest/comp/jump token
        (C, Space) => Ok(()),
        (C, NewLine | EndOfInput) => finalize_c(state, cursor, false),
        (C, Slash) if matches!(cursor.peek_next(), Some('/') | Some('*')) => {
            // the rest of the line may only hold this comment
            finalize_c(state, cursor, true)?;
            detect_comment(state, cursor, ch)
        }
        (C, Equal) => {
            let text = &state.current.text;
            if !text.is_empty()
                && !text.contains('=')
                && text.chars().all(|c| matches!(c, 'A' | 'D' | 'M'))
            {
                state.current.text.push(ch);
                Ok(())
            } else {
                Err(illegal(cursor, ch))
            }
        }
        (C, Operator) => c_operator(state, cursor, ch),
        (C, Digit) => {
            if matches!(ch, '0' | '1') && state.current.text.ends_with(['=', '+', '-']) {
                state.current.text.push(ch);
                Ok(())
            } else {
                Err(illegal(cursor, ch))
            }
        }
        (C, Alpha) => c_alpha(state, cursor, ch),
        (C, Semicolon) => {
            let text = &state.current.text;
            if !text.contains(';')
                && text.ends_with(|c: char| matches!(c, 'A' | 'D' | 'M' | '0' | '1'))
            {
                state.current.text.push(ch);
                Ok(())
            } else {
                Err(illegal(cursor, ch))
            }
        }
        (C, _) => Err(illegal(cursor, ch)),
    }
}

fn start(state: &mut AssemblerState, cursor: &Cursor, kind: InstructionKind) {
    state.current = CurrentInstruction {
        kind,
        text: String::new(),
        start: cursor.pos(),
    };
}

/// Handles a `/` outside comments: a neighboring `/` opens a single-line
/// comment, a following `*` defers to the star transition, anything else
/// is illegal in the current state.
fn detect_comment(state: &mut AssemblerState, cursor: &Cursor, ch: char) -> Result<(), AsmError> {
    if cursor.peek_next() == Some('/') || cursor.peek_prev() == Some('/') {
        state.previous = state.current.kind;
        start(state, cursor, InstructionKind::Comment);
        Ok(())
    } else if cursor.peek_next() == Some('*') {
        Ok(())
    } else if state.current.kind == InstructionKind::NullAwaitingNewLine {
        Err(err_at(ErrorKind::MissingNewLine(ch), cursor))
    } else {
        Err(illegal(cursor, ch))
    }
}

fn open_multiline(state: &mut AssemblerState, cursor: &Cursor) {
    state.previous = state.current.kind;
    let (line, column) = cursor.pos();
    state.current = CurrentInstruction {
        kind: InstructionKind::MultilineComment,
        text: String::new(),
        // the comment opened at the `/` one column back
        start: (line, column.saturating_sub(1)),
    };
}

fn close_label(state: &mut AssemblerState, cursor: &Cursor) -> Result<(), AsmError> {
    let name = state.current.text.trim().to_string();
    if name.is_empty() {
        return Err(err_at(ErrorKind::EmptyLabel, cursor));
    }
    let address = state.result.instructions.len() as u16;
    match state.result.symbols.bind_label(&name, address) {
        Ok(()) => {
            state.current = CurrentInstruction {
                kind: InstructionKind::NullAwaitingNewLine,
                text: String::new(),
                start: cursor.pos(),
            };
            state.previous = InstructionKind::Null;
            Ok(())
        }
        Err(BindError::BuiltIn) => Err(err_at(ErrorKind::RedefineBuiltIn(name), cursor)),
        Err(BindError::Duplicate) => Err(err_at(ErrorKind::DuplicateLabel(name), cursor)),
    }
}

fn finalize_a(state: &mut AssemblerState, cursor: &Cursor) -> Result<(), AsmError> {
    let text = std::mem::take(&mut state.current.text);
    let inst = if text.chars().all(|c| c.is_ascii_digit()) {
        let value = text
            .parse::<u16>()
            .map_err(|_| err_at(ErrorKind::ValueOutOfRange(text.clone()), cursor))?;
        AInst {
            value,
            symbol: None,
        }
    } else {
        match state.result.symbols.get(&text) {
            Some(sym) => AInst {
                value: sym.address,
                symbol: Some(SymbolRef {
                    name: text,
                    initial: false,
                }),
            },
            None => {
                let address = state.result.symbols.allocate_variable(&text);
                AInst {
                    value: address,
                    symbol: Some(SymbolRef {
                        name: text,
                        initial: true,
                    }),
                }
            }
        }
    };
    debug!(?inst, "A instruction emitted");
    state.result.instructions.push(Inst::A(inst));
    state.current = CurrentInstruction::null();
    state.previous = InstructionKind::Null;
    Ok(())
}

fn finalize_c(state: &mut AssemblerState, cursor: &Cursor, pending: bool) -> Result<(), AsmError> {
    let text = std::mem::take(&mut state.current.text);
    let inst = CInst::parse(&text).map_err(|e| match e {
        CInstError::Grammar => err_at(ErrorKind::InvalidCInstruction(text.clone()), cursor),
        CInstError::UnknownComp(comp) => err_at(ErrorKind::UnknownComputation(comp), cursor),
    })?;
    debug!(%inst, "C instruction emitted");
    state.result.instructions.push(Inst::C(inst));
    state.current = CurrentInstruction::null();
    if pending {
        state.current.kind = InstructionKind::NullAwaitingNewLine;
    }
    state.previous = InstructionKind::Null;
    Ok(())
}

fn c_operator(state: &mut AssemblerState, cursor: &Cursor, ch: char) -> Result<(), AsmError> {
    let text = &state.current.text;
    if text.contains(';') {
        return Err(illegal(cursor, ch));
    }
    if text.ends_with('=') {
        // unary minus, only ever on `1`
        if ch == '-' && cursor.peek_next() == Some('1') {
            state.current.text.push(ch);
            return Ok(());
        }
        return Err(illegal(cursor, ch));
    }
    let Some(eq) = text.find('=') else {
        return Err(illegal(cursor, ch));
    };
    let comp = &text[eq + 1..];
    let comp = comp.strip_prefix('-').unwrap_or(comp);
    if comp.contains(['+', '-']) {
        return Err(illegal(cursor, ch));
    }
    if text.ends_with(|c: char| matches!(c, 'A' | 'D' | 'M' | '0' | '1')) {
        state.current.text.push(ch);
        Ok(())
    } else {
        Err(illegal(cursor, ch))
    }
}

fn c_alpha(state: &mut AssemblerState, cursor: &Cursor, ch: char) -> Result<(), AsmError> {
    let text = &state.current.text;
    if let Some(semi) = text.find(';') {
        // jump letters must keep extending a valid mnemonic
        let mut jump = text[semi + 1..].to_string();
        jump.push(ch);
        if JUMPS.iter().any(|j| j.starts_with(&jump)) {
            state.current.text.push(ch);
            Ok(())
        } else {
            Err(illegal(cursor, ch))
        }
    } else if matches!(ch, 'A' | 'D' | 'M') {
        if text.chars().all(|c| matches!(c, 'A' | 'D' | 'M')) {
            // destination letters stay distinct
            if text.contains(ch) {
                Err(illegal(cursor, ch))
            } else {
                state.current.text.push(ch);
                Ok(())
            }
        } else if text.ends_with(['=', '+', '-']) {
            state.current.text.push(ch);
            Ok(())
        } else if text.contains('=') && text.ends_with(|c: char| matches!(c, 'A' | 'D' | 'M')) {
            // consecutive operand letters; the full grammar rejects the
            // token at finalization
            state.current.text.push(ch);
            Ok(())
        } else {
            Err(illegal(cursor, ch))
        }
    } else {
        Err(illegal(cursor, ch))
    }
}
