use tracing::warn;

/// Splits source text into lines, treating `\r\n`, `\r` and `\n` as a
/// single line break. No line break characters are retained.
fn split_source_lines(source: &str) -> Vec<String> {
    source
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(str::to_string)
        .collect()
}

/// Read position over the whole source. Line boundaries read as `\n`,
/// both under the cursor and through the peek methods.
#[derive(Debug)]
pub struct Cursor {
    chars: Vec<Vec<char>>,
    raw: Vec<String>,
    line: usize,
    column: usize,
    finished: bool,
}

impl Cursor {
    pub fn new(source: &str) -> Self {
        let raw = split_source_lines(source);
        let chars = raw.iter().map(|line| line.chars().collect()).collect();
        let mut cursor = Self {
            chars,
            raw,
            line: 0,
            column: 0,
            finished: false,
        };
        cursor.finished = cursor.at_end();
        cursor
    }

    fn last_line(&self) -> usize {
        self.chars.len() - 1
    }

    fn line_len(&self) -> usize {
        self.chars[self.line].len()
    }

    fn at_end(&self) -> bool {
        self.line == self.last_line() && self.column == self.line_len()
    }

    /// Character under the cursor, or `None` once the source is exhausted.
    pub fn current(&self) -> Option<char> {
        if self.finished {
            return None;
        }
        if self.column < self.line_len() {
            Some(self.chars[self.line][self.column])
        } else {
            Some('\n')
        }
    }

    pub fn peek_prev(&self) -> Option<char> {
        if self.column > 0 {
            self.chars[self.line].get(self.column - 1).copied()
        } else if self.line > 0 {
            Some('\n')
        } else {
            None
        }
    }

    pub fn peek_next(&self) -> Option<char> {
        let len = self.line_len();
        if self.column < len {
            let next = self.column + 1;
            if next < len {
                Some(self.chars[self.line][next])
            } else if self.line < self.last_line() {
                Some('\n')
            } else {
                None
            }
        } else if self.line < self.last_line() {
            match self.chars[self.line + 1].first() {
                Some(&c) => Some(c),
                None if self.line + 1 < self.last_line() => Some('\n'),
                None => None,
            }
        } else {
            None
        }
    }

    /// Moves to the next column, or to column 0 of the next line once the
    /// current line (including its line break) is consumed. Advancing a
    /// finished cursor is a no-op.
    pub fn advance(&mut self) {
        if self.finished {
            warn!("cursor already finished; advance ignored");
            return;
        }
        if self.column < self.line_len() {
            self.column += 1;
        } else {
            self.line += 1;
            self.column = 0;
        }
        self.finished = self.at_end();
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn pos(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    pub fn source_line(&self, line: usize) -> &str {
        self.raw.get(line).map(String::as_str).unwrap_or("")
    }

    /// Iteration ceiling for the driver loop: total character count plus
    /// line count (every character, one line break per line, and the
    /// end-of-input step).
    pub fn step_limit(&self) -> usize {
        self.chars.iter().map(|line| line.len() + 1).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(source: &str) -> String {
        let mut cursor = Cursor::new(source);
        let mut out = String::new();
        while let Some(ch) = cursor.current() {
            out.push(ch);
            cursor.advance();
        }
        out
    }

    #[test]
    fn line_breaks_normalized() {
        assert_eq!(collect("a\r\nb\rc"), "a\nb\nc");
        assert_eq!(collect(""), "");
        assert_eq!(collect("\n"), "\n");
    }

    #[test]
    fn peeks_cross_line_boundaries() {
        let mut cursor = Cursor::new("a\nb");
        assert_eq!(cursor.current(), Some('a'));
        assert_eq!(cursor.peek_prev(), None);
        assert_eq!(cursor.peek_next(), Some('\n'));
        cursor.advance();
        assert_eq!(cursor.current(), Some('\n'));
        assert_eq!(cursor.peek_prev(), Some('a'));
        assert_eq!(cursor.peek_next(), Some('b'));
        cursor.advance();
        assert_eq!(cursor.current(), Some('b'));
        assert_eq!(cursor.peek_prev(), Some('\n'));
        assert_eq!(cursor.peek_next(), None);
        assert!(!cursor.is_finished());
        cursor.advance();
        assert!(cursor.is_finished());
        assert_eq!(cursor.current(), None);
        cursor.advance(); // no-op
        assert!(cursor.is_finished());
    }

    #[test]
    fn step_limit_covers_chars_plus_lines() {
        assert_eq!(Cursor::new("ab\nc").step_limit(), 5);
        assert_eq!(Cursor::new("").step_limit(), 1);
    }
}
