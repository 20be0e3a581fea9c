//! Character cursor for traversing source code.
//!
//! Tracks byte position plus 1-based line/column so the lexer can stamp
//! every token with a [`zygon_util::Span`] for diagnostics.

pub struct Cursor<'a> {
    source: &'a str,
    position: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    #[inline]
    pub fn current(&self) -> char {
        self.peek(0)
    }

    #[inline]
    pub fn peek(&self, offset: usize) -> char {
        self.source[self.position..]
            .chars()
            .nth(offset)
            .unwrap_or('\0')
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    /// Advances past the current character, updating line/column.
    pub fn advance(&mut self) -> char {
        let c = self.current();
        if c == '\0' {
            return c;
        }
        self.position += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }
}
