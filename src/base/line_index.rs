//! Byte offset to line/column conversion.

use text_size::TextSize;

/// A position in source code (0-indexed line, 0-indexed byte column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl std::fmt::Display for LineCol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

/// Maps byte offsets of a single text to line/column pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Offset of the first byte of every line.
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (idx, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::new(idx as u32 + 1));
            }
        }
        Self { line_starts }
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        LineCol {
            line: line as u32,
            col: u32::from(offset - self.line_starts[line]),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_first_line() {
        let index = LineIndex::new("class A {}");
        assert_eq!(index.line_col(TextSize::new(6)), LineCol { line: 0, col: 6 });
    }

    #[test]
    fn test_line_col_after_newline() {
        let index = LineIndex::new("<?php\nclass A {}\n");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_col(TextSize::new(6)), LineCol { line: 1, col: 0 });
        assert_eq!(index.line_col(TextSize::new(12)), LineCol { line: 1, col: 6 });
    }

    #[test]
    fn test_display_is_one_based() {
        let pos = LineCol { line: 2, col: 4 };
        assert_eq!(pos.to_string(), "3:5");
    }
}
