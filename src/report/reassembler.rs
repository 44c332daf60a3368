//! Physical line reassembly
//!
//! Text extraction sometimes breaks one report row over two or more
//! lines (typically a long customer name on its own line). Lines are
//! buffered until the joined text holds enough dates and numbers to be a
//! full row.

use super::tokenizer::count_dates_and_numbers;

pub const DEFAULT_MIN_DATES: usize = 2;
pub const DEFAULT_MIN_NUMBERS: usize = 7;

/// Whether a line holds a whole data row, using the default thresholds.
pub fn is_line_complete(line: &str) -> bool {
    is_line_complete_with(line, DEFAULT_MIN_DATES, DEFAULT_MIN_NUMBERS)
}

pub fn is_line_complete_with(line: &str, min_dates: usize, min_numbers: usize) -> bool {
    let (dates, numbers) = count_dates_and_numbers(line);
    dates >= min_dates && numbers >= min_numbers
}

/// What happened to a line pushed into the [`Reassembler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assembly {
    /// The joined text is a complete row
    Complete(String),
    /// Not enough tokens yet; the text stays buffered
    Buffered,
}

/// Buffer state at end of document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leftover {
    Nothing,
    Complete(String),
    /// Too few tokens to be a row; dropped
    Fragment(String),
}

/// Single-line buffer joining physical lines into logical rows.
#[derive(Debug, Clone)]
pub struct Reassembler {
    buffer: String,
    min_dates: usize,
    min_numbers: usize,
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DATES, DEFAULT_MIN_NUMBERS)
    }
}

impl Reassembler {
    pub fn new(min_dates: usize, min_numbers: usize) -> Self {
        Self {
            buffer: String::new(),
            min_dates,
            min_numbers,
        }
    }

    pub fn push(&mut self, line: &str) -> Assembly {
        let candidate = if self.buffer.is_empty() {
            line.to_string()
        } else {
            format!("{} {}", self.buffer, line)
        };

        if is_line_complete_with(&candidate, self.min_dates, self.min_numbers) {
            self.buffer.clear();
            Assembly::Complete(candidate)
        } else {
            self.buffer = candidate;
            Assembly::Buffered
        }
    }

    pub fn pending(&self) -> Option<&str> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(&self.buffer)
        }
    }

    /// Flush at end of document.
    pub fn finish(self) -> Leftover {
        if self.buffer.is_empty() {
            Leftover::Nothing
        } else if is_line_complete_with(&self.buffer, self.min_dates, self.min_numbers) {
            Leftover::Complete(self.buffer)
        } else {
            Leftover::Fragment(self.buffer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BETA_FIGURES: &str =
        "02/02/2024 10/10/2024 100,00 5 500,00 400,00 0,00 0,00 600,00 450,00 100,00 20%";

    #[test]
    fn test_complete_line() {
        assert!(is_line_complete(&format!("Beta Ltd {}", BETA_FIGURES)));
        assert!(!is_line_complete("Beta Ltd"));
        // Two dates alone already give six number-like groups
        assert!(!is_line_complete("Beta 02/02/2024 10/10/2024"));
        assert!(is_line_complete("Beta 02/02/2024 10/10/2024 1"));
    }

    #[test]
    fn test_custom_thresholds() {
        assert!(is_line_complete_with("Beta 02/02/2024", 1, 3));
        assert!(!is_line_complete_with("Beta 02/02/2024", 1, 4));
    }

    #[test]
    fn test_joins_split_row() {
        let mut reassembler = Reassembler::default();
        assert_eq!(reassembler.push("Beta Ltd"), Assembly::Buffered);
        assert_eq!(reassembler.pending(), Some("Beta Ltd"));

        match reassembler.push(BETA_FIGURES) {
            Assembly::Complete(line) => assert_eq!(line, format!("Beta Ltd {}", BETA_FIGURES)),
            other => panic!("expected complete row, got {:?}", other),
        }
        assert_eq!(reassembler.pending(), None);
        assert_eq!(reassembler.finish(), Leftover::Nothing);
    }

    #[test]
    fn test_joins_three_fragments() {
        let mut reassembler = Reassembler::default();
        assert_eq!(reassembler.push("Comercial"), Assembly::Buffered);
        assert_eq!(reassembler.push("Beta Ltd 02/02/2024"), Assembly::Buffered);
        let rest = "10/10/2024 100,00 5 500,00";
        assert_eq!(
            reassembler.push(rest),
            Assembly::Complete(format!("Comercial Beta Ltd 02/02/2024 {}", rest))
        );
    }

    #[test]
    fn test_finish_keeps_complete_trailing_row() {
        let mut reassembler = Reassembler::new(2, 7);
        reassembler.buffer = format!("Beta Ltd {}", BETA_FIGURES);
        assert!(matches!(reassembler.finish(), Leftover::Complete(_)));
    }

    #[test]
    fn test_finish_discards_incomplete_fragment() {
        let mut reassembler = Reassembler::default();
        reassembler.push("Omega Ltda 01/01/2024");
        assert_eq!(
            reassembler.finish(),
            Leftover::Fragment("Omega Ltda 01/01/2024".to_string())
        );
    }
}
