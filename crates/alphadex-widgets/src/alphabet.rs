#![forbid(unsafe_code)]

//! The alphabet selector bar.
//!
//! Each letter occupies a three column cell: ` A ` normally, `[A]` when it
//! is the active selection. [`AlphabetBar::letter_at`] maps a column back to
//! its letter for pointer hit testing.

use alphadex_runtime::Frame;

/// The 26 selectable letters, in display order.
pub const ALPHABET: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S',
    'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

const CELL_WIDTH: u16 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlphabetBar {
    selected: Option<char>,
}

impl AlphabetBar {
    #[must_use]
    pub fn new(selected: Option<char>) -> Self {
        Self { selected }
    }

    /// Whether `letter` is one of the selectors.
    #[must_use]
    pub fn is_selector(letter: char) -> bool {
        letter.is_ascii_uppercase()
    }

    /// Letter under display column `x`.
    #[must_use]
    pub fn letter_at(x: u16) -> Option<char> {
        ALPHABET.get((x / CELL_WIDTH) as usize).copied()
    }

    /// The bar as one line of text.
    #[must_use]
    pub fn line(&self) -> String {
        ALPHABET
            .iter()
            .map(|&letter| {
                if self.selected == Some(letter) {
                    format!("[{letter}]")
                } else {
                    format!(" {letter} ")
                }
            })
            .collect()
    }

    pub fn render(&self, frame: &mut Frame, y: u16) {
        frame.set_row(y, &self.line());
    }
}
