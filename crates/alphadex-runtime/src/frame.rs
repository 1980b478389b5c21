#![forbid(unsafe_code)]

//! Line-oriented text surface.
//!
//! A [`Frame`] is a fixed grid of `height` rows, each holding at most `width`
//! display columns. Writes outside the grid are dropped and text wider than
//! the frame is clipped at a grapheme boundary, so a wide glyph never
//! straddles the right edge.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u16,
    height: u16,
    rows: Vec<String>,
}

impl Frame {
    /// Create a blank frame.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            rows: vec![String::new(); height as usize],
        }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Replace row `y` with `text`, clipped to the frame width.
    ///
    /// Returns `false` if `y` is outside the frame.
    pub fn set_row(&mut self, y: u16, text: &str) -> bool {
        let Some(row) = self.rows.get_mut(y as usize) else {
            return false;
        };
        *row = clip_to_width(text, self.width as usize);
        true
    }

    /// Text of row `y`, if inside the frame.
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&str> {
        self.rows.get(y as usize).map(String::as_str)
    }

    /// All rows, top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Rows joined with `\n`, trailing blank rows removed.
    #[must_use]
    pub fn to_text(&self) -> String {
        let last = self
            .rows
            .iter()
            .rposition(|r| !r.is_empty())
            .map_or(0, |i| i + 1);
        self.rows[..last].join("\n")
    }
}

/// Clip `text` to at most `max_width` display columns.
#[must_use]
pub fn clip_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let w = grapheme.width();
        if used + w > max_width {
            break;
        }
        used += w;
        out.push_str(grapheme);
    }
    out
}
