#![forbid(unsafe_code)]

//! Single-line free-text prefix input.
//!
//! The value is kept upper-cased, matching how the server compares names.
//! Editing happens at the end of the value only.

use alphadex_runtime::Frame;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    placeholder: String,
}

impl TextInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text shown when the value is empty.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace the value. Control characters are dropped.
    pub fn set_value(&mut self, value: &str) {
        self.value = value
            .chars()
            .filter(|c| !c.is_control())
            .flat_map(char::to_uppercase)
            .collect();
    }

    pub fn insert_char(&mut self, c: char) {
        if !c.is_control() {
            self.value.extend(c.to_uppercase());
        }
    }

    /// Remove the last character. Returns `false` if already empty.
    pub fn backspace(&mut self) -> bool {
        self.value.pop().is_some()
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// The field as one line: `label` followed by the value or placeholder.
    #[must_use]
    pub fn line(&self, label: &str) -> String {
        if self.value.is_empty() {
            format!("{label}{}", self.placeholder)
        } else {
            format!("{label}{}_", self.value)
        }
    }

    pub fn render(&self, frame: &mut Frame, y: u16, label: &str) {
        frame.set_row(y, &self.line(label));
    }
}
