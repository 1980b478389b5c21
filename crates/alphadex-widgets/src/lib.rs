#![forbid(unsafe_code)]

//! Widgets for the alphadex client.
//!
//! - [`virtualized`] - windowed rendering of a [`ResultPage`](alphadex_core::ResultPage)
//! - [`alphabet`] - the 26 letter selectors
//! - [`input`] - the free-text prefix field

pub mod alphabet;
pub mod input;
pub mod virtualized;

pub use alphabet::{ALPHABET, AlphabetBar};
pub use input::TextInput;
pub use virtualized::{
    DEFAULT_OVERSCAN, DEFAULT_ROW_HEIGHT, DEFAULT_VIEWPORT_HEIGHT, VirtualizedList,
    VirtualizedListState, render_row, visible_range,
};
