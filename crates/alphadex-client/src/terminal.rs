#![forbid(unsafe_code)]

//! Terminal backend for the interactive client.
//!
//! [`TerminalSession`] owns raw mode, the alternate screen and mouse capture
//! for its lifetime and restores the terminal on drop, including when a
//! panic unwinds through it. [`map_event`] turns crossterm events into
//! [`FilterMsg`] values and is independent of any live terminal.
//!
//! # Key bindings
//!
//! | Input | Effect |
//! |---|---|
//! | printable character | append to the filter text |
//! | `Alt`+letter | select that letter |
//! | click on the alphabet row | select the clicked letter |
//! | `Backspace` | delete the last filter character |
//! | `Up` / `Down`, wheel | scroll one row |
//! | `PageUp` / `PageDown` | scroll one viewport |
//! | `Esc`, `Ctrl`+`C` | quit |

use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use alphadex_runtime::Frame;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use crossterm::{cursor, execute, queue, style, terminal};

use crate::view_model::{ALPHABET_ROW, FilterMsg};

/// What the event loop should do with one terminal event.
#[derive(Debug)]
pub enum Input {
    Quit,
    Msg(FilterMsg),
}

/// Map one terminal event. `row_height` is the list row height in units.
#[must_use]
pub fn map_event(event: Event, row_height: u32) -> Option<Input> {
    let step = i64::from(row_height.max(1));
    match event {
        Event::Key(key) => map_key(key, step),
        Event::Mouse(mouse) => map_mouse(mouse, step),
        Event::Resize(width, height) => Some(Input::Msg(FilterMsg::Resize { width, height })),
        _ => None,
    }
}

fn map_key(key: KeyEvent, step: i64) -> Option<Input> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let msg = match key.code {
        KeyCode::Esc => return Some(Input::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(Input::Quit);
        }
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::ALT) => {
            FilterMsg::SelectLetter(c)
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            FilterMsg::InsertChar(c)
        }
        KeyCode::Backspace => FilterMsg::Backspace,
        KeyCode::Up => FilterMsg::Scroll(-step),
        KeyCode::Down => FilterMsg::Scroll(step),
        KeyCode::PageUp => FilterMsg::PageUp,
        KeyCode::PageDown => FilterMsg::PageDown,
        _ => return None,
    };
    Some(Input::Msg(msg))
}

fn map_mouse(mouse: MouseEvent, step: i64) -> Option<Input> {
    let msg = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if mouse.row == ALPHABET_ROW => {
            FilterMsg::ClickAlphabet(mouse.column)
        }
        MouseEventKind::ScrollUp => FilterMsg::Scroll(-step),
        MouseEventKind::ScrollDown => FilterMsg::Scroll(step),
        _ => return None,
    };
    Some(Input::Msg(msg))
}

/// RAII guard over the terminal modes the client needs.
#[derive(Debug)]
pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    /// Enter raw mode, the alternate screen and mouse capture.
    pub fn new() -> io::Result<Self> {
        install_panic_hook();
        terminal::enable_raw_mode()?;
        // From here on, Drop restores whatever was enabled.
        let session = Self { _private: () };
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            crossterm::event::EnableMouseCapture,
            cursor::Hide
        )?;
        tracing::debug!("terminal session started");
        Ok(session)
    }

    /// Current size in cells (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Wait up to `timeout` for an event.
    pub fn poll_event(&self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    pub fn read_event(&self) -> io::Result<Event> {
        crossterm::event::read()
    }

    /// Paint every frame row, clearing whatever the previous frame left.
    pub fn draw(&self, frame: &Frame) -> io::Result<()> {
        let mut out = io::stdout().lock();
        for (y, row) in (0u16..).zip(frame.rows()) {
            queue!(
                out,
                cursor::MoveTo(0, y),
                terminal::Clear(terminal::ClearType::UntilNewLine),
                style::Print(row)
            )?;
        }
        out.flush()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal();
        tracing::debug!("terminal session ended");
    }
}

fn restore_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        crossterm::event::DisableMouseCapture,
        cursor::Show,
        terminal::LeaveAlternateScreen
    );
    let _ = terminal::disable_raw_mode();
    let _ = stdout.flush();
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal();
            previous(info);
        }));
    });
}
