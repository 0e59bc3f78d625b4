//! Draw commands
//!
//! The closed vocabulary of escape sequences this crate is allowed to emit.
//! Every sequence is constructed and validated here; nothing else in the
//! crate concatenates raw escapes ad hoc.
//!
//! Encoding is pure: a [`DrawCommand`] plus a [`Geometry`] produces exact
//! bytes, so sequences can be asserted byte-for-byte in tests. [`DrawSink`]
//! is the submission path handed to content callbacks.

use std::io::{self, Write};

use thiserror::Error;
use unicode_width::UnicodeWidthChar;

use crate::core::geometry::Geometry;

// Fixed sequences shared with the session guard.
pub const ENTER_ALT_BUFFER: &[u8] = b"\x1b[?1049h";
pub const LEAVE_ALT_BUFFER: &[u8] = b"\x1b[?1049l";
pub const CLEAR_SCREEN: &[u8] = b"\x1b[2J";
pub const CURSOR_HOME: &[u8] = b"\x1b[1;1H";
pub const RESET_COLOR: &[u8] = b"\x1b[0m";
pub const SHOW_CURSOR: &[u8] = b"\x1b[?25h";

const ENTER_LINE_DRAWING: &[u8] = b"\x1b(0";
const EXIT_LINE_DRAWING: &[u8] = b"\x1b(B";

/// Border style from the original demos: bright yellow on bright blue.
const BORDER_COLORS: &[u8] = b"\x1b[104;93m";

#[derive(Error, Debug)]
pub enum DrawError {
    #[error("cursor target ({x}, {y}) is outside the {width}x{height} viewport")]
    OutOfBounds {
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    },

    #[error("invalid SGR color code {0}")]
    InvalidColorCode(u8),

    #[error("draw i/o failed: {0}")]
    Io(#[from] io::Error),
}

/// A single drawing operation, independent of any output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    /// Position the cursor, 1-indexed. Out-of-range targets are rejected,
    /// never silently sent.
    MoveCursor { x: u16, y: u16 },
    /// Erase the full visible screen.
    #[allow(dead_code)]
    Clear,
    /// Select foreground and background from the standard SGR code space.
    SetColors { fg: u8, bg: u8 },
    /// Full-width line-drawing border at the current row.
    HorizontalBorder { is_top: bool },
    /// Single line-drawing vertical bar glyph at the current position.
    #[allow(dead_code)]
    VerticalBorder,
    /// Full-width colored bar at row 1 with left-aligned text.
    TitleBar { text: String, fg: u8, bg: u8 },
    /// Clear the last row and write text.
    StatusLine { text: String },
}

impl DrawCommand {
    /// Render this command to its escape-sequence bytes.
    pub fn encode(&self, geometry: &Geometry) -> Result<Vec<u8>, DrawError> {
        let mut buf = Vec::new();
        match self {
            DrawCommand::MoveCursor { x, y } => {
                let (x, y) = (*x, *y);
                if x < 1 || x > geometry.width() || y < 1 || y > geometry.height() {
                    return Err(DrawError::OutOfBounds {
                        x,
                        y,
                        width: geometry.width(),
                        height: geometry.height(),
                    });
                }
                write!(buf, "\x1b[{};{}H", y, x)?;
            }
            DrawCommand::Clear => {
                buf.extend_from_slice(CLEAR_SCREEN);
            }
            DrawCommand::SetColors { fg, bg } => {
                check_foreground(*fg)?;
                check_background(*bg)?;
                write!(buf, "\x1b[{};{}m", fg, bg)?;
            }
            DrawCommand::HorizontalBorder { is_top } => {
                let mut mode = LineDrawing::enter(&mut buf);
                let buf = mode.buf();
                buf.extend_from_slice(BORDER_COLORS);
                // In line-drawing mode: l/m/k/j are corners, q is the
                // horizontal scan line
                buf.push(if *is_top { b'l' } else { b'm' });
                for _ in 0..geometry.width().saturating_sub(2) {
                    buf.push(b'q');
                }
                buf.push(if *is_top { b'k' } else { b'j' });
                buf.extend_from_slice(RESET_COLOR);
            }
            DrawCommand::VerticalBorder => {
                let mut mode = LineDrawing::enter(&mut buf);
                let buf = mode.buf();
                buf.extend_from_slice(BORDER_COLORS);
                // x maps to the vertical bar glyph
                buf.push(b'x');
                buf.extend_from_slice(RESET_COLOR);
            }
            DrawCommand::TitleBar { text, fg, bg } => {
                check_foreground(*fg)?;
                check_background(*bg)?;
                buf.extend_from_slice(CURSOR_HOME);
                write!(buf, "\x1b[{};{}m", fg, bg)?;
                for _ in 0..geometry.width().saturating_sub(2) {
                    buf.push(b' ');
                }
                buf.extend_from_slice(CURSOR_HOME);
                let text = truncate_columns(text, geometry.width().saturating_sub(2) as usize);
                buf.extend_from_slice(text.as_bytes());
                buf.extend_from_slice(RESET_COLOR);
            }
            DrawCommand::StatusLine { text } => {
                write!(buf, "\x1b[{};1H", geometry.height())?;
                buf.extend_from_slice(b"\x1b[K");
                let text = truncate_columns(text, geometry.width().saturating_sub(2) as usize);
                buf.extend_from_slice(text.as_bytes());
            }
        }
        Ok(buf)
    }
}

/// Confine scrolling to the rows between the margin bands.
pub fn scroll_region(geometry: &Geometry) -> Vec<u8> {
    format!("\x1b[{};{}r", geometry.scroll_top(), geometry.scroll_bottom()).into_bytes()
}

/// Set the host window title (OSC 0).
pub fn window_title(title: &str) -> Vec<u8> {
    format!("\x1b]0;{}\x07", title).into_bytes()
}

/// Scoped line-drawing mode over an in-progress byte buffer.
///
/// The exit marker is appended on drop, so no encode path can produce the
/// enter marker without its matching exit.
struct LineDrawing<'a> {
    buf: &'a mut Vec<u8>,
}

impl<'a> LineDrawing<'a> {
    fn enter(buf: &'a mut Vec<u8>) -> Self {
        buf.extend_from_slice(ENTER_LINE_DRAWING);
        Self { buf }
    }

    fn buf(&mut self) -> &mut Vec<u8> {
        self.buf
    }
}

impl Drop for LineDrawing<'_> {
    fn drop(&mut self) {
        self.buf.extend_from_slice(EXIT_LINE_DRAWING);
    }
}

fn check_foreground(code: u8) -> Result<(), DrawError> {
    match code {
        30..=37 | 39 | 90..=97 => Ok(()),
        _ => Err(DrawError::InvalidColorCode(code)),
    }
}

fn check_background(code: u8) -> Result<(), DrawError> {
    match code {
        40..=47 | 49 | 100..=107 => Ok(()),
        _ => Err(DrawError::InvalidColorCode(code)),
    }
}

/// Cut `text` at `max` display columns. Never splits a wide character.
fn truncate_columns(text: &str, max: usize) -> &str {
    let mut cols = 0;
    let mut end = 0;
    for (i, ch) in text.char_indices() {
        let w = ch.width().unwrap_or(0);
        if cols + w > max {
            break;
        }
        cols += w;
        end = i + ch.len_utf8();
    }
    &text[..end]
}

/// Validated write path for draw commands during an active session.
pub struct DrawSink<'a, W: Write> {
    out: &'a mut W,
    geometry: &'a Geometry,
}

impl<'a, W: Write> DrawSink<'a, W> {
    pub fn new(out: &'a mut W, geometry: &'a Geometry) -> Self {
        Self { out, geometry }
    }

    /// Encode and write one command.
    pub fn submit(&mut self, command: &DrawCommand) -> Result<(), DrawError> {
        let bytes = command.encode(self.geometry)?;
        self.out.write_all(&bytes)?;
        Ok(())
    }

    /// Write plain text at the current cursor position.
    pub fn print(&mut self, text: &str) -> Result<(), DrawError> {
        self.out.write_all(text.as_bytes())?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), DrawError> {
        self.out.flush()?;
        Ok(())
    }
}
