//! Frame renderer
//!
//! Orchestrates one render pass: probe capabilities, validate geometry,
//! enter an alternate-buffer session, draw the static frame, hand control to
//! the caller's content callback, block until dismissal, and release the
//! session on every exit path.

use std::io::{self, Write};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::caps::{CapabilityError, TerminalCaps};
use crate::core::geometry::{Geometry, GeometryError};
use crate::core::session::{SessionError, TerminalSession};
use crate::ui::draw::{self, DrawCommand, DrawError, DrawSink};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Draw(#[from] DrawError),

    #[error("render i/o failed: {0}")]
    Io(#[from] io::Error),
}

/// Static frame configuration: everything drawn before the content callback.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Title bar text, also sent as the host window title
    pub title: String,
    /// Rows reserved at the top and bottom of the scroll region
    pub margins: (u16, u16),
    /// Title bar foreground/background SGR codes
    pub header_colors: (u8, u8),
    /// Status line text for the last row, if any
    pub status: Option<String>,
    /// Draw horizontal borders along the margin bands
    pub border: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            title: String::from("vtframe"),
            margins: (1, 1),
            // Black on green, as the original demos
            header_colors: (30, 42),
            status: None,
            border: false,
        }
    }
}

/// Single-pass frame renderer.
pub struct Renderer;

impl Renderer {
    /// Render one frame on stdout and block until a key press dismisses it.
    ///
    /// The content callback runs exactly once, after the static frame is in
    /// place. If it fails, the session is still released before the error
    /// reaches the caller.
    pub fn run<F>(config: &FrameConfig, content: F) -> Result<(), RenderError>
    where
        F: FnOnce(&Geometry, &mut DrawSink<'_, io::Stdout>) -> Result<(), RenderError>,
    {
        let caps = TerminalCaps::probe()?;
        info!(
            "rendering frame: {}x{}, title {:?}",
            caps.cols, caps.rows, config.title
        );
        run_frame(Geometry::from_caps(&caps), io::stdout(), config, content, wait_for_key)
    }
}

/// Frame driver, generic over the output writer and the dismissal wait so
/// the release-on-error contract is testable without a terminal.
fn run_frame<W, F, D>(
    base: Geometry,
    out: W,
    config: &FrameConfig,
    content: F,
    wait: D,
) -> Result<(), RenderError>
where
    W: Write,
    F: FnOnce(&Geometry, &mut DrawSink<'_, W>) -> Result<(), RenderError>,
    D: FnOnce() -> io::Result<()>,
{
    // Validate geometry before any terminal mutation
    let geometry = base.with_margins(config.margins.0, config.margins.1)?;

    let mut session = TerminalSession::begin(out)?;
    let drawn = draw_frame(&mut session, &geometry, config, content)
        .and_then(|()| wait().map_err(RenderError::from));

    // Release before surfacing any error; report the teardown failure only
    // when the render itself succeeded
    let released = session.end();
    drawn?;
    released?;
    Ok(())
}

fn draw_frame<W, F>(
    session: &mut TerminalSession<W>,
    geometry: &Geometry,
    config: &FrameConfig,
    content: F,
) -> Result<(), RenderError>
where
    W: Write,
    F: FnOnce(&Geometry, &mut DrawSink<'_, W>) -> Result<(), RenderError>,
{
    let out = session.writer();
    out.write_all(&draw::window_title(&config.title))?;
    out.write_all(&draw::scroll_region(geometry))?;

    let mut sink = DrawSink::new(out, geometry);
    sink.submit(&DrawCommand::TitleBar {
        text: config.title.clone(),
        fg: config.header_colors.0,
        bg: config.header_colors.1,
    })?;

    if config.border {
        // Borders sit on the innermost margin rows, leaving the title and
        // status rows intact
        if geometry.top_margin() >= 2 {
            sink.submit(&DrawCommand::MoveCursor { x: 1, y: geometry.top_margin() })?;
            sink.submit(&DrawCommand::HorizontalBorder { is_top: true })?;
        }
        if geometry.bottom_margin() >= 2 {
            sink.submit(&DrawCommand::MoveCursor {
                x: 1,
                y: geometry.height() - geometry.bottom_margin() + 1,
            })?;
            sink.submit(&DrawCommand::HorizontalBorder { is_top: false })?;
        }
    }

    if let Some(status) = &config.status {
        sink.submit(&DrawCommand::StatusLine { text: status.clone() })?;
    }

    debug!("static frame drawn, invoking content callback");
    content(geometry, &mut sink)?;
    sink.flush()?;
    Ok(())
}

/// Block until any key press. Raw mode is scoped to the wait so key events
/// arrive unbuffered; resize and mouse events are ignored.
fn wait_for_key() -> io::Result<()> {
    terminal::enable_raw_mode()?;
    let result = loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => break Ok(()),
            Ok(_) => continue,
            Err(e) => break Err(e),
        }
    };
    let restored = terminal::disable_raw_mode();
    result.and(restored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::SESSION_TEST_LOCK;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl SharedBuf {
        fn bytes(&self) -> Vec<u8> {
            self.0.borrow().clone()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn config() -> FrameConfig {
        FrameConfig {
            title: String::from("Test Frame"),
            status: Some(String::from("status")),
            ..FrameConfig::default()
        }
    }

    #[test]
    fn test_run_frame_full_pass() {
        let _guard = SESSION_TEST_LOCK.lock().unwrap();

        let buf = SharedBuf::default();
        let called = Rc::new(RefCell::new(0));
        let seen = called.clone();

        run_frame(
            Geometry::fixed(80, 24),
            buf.clone(),
            &config(),
            move |geometry, sink| {
                *seen.borrow_mut() += 1;
                assert_eq!(geometry.scroll_top(), 2);
                sink.print("content")?;
                Ok(())
            },
            || Ok(()),
        )
        .unwrap();

        assert_eq!(*called.borrow(), 1);
        let out = buf.bytes();
        assert!(out.starts_with(b"\x1b[?1049h"));
        assert!(out.ends_with(b"\x1b[?1049l"));

        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("\x1b]0;Test Frame\x07"));
        assert!(text.contains("\x1b[2;23r"));
        assert!(text.contains("Test Frame"));
        assert!(text.contains("\x1b[24;1H\x1b[Kstatus"));
        assert!(text.contains("content"));
    }

    #[test]
    fn test_run_frame_releases_on_content_error() {
        let _guard = SESSION_TEST_LOCK.lock().unwrap();

        let buf = SharedBuf::default();
        let result = run_frame(
            Geometry::fixed(80, 24),
            buf.clone(),
            &config(),
            |_, _| {
                Err(RenderError::Draw(DrawError::InvalidColorCode(200)))
            },
            || Ok(()),
        );

        assert!(matches!(
            result,
            Err(RenderError::Draw(DrawError::InvalidColorCode(200)))
        ));
        // The alternate buffer was still left
        assert!(buf.bytes().ends_with(b"\x1b[?1049l"));
    }

    #[test]
    fn test_run_frame_rejects_bad_margins_before_mutation() {
        let _guard = SESSION_TEST_LOCK.lock().unwrap();

        let buf = SharedBuf::default();
        let bad = FrameConfig {
            margins: (20, 20),
            ..config()
        };
        let result = run_frame(
            Geometry::fixed(80, 24),
            buf.clone(),
            &bad,
            |_, _| Ok(()),
            || Ok(()),
        );

        assert!(matches!(result, Err(RenderError::Geometry(_))));
        // Nothing reached the terminal
        assert!(buf.bytes().is_empty());
    }

    #[test]
    fn test_run_frame_draws_borders_when_margins_allow() {
        let _guard = SESSION_TEST_LOCK.lock().unwrap();

        let buf = SharedBuf::default();
        let bordered = FrameConfig {
            margins: (2, 2),
            border: true,
            ..config()
        };
        run_frame(
            Geometry::fixed(40, 24),
            buf.clone(),
            &bordered,
            |_, _| Ok(()),
            || Ok(()),
        )
        .unwrap();

        let text = String::from_utf8_lossy(&buf.bytes()).into_owned();
        // Top border on row 2, bottom border on row 23, both in line-drawing
        // mode brackets
        assert!(text.contains("\x1b[2;1H\x1b(0"));
        assert!(text.contains("\x1b[23;1H\x1b(0"));
        assert!(text.contains('l'));
        assert!(text.contains('j'));
    }
}
