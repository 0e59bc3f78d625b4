//! Alternate-buffer session guard
//!
//! Scoped ownership of "the alternate screen buffer is active". Begin
//! switches to the alternate buffer and clears it; end (or drop) switches
//! back to the main buffer unconditionally, so a render failure can never
//! leave the user's terminal stranded on the alternate screen.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::debug;

use crate::ui::draw;

/// The terminal has a single alternate buffer, so at most one session may be
/// active per process. Two processes sharing one terminal produce undefined
/// interleaving; that is outside what this flag can enforce.
static SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("an alternate-screen session is already active in this process")]
    AlreadyActive,

    #[error("session i/o failed: {0}")]
    Io(#[from] io::Error),
}

/// Active alternate-screen session.
///
/// Created by [`TerminalSession::begin`], released by [`TerminalSession::end`]
/// or by drop. Consumed on end; a new session must be constructed to enter
/// the alternate buffer again.
pub struct TerminalSession<W: Write> {
    out: W,
    active: bool,
}

impl<W: Write> TerminalSession<W> {
    /// Enter the alternate buffer and clear it.
    ///
    /// Fails with [`SessionError::AlreadyActive`] if another session holds
    /// the buffer; the existing session is left untouched.
    pub fn begin(mut out: W) -> Result<Self, SessionError> {
        if SESSION_ACTIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SessionError::AlreadyActive);
        }

        // From here on the flag must be released on any failure
        let entered = (|| -> io::Result<()> {
            out.write_all(draw::ENTER_ALT_BUFFER)?;
            out.write_all(draw::CLEAR_SCREEN)?;
            out.write_all(draw::CURSOR_HOME)?;
            out.flush()
        })();

        if let Err(e) = entered {
            SESSION_ACTIVE.store(false, Ordering::SeqCst);
            return Err(e.into());
        }

        debug!("alternate buffer entered");
        Ok(Self { out, active: true })
    }

    /// Whether this session still holds the alternate buffer.
    #[allow(dead_code)]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Writer for draw output while the session is active.
    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    /// Leave the alternate buffer, reporting any write failure.
    pub fn end(mut self) -> Result<(), SessionError> {
        self.release()?;
        Ok(())
    }

    /// Restore the main buffer and reset attributes. Idempotent.
    fn release(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        // Reset color and show the cursor before leaving, in case a draw
        // failed mid-sequence
        let result = (|| -> io::Result<()> {
            self.out.write_all(draw::RESET_COLOR)?;
            self.out.write_all(draw::SHOW_CURSOR)?;
            self.out.write_all(draw::LEAVE_ALT_BUFFER)?;
            self.out.flush()
        })();

        SESSION_ACTIVE.store(false, Ordering::SeqCst);
        debug!("alternate buffer released");
        result
    }
}

impl<W: Write> Drop for TerminalSession<W> {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

/// Serializes tests that exercise the process-wide active flag, here and in
/// the renderer.
#[cfg(test)]
pub(crate) static SESSION_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    /// Cloneable byte sink so the buffer stays inspectable after the
    /// session consumes its writer.
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

    #[test]
    fn test_begin_end_round_trip() {
        let _guard = SESSION_TEST_LOCK.lock().unwrap();

        let buf = SharedBuf::default();
        let session = TerminalSession::begin(buf.clone()).unwrap();
        assert!(session.is_active());
        assert!(SESSION_ACTIVE.load(Ordering::SeqCst));
        assert_eq!(buf.bytes(), b"\x1b[?1049h\x1b[2J\x1b[1;1H".to_vec());

        session.end().unwrap();
        assert!(!SESSION_ACTIVE.load(Ordering::SeqCst));
        assert!(buf.bytes().ends_with(b"\x1b[?1049l"));
    }

    #[test]
    fn test_nested_begin_fails() {
        let _guard = SESSION_TEST_LOCK.lock().unwrap();

        let buf = SharedBuf::default();
        let first = TerminalSession::begin(buf.clone()).unwrap();
        let before = buf.bytes();

        let second = TerminalSession::begin(SharedBuf::default());
        assert!(matches!(second, Err(SessionError::AlreadyActive)));

        // The first session is untouched by the failed begin
        assert!(first.is_active());
        assert_eq!(buf.bytes(), before);

        first.end().unwrap();
        assert!(!SESSION_ACTIVE.load(Ordering::SeqCst));
    }

    #[test]
    fn test_drop_releases() {
        let _guard = SESSION_TEST_LOCK.lock().unwrap();

        let buf = SharedBuf::default();
        {
            let _session = TerminalSession::begin(buf.clone()).unwrap();
            assert!(SESSION_ACTIVE.load(Ordering::SeqCst));
        }
        assert!(!SESSION_ACTIVE.load(Ordering::SeqCst));
        assert!(buf.bytes().ends_with(b"\x1b[?1049l"));

        // A fresh session can begin after the drop
        let session = TerminalSession::begin(SharedBuf::default()).unwrap();
        session.end().unwrap();
    }
}
