//! Console capability probe
//!
//! Queries the host terminal for virtual-terminal escape processing and the
//! current viewport size. On Windows this flips
//! `ENABLE_VIRTUAL_TERMINAL_PROCESSING` on the output handle; everywhere else
//! VT sequences are assumed to work whenever stdout is a tty.

use std::io::{self, IsTerminal};

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("no interactive console is attached to stdout")]
    NoConsole,

    // Only reachable where the console mode is actually toggled
    #[allow(dead_code)]
    #[error("console refused to enable virtual-terminal processing")]
    ModeRejected,
}

/// Probed terminal capabilities.
///
/// Holding a value means escape processing is enabled on the host console.
/// The mode flip outlives the value; call [`TerminalCaps::restore_mode`] to
/// explicitly revert it. Sessions assume the mode stays enabled for their
/// whole lifetime, so there is no automatic revert.
#[derive(Debug, Clone, Copy)]
pub struct TerminalCaps {
    /// Viewport columns
    pub cols: u16,
    /// Viewport rows
    pub rows: u16,
    /// Console output mode before the probe enabled VT processing
    #[cfg(windows)]
    saved_mode: u32,
}

impl TerminalCaps {
    /// Probe the host console, enabling VT escape processing.
    pub fn probe() -> Result<Self, CapabilityError> {
        if !io::stdout().is_terminal() {
            return Err(CapabilityError::NoConsole);
        }

        #[cfg(windows)]
        let saved_mode = enable_vt_processing()?;

        let (cols, rows) =
            crossterm::terminal::size().map_err(|_| CapabilityError::NoConsole)?;
        debug!("probed terminal: {}x{}", cols, rows);

        Ok(Self {
            cols,
            rows,
            #[cfg(windows)]
            saved_mode,
        })
    }

    /// Explicitly revert the console mode to its pre-probe state.
    ///
    /// Opt-out only: never called by session teardown, since other output in
    /// the same process may still rely on escape processing.
    #[allow(dead_code)]
    pub fn restore_mode(self) -> Result<(), CapabilityError> {
        #[cfg(windows)]
        restore_console_mode(self.saved_mode)?;
        Ok(())
    }
}

#[cfg(windows)]
fn enable_vt_processing() -> Result<u32, CapabilityError> {
    use windows::Win32::System::Console::{
        GetConsoleMode, GetStdHandle, SetConsoleMode, CONSOLE_MODE,
        ENABLE_VIRTUAL_TERMINAL_PROCESSING, STD_OUTPUT_HANDLE,
    };

    unsafe {
        let handle = GetStdHandle(STD_OUTPUT_HANDLE).map_err(|_| CapabilityError::NoConsole)?;
        if handle.is_invalid() {
            return Err(CapabilityError::NoConsole);
        }

        let mut mode = CONSOLE_MODE(0);
        if GetConsoleMode(handle, &mut mode).is_err() {
            return Err(CapabilityError::NoConsole);
        }

        let new_mode = CONSOLE_MODE(mode.0 | ENABLE_VIRTUAL_TERMINAL_PROCESSING.0);
        if SetConsoleMode(handle, new_mode).is_err() {
            return Err(CapabilityError::ModeRejected);
        }
        debug!("console mode 0x{:08X} -> 0x{:08X}", mode.0, new_mode.0);

        Ok(mode.0)
    }
}

#[cfg(windows)]
#[allow(dead_code)]
fn restore_console_mode(saved: u32) -> Result<(), CapabilityError> {
    use windows::Win32::System::Console::{
        GetStdHandle, SetConsoleMode, CONSOLE_MODE, STD_OUTPUT_HANDLE,
    };

    unsafe {
        let handle = GetStdHandle(STD_OUTPUT_HANDLE).map_err(|_| CapabilityError::NoConsole)?;
        if handle.is_invalid() {
            return Err(CapabilityError::NoConsole);
        }
        SetConsoleMode(handle, CONSOLE_MODE(saved))
            .map_err(|_| CapabilityError::ModeRejected)
    }
}
