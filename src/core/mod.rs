//! Core terminal-session components.
//!
//! This module contains the lifecycle and geometry logic:
//!
//! - **caps**: console capability probe (VT processing, viewport size)
//! - **geometry**: viewport size plus header/footer margin bands
//! - **session**: scoped alternate-buffer guard with guaranteed release
//!
//! # Architecture
//!
//! ```text
//! TerminalCaps ──> Geometry ──> (drives escape-sequence parameters)
//!       │
//!       └──> TerminalSession (owns the output writer while active)
//! ```

pub mod caps;
pub mod geometry;
pub mod session;

pub use caps::{CapabilityError, TerminalCaps};
pub use geometry::{Geometry, GeometryError};
pub use session::{SessionError, TerminalSession};
