//! Drawing and frame orchestration.
//!
//! This module provides the output-side functionality:
//!
//! - **draw**: the closed escape-sequence vocabulary and validated sink
//! - **palette**: standard 16-color swatch grid data
//! - **renderer**: single-pass frame orchestration with guaranteed release

pub mod draw;
pub mod palette;
pub mod renderer;

pub use draw::{DrawCommand, DrawError, DrawSink};
pub use palette::ColorPalette;
pub use renderer::{FrameConfig, RenderError, Renderer};
