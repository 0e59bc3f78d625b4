//! vtframe - a minimal VT100 rendering core
//!
//! vtframe enters an alternate-screen terminal session, pins a title bar and
//! status line outside the scroll region, and hands the region between them
//! to a content callback. Escape sequences are built and validated in one
//! place instead of being concatenated at call sites.
//!
//! # Demo screens
//!
//! ```text
//! vtframe              # 16x16 color palette grid (default)
//! vtframe --count      # counting demo inside the scroll region
//! ```
//!
//! Press any key to leave a screen. Configuration lives in
//! `~/.vtframe/config.toml`.

mod config;
mod core;
mod ui;

use std::env;
use std::io::Write;
use std::thread;
use std::time::Duration;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;
use crate::core::geometry::Geometry;
use crate::ui::draw::{DrawCommand, DrawSink};
use crate::ui::palette::ColorPalette;
use crate::ui::renderer::{FrameConfig, RenderError, Renderer};

/// Which demo screen to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Palette,
    Counter,
}

/// Command-line options
struct Options {
    screen: Screen,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            screen: Screen::Palette,
        }
    }
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    eprintln!("vtframe {}", VERSION);
}

fn print_help() {
    eprintln!("vtframe {} - a minimal VT100 rendering core", VERSION);
    eprintln!();
    eprintln!("Usage: vtframe [OPTIONS]");
    eprintln!();
    eprintln!("Screen options:");
    eprintln!("  (default)             Color palette grid");
    eprintln!("  -p, --palette         Color palette grid");
    eprintln!("  -c, --count           Counting demo (scroll margins)");
    eprintln!();
    eprintln!("Other options:");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Press any key to dismiss a screen.");
    eprintln!();
    eprintln!("Configuration: ~/.vtframe/config.toml");
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();
    let mut options = Options::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-p" | "--palette" => {
                options.screen = Screen::Palette;
            }
            "-c" | "--count" => {
                options.screen = Screen::Counter;
            }
            other => {
                return Err(format!("Unknown option: {}", other));
            }
        }
        i += 1;
    }

    Ok(options)
}

fn main() -> anyhow::Result<()> {
    let options = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    // Log to a file; stdout is the rendering surface
    let log_path = config::home_dir()
        .map(|h| h.join(".vtframe").join("vtframe.log"))
        .unwrap_or_else(|| std::path::PathBuf::from("vtframe.log"));

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::INFO)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    info!("vtframe starting, screen: {:?}", options.screen);

    let file_config = Config::load();

    match options.screen {
        Screen::Palette => run_palette(&file_config)?,
        Screen::Counter => run_counter(&file_config)?,
    }

    info!("vtframe exiting");
    Ok(())
}

/// Render the 16x16 color swatch grid.
fn run_palette(config: &Config) -> Result<(), RenderError> {
    let frame = FrameConfig {
        title: config.frame.title.clone().unwrap_or_else(|| {
            String::from(" VT100 Colors\t\tAll sequences are CSI and end with 'm'")
        }),
        margins: (config.frame.top_margin, config.frame.bottom_margin),
        header_colors: (config.frame.header_fg, config.frame.header_bg),
        status: config.frame.status.clone(),
        border: config.frame.border,
    };

    Renderer::run(&frame, |geometry, sink| palette_screen(geometry, sink))
}

/// Render the counting demo confined to the scroll region.
fn run_counter(config: &Config) -> Result<(), RenderError> {
    let frame = FrameConfig {
        title: config
            .frame
            .title
            .clone()
            .unwrap_or_else(|| String::from(" Title bar (scroll margins demo)")),
        margins: (config.frame.top_margin, config.frame.bottom_margin),
        header_colors: (config.frame.header_fg, config.frame.header_bg),
        status: Some(
            config
                .frame
                .status
                .clone()
                .unwrap_or_else(|| String::from("Here is a status line")),
        ),
        border: config.frame.border,
    };

    let limit = config.counter.limit;
    let tick = Duration::from_millis(config.counter.tick_ms);
    Renderer::run(&frame, move |geometry, sink| {
        counter_screen(geometry, sink, limit, tick)
    })
}

/// Palette screen content: modifier legend, foreground header row, and the
/// background-by-foreground swatch grid.
fn palette_screen<W: Write>(
    geometry: &Geometry,
    sink: &mut DrawSink<'_, W>,
) -> Result<(), RenderError> {
    let palette = ColorPalette::standard();

    sink.submit(&DrawCommand::MoveCursor {
        x: 1,
        y: geometry.scroll_top(),
    })?;
    sink.print("Modifiers:\n")?;
    sink.print("Default: All:0 Foreground:39 Background:49\n")?;
    sink.print("Colors:\n")?;

    // Header row: each foreground code in its own color. Code 30 is black on
    // black by default; give it a white background so it stays legible.
    sink.print("\t")?;
    for &fg in palette.foreground_codes() {
        let bg = if fg == 30 { 47 } else { 49 };
        sink.submit(&DrawCommand::SetColors { fg, bg })?;
        sink.print(&format!(" {} ", fg))?;
        sink.submit(&DrawCommand::SetColors { fg: 39, bg: 49 })?;
    }
    sink.print("\n")?;

    // One row per background, one ** swatch per foreground
    for &bg in palette.background_codes() {
        if bg < 100 {
            sink.print("    ")?;
        } else {
            sink.print("   ")?;
        }

        // Dark label text on light or green backgrounds
        let label_fg = if bg > 45 || bg == 42 { 30 } else { 39 };
        sink.submit(&DrawCommand::SetColors { fg: label_fg, bg })?;
        sink.print(&format!(" {} ", bg))?;

        for &fg in palette.foreground_codes() {
            sink.submit(&DrawCommand::SetColors { fg, bg })?;
            sink.print(" ** ")?;
        }

        sink.submit(&DrawCommand::SetColors { fg: 39, bg: 49 })?;
        sink.print(" \n")?;
    }

    Ok(())
}

/// Counter screen content: count inside the scroll region so the title and
/// status rows stay pinned while the numbers scroll.
fn counter_screen<W: Write>(
    geometry: &Geometry,
    sink: &mut DrawSink<'_, W>,
    limit: u32,
    tick: Duration,
) -> Result<(), RenderError> {
    sink.submit(&DrawCommand::MoveCursor {
        x: 1,
        y: geometry.scroll_bottom(),
    })?;

    for count in 0..limit {
        sink.print(&format!("\n{}", count))?;
        sink.flush()?;
        thread::sleep(tick);
    }

    Ok(())
}
