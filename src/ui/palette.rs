//! Standard 16-color palette data
//!
//! The ordered SGR foreground and background codes of the classic VT100
//! palette demo, paired into a 16×16 swatch grid. Pure data; nothing here
//! touches the terminal.

/// The 16 standard foreground codes paired with the 16 background codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPalette {
    foreground: [u8; 16],
    background: [u8; 16],
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::standard()
    }
}

impl ColorPalette {
    /// The standard palette: normal colors 30-37/40-47, bright 90-97/100-107.
    pub fn standard() -> Self {
        Self {
            foreground: [30, 31, 32, 33, 34, 35, 36, 37, 90, 91, 92, 93, 94, 95, 96, 97],
            background: [40, 41, 42, 43, 44, 45, 46, 47, 100, 101, 102, 103, 104, 105, 106, 107],
        }
    }

    pub fn foreground_codes(&self) -> &[u8; 16] {
        &self.foreground
    }

    pub fn background_codes(&self) -> &[u8; 16] {
        &self.background
    }

    /// All (fg, bg) pairs of the grid, row by row (one row per background).
    #[allow(dead_code)]
    pub fn pairs(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.background
            .iter()
            .flat_map(move |&bg| self.foreground.iter().map(move |&fg| (fg, bg)))
    }
}
