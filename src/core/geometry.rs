//! Screen geometry
//!
//! Tracks the addressable size of the viewport and the margin bands reserved
//! for the title bar and status line. All row/column values are terminal
//! cells, 1-indexed at the escape-sequence boundary.

use thiserror::Error;

use super::caps::TerminalCaps;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GeometryError {
    #[error("margins ({top} top + {bottom} bottom) leave no drawable rows in a {height}-row viewport")]
    MarginsExceedHeight { top: u16, bottom: u16, height: u16 },
}

/// Viewport geometry with reserved header/footer bands.
///
/// Invariant: `top_margin + bottom_margin < height`, so the scroll region
/// between the margins is never empty. Construct via [`Geometry::from_caps`]
/// and [`Geometry::with_margins`]; the fields are read-only to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    width: u16,
    height: u16,
    top_margin: u16,
    bottom_margin: u16,
}

impl Geometry {
    /// Margin-less geometry from an explicit size. Test fixture.
    #[cfg(test)]
    pub(crate) fn fixed(width: u16, height: u16) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            top_margin: 0,
            bottom_margin: 0,
        }
    }

    /// Derive a margin-less geometry from probed capabilities.
    pub fn from_caps(caps: &TerminalCaps) -> Self {
        Self {
            width: caps.cols.max(1),
            height: caps.rows.max(1),
            top_margin: 0,
            bottom_margin: 0,
        }
    }

    /// Reserve `top` rows at the top and `bottom` rows at the bottom.
    ///
    /// Fails when the margins would swallow the whole viewport; sending the
    /// resulting scroll-region sequence would be malformed.
    pub fn with_margins(self, top: u16, bottom: u16) -> Result<Self, GeometryError> {
        if top as u32 + bottom as u32 >= self.height as u32 {
            return Err(GeometryError::MarginsExceedHeight {
                top,
                bottom,
                height: self.height,
            });
        }
        Ok(Self {
            top_margin: top,
            bottom_margin: bottom,
            ..self
        })
    }

    /// Recompute for a new viewport size, keeping the margin reservation.
    ///
    /// Called on an explicit resize notification; revalidates the margin
    /// invariant against the new height.
    #[allow(dead_code)]
    pub fn resized(self, cols: u16, rows: u16) -> Result<Self, GeometryError> {
        Self {
            width: cols.max(1),
            height: rows.max(1),
            top_margin: 0,
            bottom_margin: 0,
        }
        .with_margins(self.top_margin, self.bottom_margin)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn top_margin(&self) -> u16 {
        self.top_margin
    }

    pub fn bottom_margin(&self) -> u16 {
        self.bottom_margin
    }

    /// First row of the scrollable region, 1-indexed.
    pub fn scroll_top(&self) -> u16 {
        self.top_margin + 1
    }

    /// Last row of the scrollable region, 1-indexed.
    pub fn scroll_bottom(&self) -> u16 {
        self.height - self.bottom_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(width: u16, height: u16) -> Geometry {
        Geometry::fixed(width, height)
    }

    #[test]
    fn test_margins_within_height() {
        let geo = geometry(80, 24).with_margins(2, 1).unwrap();
        assert_eq!(geo.width(), 80);
        assert_eq!(geo.height(), 24);
        assert_eq!(geo.top_margin(), 2);
        assert_eq!(geo.bottom_margin(), 1);
        assert_eq!(geo.scroll_top(), 3);
        assert_eq!(geo.scroll_bottom(), 23);
    }

    #[test]
    fn test_margins_exceed_height() {
        let err = geometry(80, 10).with_margins(5, 5).unwrap_err();
        assert_eq!(
            err,
            GeometryError::MarginsExceedHeight {
                top: 5,
                bottom: 5,
                height: 10
            }
        );

        // One row short is still an error; one drawable row is fine
        assert!(geometry(80, 10).with_margins(9, 1).is_err());
        assert!(geometry(80, 10).with_margins(9, 0).is_ok());
    }

    #[test]
    fn test_margin_sum_does_not_overflow() {
        // u16::MAX + u16::MAX must not wrap past the check
        assert!(geometry(80, 24)
            .with_margins(u16::MAX, u16::MAX)
            .is_err());
    }

    #[test]
    fn test_resized_keeps_margins() {
        let geo = geometry(80, 24).with_margins(2, 1).unwrap();
        let resized = geo.resized(120, 40).unwrap();
        assert_eq!(resized.width(), 120);
        assert_eq!(resized.height(), 40);
        assert_eq!(resized.top_margin(), 2);
        assert_eq!(resized.bottom_margin(), 1);

        // Shrinking below the margin band fails
        assert!(geo.resized(120, 3).is_err());
    }
}
