use crate::input::{PlatformError, PlatformResult, Point};
use display_info::DisplayInfo;
use std::ops::RangeInclusive;

/// Inclusive-exclusive screen rectangle in absolute pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Bounds {
    pub fn from_size(width: i32, height: i32) -> Self {
        Self { min_x: 0, max_x: width, min_y: 0, max_y: height }
    }

    pub fn width(&self) -> i32 { self.max_x - self.min_x }
    pub fn height(&self) -> i32 { self.max_y - self.min_y }
    pub fn is_valid(&self) -> bool { self.width() > 0 && self.height() > 0 }

    pub fn contains(&self, p: Point) -> bool {
        (self.min_x..self.max_x).contains(&p.x) && (self.min_y..self.max_y).contains(&p.y)
    }

    /// Nearest point inside the rectangle.
    pub fn clamp(&self, p: Point) -> Point {
        if !self.is_valid() {
            return p;
        }
        Point::new(p.x.clamp(self.min_x, self.max_x - 1), p.y.clamp(self.min_y, self.max_y - 1))
    }

    /// Editable x values, or `None` when the rectangle is empty.
    pub fn x_range(&self) -> Option<RangeInclusive<i32>> {
        self.is_valid().then(|| self.min_x..=self.max_x - 1)
    }

    pub fn y_range(&self) -> Option<RangeInclusive<i32>> {
        self.is_valid().then(|| self.min_y..=self.max_y - 1)
    }

    fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Union of every attached display.
pub fn virtual_desktop() -> PlatformResult<Bounds> {
    let displays = DisplayInfo::all().map_err(|e| PlatformError::Displays(e.to_string()))?;
    displays
        .iter()
        .map(|d| Bounds {
            min_x: d.x,
            max_x: d.x + d.width as i32,
            min_y: d.y,
            max_y: d.y + d.height as i32,
        })
        .reduce(Bounds::union)
        .filter(Bounds::is_valid)
        .ok_or_else(|| PlatformError::Displays("no displays reported".into()))
}

/// Like [`virtual_desktop`], falling back to the main display size.
pub fn virtual_desktop_or(main_display: (i32, i32)) -> Bounds {
    match virtual_desktop() {
        Ok(bounds) => bounds,
        Err(err) => {
            tracing::warn!(%err, "falling back to main display size");
            Bounds::from_size(main_display.0, main_display.1)
        }
    }
}
