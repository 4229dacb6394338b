use serde::{Deserialize, Serialize};

/// Minimum selection extent in CSS pixels. Drags at or below this size in
/// either dimension are treated as accidental clicks and discarded.
pub const MIN_SELECTION: f64 = 10.0;

/// A point in viewport coordinates (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in viewport coordinates (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Normalized bounding box of two corner points: the top-left is the
    /// component-wise minimum, extents are absolute differences. The user can
    /// drag in any direction, so the result never has negative dimensions.
    pub fn from_points(origin: Point, current: Point) -> Self {
        Self {
            x: origin.x.min(current.x),
            y: origin.y.min(current.y),
            width: (current.x - origin.x).abs(),
            height: (current.y - origin.y).abs(),
        }
    }

    /// Whether this rectangle is large enough to proceed to capture.
    pub fn meets_min_selection(&self) -> bool {
        self.width > MIN_SELECTION && self.height > MIN_SELECTION
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Converts this CSS-pixel rectangle into device pixels for cropping the
    /// captured bitmap at native resolution.
    pub fn to_device_pixels(&self, device_pixel_ratio: f64) -> DeviceRect {
        let ratio = if device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        DeviceRect {
            x: (self.x * ratio).round() as u32,
            y: (self.y * ratio).round() as u32,
            width: ((self.width * ratio).round() as u32).max(1),
            height: ((self.height * ratio).round() as u32).max(1),
        }
    }
}

/// A rectangle in device pixels, derived from a [`Rect`] and a pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Width/height pair used for clamping popup positions to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}
