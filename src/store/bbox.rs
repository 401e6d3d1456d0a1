// src/store/bbox.rs
// Bounding box representations and conversions

use serde::{Deserialize, Serialize};

/// Display surface dimensions used to normalize boxes at write time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
}

impl Surface {
    /// Create a new surface descriptor
    pub fn new(width: u32, height: u32) -> Self {
        Surface { width, height }
    }
}

/// Corner-form box `(x1, y1, x2, y2)` in canvas pixel coordinates.
///
/// Corner ordering is unconstrained: x1 may exceed x2 while the box is being
/// dragged out. Conversion to center form canonicalizes the orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CornerBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl CornerBox {
    /// Create a new corner-form box
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        CornerBox { x1, y1, x2, y2 }
    }

    /// Convert to center form in pixel units.
    ///
    /// The midpoint uses integer division, so the conversion truncates: a
    /// round-trip through [`CenterBox::to_corner`] may be off by one pixel per
    /// coordinate for odd extents.
    pub fn to_center(self) -> CenterBox {
        CenterBox {
            cx: ((self.x1 + self.x2) / 2) as f64,
            cy: ((self.y1 + self.y2) / 2) as f64,
            w: (self.x1 - self.x2).abs() as f64,
            h: (self.y1 - self.y2).abs() as f64,
        }
    }

    /// Convert to center form scaled into the unit square of `surface`.
    ///
    /// This is the persisted representation: x extents divide by the surface
    /// width, y extents by the height.
    pub fn normalized(self, surface: Surface) -> CenterBox {
        let center = self.to_center();
        CenterBox {
            cx: center.cx / f64::from(surface.width),
            cy: center.cy / f64::from(surface.height),
            w: center.w / f64::from(surface.width),
            h: center.h / f64::from(surface.height),
        }
    }
}

/// Center-form box `(cx, cy, w, h)` - the persisted representation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CenterBox {
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

impl CenterBox {
    /// Create a new center-form box
    pub fn new(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        CenterBox { cx, cy, w, h }
    }

    /// Convert back to corner form, truncating to pixel coordinates.
    ///
    /// The result is always ordered (x1 <= x2, y1 <= y2).
    pub fn to_corner(self) -> CornerBox {
        CornerBox {
            x1: (self.cx - self.w / 2.0) as i32,
            y1: (self.cy - self.h / 2.0) as i32,
            x2: (self.cx + self.w / 2.0) as i32,
            y2: (self.cy + self.h / 2.0) as i32,
        }
    }

    /// Scale a normalized box back into pixel units for `surface`
    pub fn denormalized(self, surface: Surface) -> CenterBox {
        CenterBox {
            cx: self.cx * f64::from(surface.width),
            cy: self.cy * f64::from(surface.height),
            w: self.w * f64::from(surface.width),
            h: self.h * f64::from(surface.height),
        }
    }
}
