//! Pure geometry helpers: screen/canvas mapping, crop framing and rotation.
//!
//! Canvas space is the fixed logical coordinate system of the design surface.
//! Screen space is whatever the frontend reports pointer positions in; the two
//! are related by the canvas origin on screen and the current zoom factor.

use serde::{Deserialize, Serialize};

use crate::error::EditorError;
use crate::models::CropWindow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn delta_to(self, other: Point) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }

    pub fn distance_to(self, other: Point) -> f64 {
        let (dx, dy) = self.delta_to(other);
        dx.hypot(dy)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Axis-aligned rectangle in canvas units. Rotation, when relevant, is applied
/// around the rectangle's centre.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle of `size` whose centre sits on `center`
    pub fn centered_on(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Edges are inclusive so a pointer exactly on the border still hits
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Hit test against this rectangle rotated by `degrees` around its centre
    pub fn contains_rotated(&self, point: Point, degrees: f64) -> bool {
        let local = rotate_point(point, self.center(), -degrees);
        self.contains(local)
    }

    /// Position of a corner after rotating the rectangle around its centre.
    ///
    /// Selection handles use this so they follow the rotated box instead of its
    /// axis-aligned bounds.
    pub fn corner(&self, corner: Corner, degrees: f64) -> Point {
        let (sx, sy) = corner.signs();
        let center = self.center();
        let unrotated = center.offset(sx * self.width / 2.0, sy * self.height / 2.0);
        rotate_point(unrotated, center, degrees)
    }

    /// Axis-aligned bounds of this rectangle once rotated around its centre
    pub fn rotated_bounds(&self, degrees: f64) -> Rect {
        let size = bounding_box_after_rotation(self.width, self.height, degrees);
        Rect::centered_on(self.center(), size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Unit direction from the centre towards this corner
    pub fn signs(self) -> (f64, f64) {
        match self {
            Corner::TopLeft => (-1.0, -1.0),
            Corner::TopRight => (1.0, -1.0),
            Corner::BottomLeft => (-1.0, 1.0),
            Corner::BottomRight => (1.0, 1.0),
        }
    }

    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }
}

/// Percentage-based frame that exposes a crop window inside a fixed-size box.
///
/// `display_*` is how large the full source image must be drawn relative to
/// the box, `offset_*` how far it is shifted. `image_rect` is the same frame in
/// container units, relative to the container's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CropFrame {
    pub display_width: f64,
    pub display_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub image_rect: Rect,
}

/// Map a pointer position to canvas space: `(pointer - origin) / zoom`.
///
/// A zoom of zero, below zero or not finite is a caller bug and is rejected.
pub fn screen_to_canvas(pointer: Point, origin: Point, zoom: f64) -> Result<Point, EditorError> {
    check_zoom(zoom)?;
    Ok(Point::new(
        (pointer.x - origin.x) / zoom,
        (pointer.y - origin.y) / zoom,
    ))
}

/// Inverse of [`screen_to_canvas`]
pub fn canvas_to_screen(canvas: Point, origin: Point, zoom: f64) -> Result<Point, EditorError> {
    check_zoom(zoom)?;
    Ok(Point::new(
        canvas.x * zoom + origin.x,
        canvas.y * zoom + origin.y,
    ))
}

fn check_zoom(zoom: f64) -> Result<(), EditorError> {
    if zoom.is_finite() && zoom > 0.0 {
        Ok(())
    } else {
        Err(EditorError::invalid(format!(
            "zoom must be a positive number, got {zoom}"
        )))
    }
}

/// Compute how the full source image has to be scaled and shifted so that
/// exactly the crop window fills a box of `container` size.
pub fn resolve_crop_frame(crop: &CropWindow, container: Size) -> CropFrame {
    let display_width = 100.0 / crop.width;
    let display_height = 100.0 / crop.height;
    let offset_x = -(crop.x / crop.width) * 100.0;
    let offset_y = -(crop.y / crop.height) * 100.0;

    CropFrame {
        display_width,
        display_height,
        offset_x,
        offset_y,
        image_rect: Rect::new(
            container.width * offset_x / 100.0,
            container.height * offset_y / 100.0,
            container.width * display_width / 100.0,
            container.height * display_height / 100.0,
        ),
    }
}

/// Size of the axis-aligned box that encloses a `width` x `height` rectangle
/// rotated by `degrees`.
pub fn bounding_box_after_rotation(width: f64, height: f64, degrees: f64) -> Size {
    let radians = degrees.to_radians();
    let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
    Size::new(width * cos + height * sin, width * sin + height * cos)
}

/// Rotate `point` around `center`. Positive angles turn clockwise on a y-down
/// surface, matching how layers are rotated on the canvas.
pub fn rotate_point(point: Point, center: Point, degrees: f64) -> Point {
    let radians = degrees.to_radians();
    let (sin, cos) = radians.sin_cos();
    let (dx, dy) = center.delta_to(point);
    Point::new(
        center.x + dx * cos - dy * sin,
        center.y + dx * sin + dy * cos,
    )
}

/// Angle of `point` as seen from `center`, in degrees
pub fn angle_between(center: Point, point: Point) -> f64 {
    let (dx, dy) = center.delta_to(point);
    dy.atan2(dx).to_degrees()
}

/// Fold any angle into `[0, 360)`
pub fn normalize_degrees(degrees: f64) -> f64 {
    let folded = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if folded >= 360.0 { 0.0 } else { folded }
}

/// Snap `value` to the nearest multiple of `step` (no-op for non-positive steps)
pub fn snap(value: f64, step: f64) -> f64 {
    if step > 0.0 {
        (value / step).round() * step
    } else {
        value
    }
}
