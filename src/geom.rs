use crate::error::{SnapError, SnapResult};

pub use kurbo::{Point, Rect, Size, Vec2};

fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    // Endpoint snapping keeps p=0 / p=1 frames bit-exact.
    if t <= 0.0 {
        a
    } else if t >= 1.0 {
        b
    } else {
        a + (b - a) * t
    }
}

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        lerp_f64(*a, *b, t)
    }
}

impl Lerp for f32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        lerp_f64(f64::from(*a), f64::from(*b), t) as f32
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Point::new(lerp_f64(a.x, b.x, t), lerp_f64(a.y, b.y, t))
    }
}

impl Lerp for Size {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Size::new(
            lerp_f64(a.width, b.width, t),
            lerp_f64(a.height, b.height, t),
        )
    }
}

impl Lerp for Rect {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Rect::new(
            lerp_f64(a.x0, b.x0, t),
            lerp_f64(a.y0, b.y0, t),
            lerp_f64(a.x1, b.x1, t),
            lerp_f64(a.y1, b.y1, t),
        )
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };

    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Lerp for Rgba8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            lerp_f64(f64::from(a), f64::from(b), t)
                .round()
                .clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }
}

/// Rounded-rectangle outline, one radius per corner.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Shape {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
}

impl Shape {
    pub fn uniform(radius: f64) -> Self {
        Self {
            top_left: radius,
            top_right: radius,
            bottom_right: radius,
            bottom_left: radius,
        }
    }

    pub fn rect() -> Self {
        Self::uniform(0.0)
    }

    pub fn to_rounded_rect(self, bounds: Rect) -> kurbo::RoundedRect {
        bounds.to_rounded_rect(kurbo::RoundedRectRadii::new(
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ))
    }

    pub fn validate(&self) -> SnapResult<()> {
        for r in [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ] {
            if !r.is_finite() || r < 0.0 {
                return Err(SnapError::validation(
                    "shape corner radii must be finite and >= 0",
                ));
            }
        }
        Ok(())
    }
}

impl Lerp for Shape {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            top_left: lerp_f64(a.top_left, b.top_left, t),
            top_right: lerp_f64(a.top_right, b.top_right, t),
            bottom_right: lerp_f64(a.bottom_right, b.bottom_right, t),
            bottom_left: lerp_f64(a.bottom_left, b.bottom_left, t),
        }
    }
}

/// Placement of a fitted child inside its bounds; components in [-1, 1]
/// where (-1,-1) is top-left and (1,1) is bottom-right.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Alignment {
    pub x: f64,
    pub y: f64,
}

impl Alignment {
    pub const TOP_LEFT: Self = Self { x: -1.0, y: -1.0 };
    pub const TOP_CENTER: Self = Self { x: 0.0, y: -1.0 };
    pub const TOP_RIGHT: Self = Self { x: 1.0, y: -1.0 };
    pub const CENTER_LEFT: Self = Self { x: -1.0, y: 0.0 };
    pub const CENTER: Self = Self { x: 0.0, y: 0.0 };
    pub const CENTER_RIGHT: Self = Self { x: 1.0, y: 0.0 };
    pub const BOTTOM_LEFT: Self = Self { x: -1.0, y: 1.0 };
    pub const BOTTOM_CENTER: Self = Self { x: 0.0, y: 1.0 };
    pub const BOTTOM_RIGHT: Self = Self { x: 1.0, y: 1.0 };

    pub fn validate(&self) -> SnapResult<()> {
        if !(-1.0..=1.0).contains(&self.x) || !(-1.0..=1.0).contains(&self.y) {
            return Err(SnapError::validation(
                "alignment components must be in [-1, 1]",
            ));
        }
        Ok(())
    }
}

/// How a snapshot image is scaled into the interpolated surface bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Fit {
    Fill,
    Contain,
    Cover,
    ScaleDown,
    None,
}

pub fn fit_rect(fit: Fit, alignment: Alignment, child: Size, bounds: Rect) -> Rect {
    if child.width <= 0.0 || child.height <= 0.0 {
        return Rect::from_origin_size(bounds.origin(), Size::ZERO);
    }

    let fitted = match fit {
        Fit::Fill => bounds.size(),
        Fit::Contain | Fit::Cover | Fit::ScaleDown => {
            let sx = bounds.width() / child.width;
            let sy = bounds.height() / child.height;
            let s = match fit {
                Fit::Contain => sx.min(sy),
                Fit::Cover => sx.max(sy),
                _ => sx.min(sy).min(1.0),
            };
            Size::new(child.width * s, child.height * s)
        }
        Fit::None => child,
    };

    let x0 = bounds.x0 + (alignment.x + 1.0) / 2.0 * (bounds.width() - fitted.width);
    let y0 = bounds.y0 + (alignment.y + 1.0) / 2.0 * (bounds.height() - fitted.height);
    Rect::from_origin_size(Point::new(x0, y0), fitted)
}
