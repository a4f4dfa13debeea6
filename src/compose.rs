use crate::fragment::Fragment;
use crate::geom::{Lerp, Rect, Rgba8, Shape, fit_rect};
use crate::style::TransitionStyle;

/// Interpolated styled surface the overlay paints at one progress value.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceSpec {
    pub bounds: Rect,
    pub color: Rgba8,
    pub shape: Shape,
    pub elevation: f64,
}

/// Crossfade layer between the two snapshots while in flight. Rects are in
/// global logical coordinates, opacities already clamped to [0, 1].
#[derive(Clone, Debug, PartialEq)]
pub struct ShuttleSpec {
    pub progress: f64,
    pub from_rect: Rect,
    pub to_rect: Rect,
    pub from_opacity: f32,
    pub to_opacity: f32,
}

/// Complete paint description of one overlay frame. `shuttle` is `None`
/// exactly when the image layer must not paint (settled fully open, live
/// content handed off).
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayFrame {
    pub surface: SurfaceSpec,
    pub shuttle: Option<ShuttleSpec>,
    pub live_content_visible: bool,
}

/// Pure per-frame compositor: interpolates geometry and style between the
/// two fragments at eased progress `t` and decides which layers paint.
/// When no "to" fragment exists yet (dismissed mid-entry), the "from"
/// fragment stands in for both endpoints so every tween still resolves.
pub fn compose_frame(
    t: f64,
    from: &Fragment,
    to: Option<&Fragment>,
    style: &TransitionStyle,
    gate_open: bool,
) -> OverlayFrame {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 1.0 };
    let to = to.unwrap_or(from);

    let bounds = Lerp::lerp(&from.bounds(), &to.bounds(), t);
    let surface = SurfaceSpec {
        bounds,
        color: Lerp::lerp(&style.closed_color, &style.opened_color, t),
        shape: Lerp::lerp(&style.closed_shape, &style.opened_shape, t),
        elevation: Lerp::lerp(&style.closed_elevation, &style.opened_elevation, t),
    };

    // At full open the image layer hands off to live content and must not
    // paint on top of it. While exiting the gate is already closed, so the
    // image keeps painting even at t == 1 to avoid a blank frame.
    let shuttle = if t >= 1.0 && gate_open {
        None
    } else {
        Some(ShuttleSpec {
            progress: t,
            from_rect: fit_rect(style.closed_fit, style.closed_alignment, from.size(), bounds),
            to_rect: fit_rect(style.opened_fit, style.opened_alignment, to.size(), bounds),
            from_opacity: (1.0 - t).clamp(0.0, 1.0) as f32,
            to_opacity: t.clamp(0.0, 1.0) as f32,
        })
    };

    OverlayFrame {
        surface,
        shuttle,
        live_content_visible: gate_open,
    }
}
