use image::RgbaImage;
use image::imageops::FilterType;

use crate::compose::OverlayFrame;
use crate::error::{SnapError, SnapResult};
use crate::fragment::Fragment;
use crate::style::ShuttleBlend;

pub type PremulRgba8 = [u8; 4];

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Composites `src` over `dst` at `origin` (pixels, may be negative) with
/// the given opacity, clipped to the destination.
pub fn blit_over(dst: &mut RgbaImage, src: &RgbaImage, origin: (i64, i64), opacity: f32) {
    if opacity <= 0.0 {
        return;
    }

    let (dw, dh) = dst.dimensions();
    for sy in 0..src.height() {
        let dy = origin.1 + i64::from(sy);
        if dy < 0 || dy >= i64::from(dh) {
            continue;
        }
        for sx in 0..src.width() {
            let dx = origin.0 + i64::from(sx);
            if dx < 0 || dx >= i64::from(dw) {
                continue;
            }
            let s = src.get_pixel(sx, sy).0;
            let d = dst.get_pixel(dx as u32, dy as u32).0;
            dst.put_pixel(dx as u32, dy as u32, image::Rgba(over(d, s, opacity)));
        }
    }
}

/// Rasterizes the in-flight shuttle of `frame` at the given pixel density:
/// each snapshot scaled to its fitted rect and composited at its crossfade
/// opacity, "from" underneath "to". Returns `Ok(None)` when the frame's
/// image layer is suppressed. A caller-supplied blend replaces the default
/// crossfade and is stretched over the whole surface.
pub fn render_shuttle(
    frame: &OverlayFrame,
    from: &Fragment,
    to: Option<&Fragment>,
    pixel_density: f64,
    blend: Option<&ShuttleBlend>,
) -> SnapResult<Option<RgbaImage>> {
    let Some(shuttle) = &frame.shuttle else {
        return Ok(None);
    };
    if !pixel_density.is_finite() || pixel_density <= 0.0 {
        return Err(SnapError::validation("pixel density must be finite and > 0"));
    }

    let bounds = frame.surface.bounds;
    let width = ((bounds.width() * pixel_density).round() as i64).max(1) as u32;
    let height = ((bounds.height() * pixel_density).round() as i64).max(1) as u32;
    let mut out = RgbaImage::new(width, height);

    let to = to.unwrap_or(from);

    if let Some(blend) = blend {
        let blended = blend(shuttle.progress, from.image(), to.image());
        draw_scaled_at(&mut out, &blended, (0, 0, width, height), 1.0);
        return Ok(Some(out));
    }

    let px = |rect: crate::geom::Rect| {
        let x = ((rect.x0 - bounds.x0) * pixel_density).round() as i64;
        let y = ((rect.y0 - bounds.y0) * pixel_density).round() as i64;
        let w = (rect.width() * pixel_density).round().max(0.0) as u32;
        let h = (rect.height() * pixel_density).round().max(0.0) as u32;
        (x, y, w, h)
    };

    let (fx, fy, fw, fh) = px(shuttle.from_rect);
    draw_scaled_at(&mut out, from.image(), (fx, fy, fw, fh), shuttle.from_opacity);

    let (tx, ty, tw, th) = px(shuttle.to_rect);
    draw_scaled_at(&mut out, to.image(), (tx, ty, tw, th), shuttle.to_opacity);

    Ok(Some(out))
}

fn draw_scaled_at(dst: &mut RgbaImage, src: &RgbaImage, rect: (i64, i64, u32, u32), opacity: f32) {
    let (x, y, w, h) = rect;
    if w == 0 || h == 0 || opacity <= 0.0 {
        return;
    }
    if src.dimensions() == (w, h) {
        blit_over(dst, src, (x, y), opacity);
    } else {
        let scaled = image::imageops::resize(src, w, h, FilterType::Triangle);
        blit_over(dst, &scaled, (x, y), opacity);
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}
