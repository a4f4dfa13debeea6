use std::rc::Rc;

use crate::error::{SnapError, SnapResult};
use crate::fragment::Fragment;
use crate::host::ElementHandle;

/// Produces [`Fragment`]s from live on-screen elements: measure, then
/// rasterize the latest completed paint. Observes the current frame only —
/// never forces a layout or paint pass. Sequencing relative to frame
/// settling is the caller's job (see
/// [`crate::controller::TransitionController::capture_to_deferred`]).
#[derive(Clone, Copy, Debug)]
pub struct CaptureService {
    pixel_density: f64,
}

impl Default for CaptureService {
    fn default() -> Self {
        Self { pixel_density: 1.0 }
    }
}

impl CaptureService {
    pub fn new(pixel_density: f64) -> SnapResult<Self> {
        if !pixel_density.is_finite() || pixel_density <= 0.0 {
            return Err(SnapError::validation("pixel density must be finite and > 0"));
        }
        Ok(Self { pixel_density })
    }

    pub fn pixel_density(&self) -> f64 {
        self.pixel_density
    }

    #[tracing::instrument(skip(self, handle))]
    pub fn capture(&self, handle: &dyn ElementHandle) -> SnapResult<Fragment> {
        if !handle.is_mounted() || !handle.has_layout() {
            return Err(SnapError::NotMounted);
        }

        let (offset, size) = handle.global_geometry()?;
        if size.width <= 0.0 || size.height <= 0.0 {
            return Err(SnapError::capture(format!(
                "element has degenerate size {}x{}",
                size.width, size.height
            )));
        }

        let image = handle.render_to_image(self.pixel_density)?;
        if image.width() == 0 || image.height() == 0 {
            return Err(SnapError::capture("host produced an empty bitmap"));
        }

        Ok(Fragment::new(Rc::new(image), offset, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Point, Size};
    use image::RgbaImage;
    use std::cell::Cell;

    struct FakeElement {
        mounted: bool,
        laid_out: bool,
        renders: Cell<u32>,
    }

    impl FakeElement {
        fn ready() -> Self {
            Self {
                mounted: true,
                laid_out: true,
                renders: Cell::new(0),
            }
        }
    }

    impl ElementHandle for FakeElement {
        fn is_mounted(&self) -> bool {
            self.mounted
        }

        fn has_layout(&self) -> bool {
            self.laid_out
        }

        fn global_geometry(&self) -> SnapResult<(Point, Size)> {
            Ok((Point::new(3.0, 4.0), Size::new(8.0, 6.0)))
        }

        fn render_to_image(&self, pixel_density: f64) -> SnapResult<RgbaImage> {
            self.renders.set(self.renders.get() + 1);
            let w = (8.0 * pixel_density) as u32;
            let h = (6.0 * pixel_density) as u32;
            Ok(RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255])))
        }
    }

    #[test]
    fn capture_produces_measured_fragment() {
        let svc = CaptureService::default();
        let el = FakeElement::ready();
        let frag = svc.capture(&el).unwrap();
        assert_eq!(frag.offset(), Point::new(3.0, 4.0));
        assert_eq!(frag.size(), Size::new(8.0, 6.0));
        assert_eq!(frag.image().dimensions(), (8, 6));
    }

    #[test]
    fn capture_honors_pixel_density() {
        let svc = CaptureService::new(2.0).unwrap();
        let el = FakeElement::ready();
        let frag = svc.capture(&el).unwrap();
        assert_eq!(frag.image().dimensions(), (16, 12));
        // Logical geometry is unaffected by density.
        assert_eq!(frag.size(), Size::new(8.0, 6.0));
    }

    #[test]
    fn capture_unmounted_fails_not_mounted() {
        let svc = CaptureService::default();
        let mut el = FakeElement::ready();
        el.mounted = false;
        assert!(matches!(svc.capture(&el), Err(SnapError::NotMounted)));

        let mut el = FakeElement::ready();
        el.laid_out = false;
        assert!(matches!(svc.capture(&el), Err(SnapError::NotMounted)));
        assert_eq!(el.renders.get(), 0);
    }

    #[test]
    fn capture_twice_unchanged_is_pixel_identical() {
        let svc = CaptureService::default();
        let el = FakeElement::ready();
        let a = svc.capture(&el).unwrap();
        let b = svc.capture(&el).unwrap();
        assert_eq!(a.image().as_raw(), b.image().as_raw());
    }

    #[test]
    fn invalid_density_is_rejected() {
        assert!(CaptureService::new(0.0).is_err());
        assert!(CaptureService::new(f64::NAN).is_err());
    }
}
