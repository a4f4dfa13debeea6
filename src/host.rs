//! Seam to the host UI framework. The engine never lays out, paints or
//! animates anything itself; it consumes these capabilities and is driven
//! frame-by-frame from the host's render loop. Everything here is
//! single-threaded by design (`Rc`, no `Send` bounds): all calls happen on
//! the host's UI thread, synchronized to frame boundaries.

use std::rc::Rc;

use image::RgbaImage;

use crate::error::SnapResult;
use crate::geom::{Point, Size};
use crate::route::TransitionRoute;

/// Identity of a live on-screen element: everything the capture service
/// needs to turn it into a [`crate::fragment::Fragment`].
pub trait ElementHandle {
    /// The element is currently attached to the host's tree.
    fn is_mounted(&self) -> bool;

    /// The element has completed at least one layout/paint cycle.
    fn has_layout(&self) -> bool;

    /// Global offset and logical size as of the latest completed layout.
    fn global_geometry(&self) -> SnapResult<(Point, Size)>;

    /// Rasterize the latest *completed* paint of this element at the given
    /// pixel density. Must not force a new layout or paint. The returned
    /// buffer is premultiplied RGBA8.
    fn render_to_image(&self, pixel_density: f64) -> SnapResult<RgbaImage>;
}

pub type FrameCallback = Box<dyn FnOnce()>;

/// One-shot "run after the current frame settles" scheduling. In a real
/// host binding this is the post-frame callback of the render loop; in the
/// test harness it is pumped manually.
pub trait FrameScheduler {
    fn post_frame(&self, callback: FrameCallback);
}

/// Modal presentation hook: installs the full-screen transition route and
/// starts driving its animation.
pub trait ModalPresenter {
    fn present(&self, route: Rc<TransitionRoute>) -> SnapResult<()>;
}

/// Status feed from the host's animation driver for the overlay route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationStatus {
    /// Progress is at 0 and the route has been removed.
    Dismissed,
    /// Progress is running 0 -> 1.
    Advancing,
    /// Progress reached 1 and holds there.
    Completed,
    /// Progress is running 1 -> 0.
    Receding,
}
