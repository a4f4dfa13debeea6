use std::cell::Cell;
use std::rc::Rc;

use crate::geom::{Point, Rect};

/// Visibility/hit-test switch for the live opened content. While closed,
/// the wrapped subtree is laid out as usual but answers "do not paint" and
/// "do not hit" — present, invisible, inert. The route flips it open
/// exactly when the forward animation settles at full progress. Clones
/// share the flag, so the route and the host-side wrapper see one value.
#[derive(Clone, Debug, Default)]
pub struct PaintGate {
    open: Rc<Cell<bool>>,
}

impl PaintGate {
    /// Starts closed: live content stays hidden until the transition
    /// settles.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_paint(&self) -> bool {
        self.open.get()
    }

    pub fn allows_hit(&self, point: Point, bounds: Rect) -> bool {
        self.open.get() && bounds.contains(point)
    }

    pub fn set_open(&self, open: bool) {
        self.open.set(open);
    }
}
