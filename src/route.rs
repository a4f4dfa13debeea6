use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use image::RgbaImage;

use crate::compose::{OverlayFrame, compose_frame};
use crate::composite::render_shuttle;
use crate::controller::{TransitionController, TransitionStatus};
use crate::error::SnapResult;
use crate::gate::PaintGate;
use crate::host::AnimationStatus;
use crate::style::SnapConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoutePhase {
    /// Progress running 0 -> 1; live content laid out but gated off.
    Entering,
    /// Progress holding at 1; live content painted and interactive.
    SettledOpen,
    /// Progress running 1 -> 0; live content gated off again.
    Exiting,
    /// Not presented (either never installed or fully dismissed).
    Closed,
}

/// The full-screen modal overlay that renders one open/close cycle. Owns
/// the phase machine, the fully-open and dismiss-intercept flags, and the
/// paint gate; borrows the controller, which outlives it across cycles.
/// The host drives it through the hooks: `on_install` at presentation,
/// `on_animation_status_changed` from its animation driver,
/// `on_pop_intercept` from its back/dismiss gesture, and `build_frame`
/// once per animation tick.
pub struct TransitionRoute {
    controller: Rc<TransitionController>,
    config: SnapConfig,
    phase: Cell<RoutePhase>,
    fully_open: Cell<bool>,
    dismiss_in_flight: Cell<bool>,
    gate: PaintGate,
    pop: RefCell<Option<Rc<dyn Fn()>>>,
    close_result: RefCell<Option<serde_json::Value>>,
    self_weak: Weak<TransitionRoute>,
}

impl TransitionRoute {
    pub fn new(controller: Rc<TransitionController>, config: SnapConfig) -> Rc<Self> {
        Rc::new_cyclic(|weak| Self {
            controller,
            config,
            phase: Cell::new(RoutePhase::Closed),
            fully_open: Cell::new(false),
            dismiss_in_flight: Cell::new(false),
            gate: PaintGate::new(),
            pop: RefCell::new(None),
            close_result: RefCell::new(None),
            self_weak: weak.clone(),
        })
    }

    pub fn controller(&self) -> &Rc<TransitionController> {
        &self.controller
    }

    pub fn phase(&self) -> RoutePhase {
        self.phase.get()
    }

    /// Shared gate for the host-side wrapper of the live opened content.
    pub fn gate(&self) -> PaintGate {
        self.gate.clone()
    }

    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.config.style.transition_duration_ms)
    }

    /// Presentation hook. `pop` is the host callback that performs the
    /// actual dismissal; the route invokes it after the forced re-capture
    /// of the intercepted dismiss path. Fails with a precondition error if
    /// no closed-state fragment was captured before presenting.
    pub fn on_install(&self, pop: Rc<dyn Fn()>) -> SnapResult<()> {
        self.controller.require_from_fragment()?;
        self.controller
            .register_opened_handle((self.config.opened_builder)());
        *self.pop.borrow_mut() = Some(pop);

        self.phase.set(RoutePhase::Entering);
        self.controller.set_status(TransitionStatus::Active);
        tracing::debug!("overlay installed, entering");
        Ok(())
    }

    pub fn on_animation_status_changed(&self, status: AnimationStatus) {
        match status {
            AnimationStatus::Advancing => {
                if self.phase.get() == RoutePhase::Closed {
                    return;
                }
                self.phase.set(RoutePhase::Entering);
            }
            AnimationStatus::Completed => {
                if self.phase.get() != RoutePhase::Entering {
                    return;
                }
                self.phase.set(RoutePhase::SettledOpen);
                self.fully_open.set(true);
                self.gate.set_open(true);
                tracing::debug!("forward animation settled, capturing opened content");
                // First settled full-screen frame: snapshot the opened
                // content so an immediate dismiss has a "to" endpoint.
                self.controller.capture_to_deferred(Box::new(|| {}));
            }
            AnimationStatus::Receding => self.begin_exit(),
            AnimationStatus::Dismissed => self.finish_closed(),
        }
    }

    /// Dismiss interception. Returns `false` to defer the pop while the
    /// final live state is re-captured; the capture continuation then
    /// triggers the real pop. Proceeds immediately when the overlay never
    /// reached fully open (the closed-state snapshot is good enough) or
    /// when the intercept is already in flight.
    pub fn on_pop_intercept(&self) -> bool {
        if self.dismiss_in_flight.get() || !self.fully_open.get() {
            self.begin_exit();
            return true;
        }

        self.dismiss_in_flight.set(true);
        let weak = self.self_weak.clone();
        self.controller.capture_to_deferred(Box::new(move || {
            // Route gone by the time the capture settles: nothing to pop.
            let Some(route) = weak.upgrade() else {
                return;
            };
            let pop = route.pop.borrow().clone();
            if let Some(pop) = pop {
                pop();
            }
        }));
        false
    }

    /// Per-tick paint description. `progress` is the host's raw animation
    /// value in [0, 1]; the style curve is applied here, time-reversed
    /// while exiting.
    pub fn build_frame(&self, progress: f64) -> SnapResult<OverlayFrame> {
        let from = self.controller.require_from_fragment()?;
        let to = self.controller.to_fragment();

        let t = match self.phase.get() {
            RoutePhase::Exiting => self.config.style.curve.apply_reversed(progress),
            _ => self.config.style.curve.apply(progress),
        };

        Ok(compose_frame(
            t,
            &from,
            to.as_ref(),
            &self.config.style,
            self.gate.should_paint(),
        ))
    }

    /// Rasterizes `frame`'s shuttle against the current fragments, with the
    /// configured blend when one was set. Returns `Ok(None)` when the image
    /// layer is suppressed.
    pub fn rasterize_shuttle(
        &self,
        frame: &OverlayFrame,
        pixel_density: f64,
    ) -> SnapResult<Option<RgbaImage>> {
        let from = self.controller.require_from_fragment()?;
        let to = self.controller.to_fragment();
        render_shuttle(
            frame,
            &from,
            to.as_ref(),
            pixel_density,
            self.config.shuttle_blend.as_deref(),
        )
    }

    /// Payload handed to `on_closed` when the cycle completes.
    pub fn set_close_result(&self, value: serde_json::Value) {
        *self.close_result.borrow_mut() = Some(value);
    }

    /// Cleanup for exits that bypass the dismiss animation (programmatic
    /// removal). Fragment lifetime is tied to overlay presence, so this
    /// performs the same teardown as a completed dismissal.
    pub fn on_removed(&self) {
        if self.phase.get() != RoutePhase::Closed {
            self.finish_closed();
        }
    }

    fn begin_exit(&self) {
        match self.phase.get() {
            RoutePhase::Closed | RoutePhase::Exiting => return,
            _ => {}
        }
        self.phase.set(RoutePhase::Exiting);
        self.gate.set_open(false);
        tracing::debug!("overlay exiting");
    }

    fn finish_closed(&self) {
        self.phase.set(RoutePhase::Closed);
        self.gate.set_open(false);
        self.fully_open.set(false);
        self.dismiss_in_flight.set(false);

        self.controller.clear_to_fragment();
        self.controller.set_status(TransitionStatus::Idle);
        tracing::debug!("overlay closed");

        let result = self.close_result.borrow_mut().take();
        if let Some(on_closed) = &self.config.on_closed {
            on_closed(result);
        }
    }
}

impl fmt::Debug for TransitionRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionRoute")
            .field("phase", &self.phase.get())
            .field("fully_open", &self.fully_open.get())
            .field("dismiss_in_flight", &self.dismiss_in_flight.get())
            .field("config", &self.config)
            .finish()
    }
}
