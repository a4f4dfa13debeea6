use std::rc::Rc;

use crate::capture::CaptureService;
use crate::controller::TransitionController;
use crate::error::SnapResult;
use crate::host::{ElementHandle, FrameScheduler, ModalPresenter};
use crate::route::TransitionRoute;
use crate::style::SnapConfig;

/// One transition-capable element, wired up: the closed-state handle, its
/// controller, and the host services needed to present an overlay. Created
/// once per logical element and reused across open/close cycles; the host
/// builds the closed content itself and calls [`open`](Self::open) from
/// its tap trigger.
pub struct SnapTransition {
    controller: Rc<TransitionController>,
    config: SnapConfig,
    presenter: Rc<dyn ModalPresenter>,
}

impl SnapTransition {
    pub fn new(
        closed_handle: Rc<dyn ElementHandle>,
        config: SnapConfig,
        presenter: Rc<dyn ModalPresenter>,
        scheduler: Rc<dyn FrameScheduler>,
        capture: CaptureService,
    ) -> SnapResult<Self> {
        config.style.validate()?;
        Ok(Self {
            controller: Rc::new(TransitionController::new(closed_handle, capture, scheduler)),
            config,
            presenter,
        })
    }

    pub fn controller(&self) -> &Rc<TransitionController> {
        &self.controller
    }

    /// The open trigger: captures the closed state (a `NotMounted` failure
    /// surfaces here, before anything is presented), then presents a fresh
    /// route for this cycle. The host drives the returned route's
    /// animation.
    pub fn open(&self) -> SnapResult<Rc<TransitionRoute>> {
        self.controller.capture_from()?;
        let route = TransitionRoute::new(Rc::clone(&self.controller), self.config.clone());
        self.presenter.present(Rc::clone(&route))?;
        Ok(route)
    }

    /// Marks the underlying controller dead when the host discards the
    /// element; pending captures are discarded instead of applied.
    pub fn dispose(&self) {
        self.controller.dispose();
    }
}
