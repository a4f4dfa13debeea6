use std::cell::RefCell;
use std::rc::Rc;

use crate::capture::CaptureService;
use crate::error::{SnapError, SnapResult};
use crate::fragment::Fragment;
use crate::host::{ElementHandle, FrameCallback, FrameScheduler};
use crate::observable::Observable;

/// Overlay lifecycle as seen by the closed-state host: while `Active` the
/// closed subtree stays mounted but hidden, while `Idle` it paints normally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionStatus {
    Idle,
    Active,
}

struct ControllerState {
    from_handle: Rc<dyn ElementHandle>,
    to_handle: Option<Rc<dyn ElementHandle>>,
    from_fragment: Option<Fragment>,
    to_fragment: Option<Fragment>,
    alive: bool,
}

/// Owns the two fragment slots of one transition-capable element and the
/// observable status the closed-state host subscribes to. One controller
/// per logical element; it outlives each overlay route across repeated
/// open/close cycles. All access is serialized through the host's
/// single-threaded render loop; the fragment slots are written only by
/// capture continuations and read only by the per-frame compositor.
pub struct TransitionController {
    state: Rc<RefCell<ControllerState>>,
    status: Observable<TransitionStatus>,
    capture: CaptureService,
    scheduler: Rc<dyn FrameScheduler>,
}

impl TransitionController {
    pub fn new(
        from_handle: Rc<dyn ElementHandle>,
        capture: CaptureService,
        scheduler: Rc<dyn FrameScheduler>,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(ControllerState {
                from_handle,
                to_handle: None,
                from_fragment: None,
                to_fragment: None,
                alive: true,
            })),
            status: Observable::new(TransitionStatus::Idle),
            capture,
            scheduler,
        }
    }

    /// Shared handle to the observable status.
    pub fn status(&self) -> Observable<TransitionStatus> {
        self.status.clone()
    }

    pub fn set_status(&self, status: TransitionStatus) {
        self.status.set(status);
    }

    /// Captures the closed-state element into the "from" slot. Must
    /// succeed before the overlay is presented; the closed subtree already
    /// has a settled frame when the open trigger runs, so this samples the
    /// latest completed paint directly.
    pub fn capture_from(&self) -> SnapResult<()> {
        let handle = Rc::clone(&self.state.borrow().from_handle);
        let fragment = self.capture.capture(handle.as_ref())?;
        self.state.borrow_mut().from_fragment = Some(fragment);
        Ok(())
    }

    /// Registers the opened-content element once the overlay has mounted
    /// it. Required before any "to" capture can succeed.
    pub fn register_opened_handle(&self, handle: Rc<dyn ElementHandle>) {
        self.state.borrow_mut().to_handle = Some(handle);
    }

    /// Captures the opened content into the "to" slot after the current
    /// frame settles, then runs `then`. A capture completing against a
    /// disposed controller is discarded (`then` is dropped with it). A
    /// failed capture is swallowed with a warning and the previous
    /// fragment, possibly none, stays in place — `then` still runs, so a
    /// dismiss waiting on this capture is never blocked.
    pub fn capture_to_deferred(&self, then: FrameCallback) {
        let weak = Rc::downgrade(&self.state);
        let capture = self.capture;
        self.scheduler.post_frame(Box::new(move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            if !state.borrow().alive {
                return;
            }

            // Capture outside the borrow: the host may re-enter while
            // rasterizing.
            let handle = state.borrow().to_handle.clone();
            match handle {
                Some(handle) => match capture.capture(handle.as_ref()) {
                    Ok(fragment) => {
                        state.borrow_mut().to_fragment = Some(fragment);
                    }
                    Err(err) => {
                        tracing::warn!(%err, "opened-content capture failed, keeping previous fragment");
                    }
                },
                None => {
                    tracing::warn!("no opened-content handle registered, keeping previous fragment");
                }
            }
            then();
        }));
    }

    pub fn from_fragment(&self) -> Option<Fragment> {
        self.state.borrow().from_fragment.clone()
    }

    pub fn to_fragment(&self) -> Option<Fragment> {
        self.state.borrow().to_fragment.clone()
    }

    /// The "from" fragment, or an error when the overlay is about to be
    /// driven without one.
    pub fn require_from_fragment(&self) -> SnapResult<Fragment> {
        self.from_fragment().ok_or_else(|| {
            SnapError::precondition("overlay presented before a successful closed-state capture")
        })
    }

    /// The "to" fragment is valid for one open/close cycle only.
    pub fn clear_to_fragment(&self) {
        self.state.borrow_mut().to_fragment = None;
    }

    /// Marks the controller dead. Pending capture continuations check this
    /// before applying their result, so a capture racing element teardown
    /// is discarded instead of resurrecting state.
    pub fn dispose(&self) {
        self.state.borrow_mut().alive = false;
    }

    pub fn is_alive(&self) -> bool {
        self.state.borrow().alive
    }
}
