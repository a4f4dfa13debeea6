//! Fake host for integration tests: recording element handles, a manually
//! pumped frame scheduler, and a presenter that drives the route's pop
//! protocol the way a navigation stack would.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use image::RgbaImage;
use snapmorph::{
    AnimationStatus, ElementHandle, FrameCallback, FrameScheduler, ModalPresenter, Point,
    SnapResult, Size, TransitionRoute,
};

struct ElementState {
    mounted: bool,
    laid_out: bool,
    offset: Point,
    size: Size,
    color: [u8; 4],
    renders: u32,
}

/// A live on-screen element: solid-colored, repositionable, recording how
/// often it was rasterized.
pub struct TestElement {
    state: RefCell<ElementState>,
}

impl TestElement {
    pub fn new(offset: Point, size: Size, color: [u8; 4]) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(ElementState {
                mounted: true,
                laid_out: true,
                offset,
                size,
                color,
                renders: 0,
            }),
        })
    }

    /// Mutates the live content, as user interaction would.
    pub fn set_color(&self, color: [u8; 4]) {
        self.state.borrow_mut().color = color;
    }

    pub fn color(&self) -> [u8; 4] {
        self.state.borrow().color
    }

    pub fn unmount(&self) {
        self.state.borrow_mut().mounted = false;
    }

    pub fn render_count(&self) -> u32 {
        self.state.borrow().renders
    }
}

impl ElementHandle for TestElement {
    fn is_mounted(&self) -> bool {
        self.state.borrow().mounted
    }

    fn has_layout(&self) -> bool {
        self.state.borrow().laid_out
    }

    fn global_geometry(&self) -> SnapResult<(Point, Size)> {
        let state = self.state.borrow();
        Ok((state.offset, state.size))
    }

    fn render_to_image(&self, pixel_density: f64) -> SnapResult<RgbaImage> {
        let mut state = self.state.borrow_mut();
        state.renders += 1;
        let w = (state.size.width * pixel_density).round() as u32;
        let h = (state.size.height * pixel_density).round() as u32;
        Ok(RgbaImage::from_pixel(w, h, image::Rgba(state.color)))
    }
}

/// Post-frame callbacks held until the test pumps a frame boundary.
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<VecDeque<FrameCallback>>,
}

impl ManualScheduler {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Runs everything scheduled before this frame settled.
    pub fn pump_frame(&self) {
        let mut due: Vec<FrameCallback> = self.queue.borrow_mut().drain(..).collect();
        for cb in due.drain(..) {
            cb();
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl FrameScheduler for ManualScheduler {
    fn post_frame(&self, callback: FrameCallback) {
        self.queue.borrow_mut().push_back(callback);
    }
}

/// Minimal navigation stack: presents one route, relays pop requests
/// through the route's intercept, and reports animation status changes the
/// way a host animation driver would.
#[derive(Default)]
pub struct TestPresenter {
    route: RefCell<Option<Rc<TransitionRoute>>>,
    self_ref: RefCell<Weak<TestPresenter>>,
}

impl TestPresenter {
    pub fn new() -> Rc<Self> {
        let presenter = Rc::new(Self::default());
        *presenter.self_ref.borrow_mut() = Rc::downgrade(&presenter);
        presenter
    }

    pub fn current_route(&self) -> Option<Rc<TransitionRoute>> {
        self.route.borrow().clone()
    }

    /// Forward animation runs to completion in one step.
    pub fn settle_open(&self) {
        if let Some(route) = self.current_route() {
            route.on_animation_status_changed(AnimationStatus::Completed);
        }
    }

    /// User-initiated dismiss. Returns true when the pop proceeded
    /// synchronously (reverse animation started), false when the route
    /// intercepted it pending a re-capture.
    pub fn request_pop(&self) -> bool {
        let Some(route) = self.current_route() else {
            return false;
        };
        let proceed = route.on_pop_intercept();
        if proceed {
            route.on_animation_status_changed(AnimationStatus::Receding);
        }
        proceed
    }

    /// Reverse animation reached progress 0; the route leaves the stack.
    pub fn finish_dismiss(&self) {
        if let Some(route) = self.route.borrow_mut().take() {
            route.on_animation_status_changed(AnimationStatus::Dismissed);
        }
    }
}

impl ModalPresenter for TestPresenter {
    fn present(&self, route: Rc<TransitionRoute>) -> SnapResult<()> {
        *self.route.borrow_mut() = Some(Rc::clone(&route));

        let weak = self.self_ref.borrow().clone();
        let install = route.on_install(Rc::new(move || {
            // The deferred pop re-enters the normal pop path.
            if let Some(presenter) = weak.upgrade() {
                presenter.request_pop();
            }
        }));
        if install.is_err() {
            self.route.borrow_mut().take();
        }
        install
    }
}
