#![forbid(unsafe_code)]

pub mod capture;
pub mod compose;
pub mod composite;
pub mod controller;
pub mod ease;
pub mod error;
pub mod fragment;
pub mod gate;
pub mod geom;
pub mod host;
pub mod observable;
pub mod route;
pub mod style;
pub mod transition;

pub use capture::CaptureService;
pub use compose::{OverlayFrame, ShuttleSpec, SurfaceSpec, compose_frame};
pub use composite::render_shuttle;
pub use controller::{TransitionController, TransitionStatus};
pub use ease::Ease;
pub use error::{SnapError, SnapResult};
pub use fragment::Fragment;
pub use gate::PaintGate;
pub use geom::{Alignment, Fit, Lerp, Point, Rect, Rgba8, Shape, Size, Vec2};
pub use host::{AnimationStatus, ElementHandle, FrameCallback, FrameScheduler, ModalPresenter};
pub use observable::{Observable, SubscriptionId};
pub use route::{RoutePhase, TransitionRoute};
pub use style::{SnapConfig, ShuttleBlend, TransitionStyle};
pub use transition::SnapTransition;
