use std::fmt;
use std::rc::Rc;

use image::RgbaImage;

use crate::ease::Ease;
use crate::error::{SnapError, SnapResult};
use crate::geom::{Alignment, Fit, Rgba8, Shape};
use crate::host::ElementHandle;

/// Static style parameters of one transition: the closed-state endpoint,
/// the opened-state endpoint, and the curve that carries the overlay
/// between them. Everything here is data; callbacks live on
/// [`SnapConfig`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitionStyle {
    pub closed_color: Rgba8,
    pub opened_color: Rgba8,
    pub closed_shape: Shape,
    pub opened_shape: Shape,
    pub closed_elevation: f64,
    pub opened_elevation: f64,
    pub closed_fit: Fit,
    pub opened_fit: Fit,
    pub closed_alignment: Alignment,
    pub opened_alignment: Alignment,
    pub transition_duration_ms: u64,
    pub curve: Ease,
}

impl Default for TransitionStyle {
    fn default() -> Self {
        Self {
            closed_color: Rgba8::WHITE,
            opened_color: Rgba8::WHITE,
            closed_shape: Shape::uniform(4.0),
            opened_shape: Shape::rect(),
            closed_elevation: 1.0,
            opened_elevation: 4.0,
            closed_fit: Fit::Fill,
            opened_fit: Fit::Fill,
            closed_alignment: Alignment::CENTER,
            opened_alignment: Alignment::CENTER,
            transition_duration_ms: 300,
            curve: Ease::default(),
        }
    }
}

impl TransitionStyle {
    pub fn validate(&self) -> SnapResult<()> {
        self.closed_shape.validate()?;
        self.opened_shape.validate()?;
        self.closed_alignment.validate()?;
        self.opened_alignment.validate()?;

        for e in [self.closed_elevation, self.opened_elevation] {
            if !e.is_finite() || e < 0.0 {
                return Err(SnapError::validation(
                    "elevations must be finite and >= 0",
                ));
            }
        }
        if self.transition_duration_ms == 0 {
            return Err(SnapError::validation("transition duration must be > 0 ms"));
        }
        Ok(())
    }
}

/// Replacement for the default linear crossfade: given the eased progress
/// and both raw snapshot images, produce the in-flight shuttle image. The
/// result is stretched over the full interpolated surface.
pub type ShuttleBlend = dyn Fn(f64, &RgbaImage, &RgbaImage) -> RgbaImage;

/// Factory for the opened-content element, invoked when the overlay route
/// installs. The closed-state counterpart lives on the host side: the host
/// builds the closed content and wires its tap trigger to
/// [`crate::transition::SnapTransition::open`].
pub type OpenedBuilder = dyn Fn() -> Rc<dyn ElementHandle>;

/// Full configuration of one transition-capable element: serializable
/// style plus the host callbacks.
pub struct SnapConfig {
    pub style: TransitionStyle,
    pub opened_builder: Rc<OpenedBuilder>,
    pub shuttle_blend: Option<Rc<ShuttleBlend>>,
    pub on_closed: Option<Rc<dyn Fn(Option<serde_json::Value>)>>,
}

impl SnapConfig {
    pub fn new(opened_builder: Rc<OpenedBuilder>) -> Self {
        Self {
            style: TransitionStyle::default(),
            opened_builder,
            shuttle_blend: None,
            on_closed: None,
        }
    }

    pub fn with_style(mut self, style: TransitionStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_shuttle_blend(mut self, blend: Rc<ShuttleBlend>) -> Self {
        self.shuttle_blend = Some(blend);
        self
    }

    pub fn with_on_closed(mut self, on_closed: Rc<dyn Fn(Option<serde_json::Value>)>) -> Self {
        self.on_closed = Some(on_closed);
        self
    }
}

impl Clone for SnapConfig {
    fn clone(&self) -> Self {
        Self {
            style: self.style.clone(),
            opened_builder: Rc::clone(&self.opened_builder),
            shuttle_blend: self.shuttle_blend.clone(),
            on_closed: self.on_closed.clone(),
        }
    }
}

impl fmt::Debug for SnapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapConfig")
            .field("style", &self.style)
            .field("shuttle_blend", &self.shuttle_blend.is_some())
            .field("on_closed", &self.on_closed.is_some())
            .finish()
    }
}
