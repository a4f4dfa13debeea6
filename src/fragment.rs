use std::rc::Rc;

use image::RgbaImage;

use crate::geom::{Point, Rect, Size};

/// Immutable snapshot of one presentation state: the rasterized image plus
/// the element's global offset and logical size at capture time. Staleness
/// is handled by replacing the whole value, never by editing it.
#[derive(Clone, Debug)]
pub struct Fragment {
    image: Rc<RgbaImage>,
    offset: Point,
    size: Size,
}

impl Fragment {
    pub fn new(image: Rc<RgbaImage>, offset: Point, size: Size) -> Self {
        Self {
            image,
            offset,
            size,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn share_image(&self) -> Rc<RgbaImage> {
        Rc::clone(&self.image)
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.offset, self.size)
    }

    /// True when both fragments share the same captured bitmap.
    pub fn same_image(&self, other: &Fragment) -> bool {
        Rc::ptr_eq(&self.image, &other.image)
    }
}
