//! Host scene-graph node interface and a minimal sprite implementation.

use crate::render::{Bitmap, Point};

/// The scene node a button draws into.
pub trait HostNode {
    /// Replace the node's visual.
    fn set_displayed_bitmap(&mut self, bitmap: &Bitmap);

    /// Node position in its parent's coordinate space.
    fn position(&self) -> Point;

    /// Hit test for a point in the parent's coordinate space.
    fn contains(&self, point: Point) -> bool;
}

/// A sprite node with an anchor point.
///
/// The node takes its size from the first bitmap it displays and keeps it:
/// later bitmaps of a different size are stretched by the host, so the hit
/// area does not change when the button switches state.
#[derive(Debug, Clone)]
pub struct SpriteNode {
    pub position: Point,
    /// Anchor in unit coordinates; `(0.5, 0.5)` centers the sprite.
    pub anchor: (f32, f32),
    size: Option<(f32, f32)>,
    displayed: Option<Bitmap>,
}

impl Default for SpriteNode {
    fn default() -> Self {
        Self::new(Point::default())
    }
}

impl SpriteNode {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            anchor: (0.5, 0.5),
            size: None,
            displayed: None,
        }
    }

    pub fn at(x: f32, y: f32) -> Self {
        Self::new(Point::new(x, y))
    }

    pub fn size(&self) -> Option<(f32, f32)> {
        self.size
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.size = Some((width, height));
    }

    /// The bitmap currently shown.
    pub fn displayed(&self) -> Option<&Bitmap> {
        self.displayed.as_ref()
    }
}

impl HostNode for SpriteNode {
    fn set_displayed_bitmap(&mut self, bitmap: &Bitmap) {
        if self.size.is_none() {
            self.size = Some((bitmap.width() as f32, bitmap.height() as f32));
        }
        self.displayed = Some(bitmap.clone());
    }

    fn position(&self) -> Point {
        self.position
    }

    fn contains(&self, point: Point) -> bool {
        let Some((w, h)) = self.size else {
            return false;
        };
        let min_x = self.position.x - w * self.anchor.0;
        let min_y = self.position.y - h * self.anchor.1;
        point.x >= min_x && point.x < min_x + w && point.y >= min_y && point.y < min_y + h
    }
}
