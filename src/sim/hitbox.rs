//! Collision boxes bound to entity sprites
//!
//! A hit box is the sprite rectangle shrunk by `hitbox_scale` and kept
//! centered on the sprite, so contacts feel a little forgiving.

use glam::Vec2;

use crate::math::distance;

/// Axis-aligned collision rectangle derived from a sprite
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HitBox {
    /// Top-left corner
    pub x: f32,
    pub y: f32,
    /// Scaled (collidable) size
    pub width: f32,
    pub height: f32,
    /// Unscaled sprite size the box is inset from
    orig_width: f32,
    orig_height: f32,
}

impl HitBox {
    /// Build a box for a sprite of `sprite_size`, shrunk by `scale`,
    /// centered on `center`
    pub fn new(sprite_size: Vec2, scale: f32, center: Vec2) -> Self {
        let mut hitbox = Self {
            x: 0.0,
            y: 0.0,
            width: sprite_size.x * scale,
            height: sprite_size.y * scale,
            orig_width: sprite_size.x,
            orig_height: sprite_size.y,
        };
        hitbox.translate(center);
        hitbox
    }

    /// Re-center the box on a sprite's visual center
    pub fn translate(&mut self, center: Vec2) {
        let sprite_left = center.x - self.orig_width * 0.5;
        let sprite_top = center.y - self.orig_height * 0.5;
        self.x = sprite_left + (self.orig_width - self.width) * 0.5;
        self.y = sprite_top + (self.orig_height - self.height) * 0.5;
    }

    #[inline]
    pub fn half_size(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y) + self.half_size()
    }

    /// Cheap overlap test used in play.
    ///
    /// Reports contact when the distance between centers is within the
    /// combined half-widths AND the combined half-heights. This is not a
    /// separating-axis test: it misses some corner overlaps and accepts some
    /// near misses, and gameplay is tuned around exactly that.
    pub fn collides(&self, other: &HitBox) -> bool {
        let a = self.half_size();
        let b = other.half_size();
        let d = distance(self.center(), other.center());
        d <= a.x + b.x && d <= a.y + b.y
    }

    /// Exact rectangle overlap (edges touching counts)
    pub fn aabb_collides(&self, other: &HitBox) -> bool {
        self.x + self.width >= other.x
            && self.x <= other.x + other.width
            && self.y + self.height >= other.y
            && self.y <= other.y + other.height
    }
}

/// Anything that can take part in a collision test
pub trait HasHitBox {
    fn hitbox(&self) -> &HitBox;

    fn collides_with<T: HasHitBox + ?Sized>(&self, other: &T) -> bool {
        self.hitbox().collides(other.hitbox())
    }
}

impl HasHitBox for HitBox {
    fn hitbox(&self) -> &HitBox {
        self
    }
}
