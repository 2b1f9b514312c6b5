//! Position/velocity state shared by every moving entity

use glam::Vec2;
use rand::Rng;

use crate::error::SimError;
use crate::math::random_int;

/// Kinematic state with validated setters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Body {
    pos: Vec2,
    vel: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2) -> Result<Self, SimError> {
        let mut body = Self::default();
        body.set_pos(pos)?;
        body.set_vel(vel)?;
        Ok(body)
    }

    /// Stationary body at a position already known to be finite
    pub fn at(pos: Vec2) -> Self {
        debug_assert!(pos.is_finite(), "spawn position must be finite");
        Self { pos, vel: Vec2::ZERO }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    pub fn set_pos(&mut self, pos: Vec2) -> Result<(), SimError> {
        self.pos = finite("position", pos)?;
        Ok(())
    }

    pub fn set_vel(&mut self, vel: Vec2) -> Result<(), SimError> {
        self.vel = finite("velocity", vel)?;
        Ok(())
    }

    /// Advance one frame: `pos += vel`
    #[inline]
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    /// Teleport to the opposite edge once `margin` beyond the field
    pub fn wrap(&mut self, field: Vec2, margin: Vec2) {
        if self.pos.x > field.x + margin.x {
            self.pos.x = -margin.x;
        } else if self.pos.x < -margin.x {
            self.pos.x = field.x + margin.x;
        }

        if self.pos.y > field.y + margin.y {
            self.pos.y = -margin.y;
        } else if self.pos.y < -margin.y {
            self.pos.y = field.y + margin.y;
        }
    }

    /// True once the position leaves `[0, field]` on either axis
    pub fn outside(&self, field: Vec2) -> bool {
        self.pos.x < 0.0 || self.pos.y < 0.0 || self.pos.x > field.x || self.pos.y > field.y
    }
}

/// Screen edge an off-screen spawn enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl SpawnSide {
    pub const ALL: [SpawnSide; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[random_int(rng, 0, 3) as usize]
    }

    /// Unit vector pointing from this edge onto the field
    pub fn inward(self) -> Vec2 {
        match self {
            Self::Top => Vec2::new(0.0, 1.0),
            Self::Right => Vec2::new(-1.0, 0.0),
            Self::Bottom => Vec2::new(0.0, -1.0),
            Self::Left => Vec2::new(1.0, 0.0),
        }
    }

    /// Point `offset` beyond this edge, `t` (0..=1) of the way along it
    pub fn edge_point(self, field: Vec2, t: f32, offset: f32) -> Vec2 {
        match self {
            Self::Top => Vec2::new(field.x * t, -offset),
            Self::Right => Vec2::new(field.x + offset, field.y * t),
            Self::Bottom => Vec2::new(field.x * t, field.y + offset),
            Self::Left => Vec2::new(-offset, field.y * t),
        }
    }
}

fn finite(what: &'static str, v: Vec2) -> Result<Vec2, SimError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(SimError::NonFinite { what, x: v.x, y: v.y })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_reject_non_finite() {
        let mut body = Body::default();
        assert!(matches!(
            body.set_pos(Vec2::new(f32::NAN, 0.0)),
            Err(SimError::NonFinite { what: "position", .. })
        ));
        assert!(body.set_vel(Vec2::new(0.0, f32::INFINITY)).is_err());
        assert_eq!(body, Body::default());
    }

    #[test]
    fn test_edge_points_sit_outside() {
        let field = Vec2::new(800.0, 600.0);
        for side in SpawnSide::ALL {
            let p = side.edge_point(field, 0.5, 30.0);
            let body = Body::new(p, Vec2::ZERO).unwrap();
            assert!(body.outside(field), "{side:?} spawn at {p} is on screen");
            // Stepping inward lands back on the field
            let next = p + side.inward() * 31.0;
            assert!(!Body::new(next, Vec2::ZERO).unwrap().outside(field));
        }
    }

    #[test]
    fn test_wrap_each_axis() {
        let field = Vec2::new(800.0, 600.0);
        let margin = Vec2::new(10.0, 20.0);

        let mut body = Body::new(Vec2::new(811.0, 300.0), Vec2::ZERO).unwrap();
        body.wrap(field, margin);
        assert_eq!(body.pos(), Vec2::new(-10.0, 300.0));

        let mut body = Body::new(Vec2::new(400.0, -21.0), Vec2::ZERO).unwrap();
        body.wrap(field, margin);
        assert_eq!(body.pos(), Vec2::new(400.0, 620.0));

        // Inside the margin nothing moves
        let mut body = Body::new(Vec2::new(805.0, -5.0), Vec2::ZERO).unwrap();
        body.wrap(field, margin);
        assert_eq!(body.pos(), Vec2::new(805.0, -5.0));
    }
}
