//! The player's ship

use glam::Vec2;

use super::animation::{Clip, ClipPlayer};
use super::body::Body;
use super::hitbox::{HasHitBox, HitBox};
use super::tick::TickInput;
use crate::error::SimError;
use crate::math::{heading, normalize, wrap_degrees};
use crate::settings::PlayerSettings;

/// Engine off
pub const IDLE: Clip = Clip {
    row: 0,
    first: 0,
    last: 0,
    stagger: 10,
};

/// Engine firing
pub const RUNNING: Clip = Clip {
    row: 0,
    first: 3,
    last: 6,
    stagger: 10,
};

/// Ticks per on/off phase while blinking
pub const BLINK_TICKS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    Alive,
    /// Destroyed, waiting for the respawn timeout
    Exploding,
}

#[derive(Debug, Clone)]
pub struct Player {
    body: Body,
    /// Facing (degrees, clockwise from east)
    angle: f32,
    /// Angular velocity (degrees per frame)
    rotation: f32,
    pub status: PlayerStatus,
    pub is_accelerating: bool,
    /// Contacts can't hurt the ship
    pub is_invulnerable: bool,
    /// Draw the ship at all
    pub render: bool,
    pub shield: bool,
    /// Shield just absorbed a hit
    pub shield_flash: bool,
    /// Thrust input ignored (after a manual restart)
    pub thrust_locked: bool,
    anim: ClipPlayer,
    blink_ticks: u32,
    hitbox: HitBox,
    size: Vec2,
    cfg: PlayerSettings,
}

impl Player {
    pub fn new(cfg: &PlayerSettings, center: Vec2) -> Self {
        let size = cfg.sprite.size();
        Self {
            body: Body::at(center),
            angle: wrap_degrees(cfg.start_angle),
            rotation: 0.0,
            status: PlayerStatus::Alive,
            is_accelerating: false,
            is_invulnerable: false,
            render: true,
            shield: false,
            shield_flash: false,
            thrust_locked: false,
            anim: ClipPlayer::new(IDLE),
            blink_ticks: 0,
            hitbox: HitBox::new(size, cfg.sprite.hitbox_scale, center),
            size,
            cfg: cfg.clone(),
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.body.pos()
    }

    pub fn vel(&self) -> Vec2 {
        self.body.vel()
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Scaled sprite size
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn is_alive(&self) -> bool {
        self.status == PlayerStatus::Alive
    }

    pub fn set_position(&mut self, pos: Vec2) -> Result<(), SimError> {
        self.body.set_pos(pos)?;
        self.hitbox.translate(pos);
        Ok(())
    }

    pub fn set_velocity(&mut self, vel: Vec2) -> Result<(), SimError> {
        self.body.set_vel(vel)
    }

    /// Thrust along the facing, keeping speed at or below the cap
    pub fn accelerate(&mut self) {
        self.is_accelerating = true;
        let mut vel = self.body.vel() + heading(self.angle) * self.cfg.acceleration;
        if vel.length() > self.cfg.max_velocity {
            vel = normalize(vel, self.cfg.max_velocity).unwrap_or(vel);
        }
        if let Err(e) = self.body.set_vel(vel) {
            log::warn!("Thrust ignored: {e}");
        }
    }

    pub fn stop_accelerating(&mut self) {
        self.is_accelerating = false;
        self.anim.set_clip(IDLE);
    }

    pub fn rotate_right(&mut self) {
        self.rotation = (self.rotation + self.cfg.torque).min(self.cfg.max_rotation);
    }

    pub fn rotate_left(&mut self) {
        self.rotation = (self.rotation - self.cfg.torque).max(-self.cfg.max_rotation);
    }

    /// Advance one frame: input, motion, facing, wrap, hit box
    pub fn update(&mut self, input: &TickInput, field: Vec2) {
        if !self.is_alive() {
            return;
        }

        if input.thrust && !self.thrust_locked {
            if !self.is_accelerating {
                self.anim.set_clip(RUNNING);
            }
            self.accelerate();
        } else if self.is_accelerating {
            self.stop_accelerating();
        }
        if input.rotate_right {
            self.rotate_right();
        }
        if input.rotate_left {
            self.rotate_left();
        }

        self.body.integrate();
        self.angle = wrap_degrees(self.angle + self.rotation);
        self.body.wrap(field, self.size * 0.5);
        self.hitbox.translate(self.body.pos());

        self.anim.step();
        if self.is_invulnerable {
            self.blink_ticks += 1;
        } else {
            self.blink_ticks = 0;
        }
    }

    /// Whether the ship should be drawn this frame (blinks while invulnerable)
    pub fn visible(&self) -> bool {
        self.render && (!self.is_invulnerable || (self.blink_ticks / BLINK_TICKS) % 2 == 0)
    }

    /// Current `(row, col)` in the ship sheet
    pub fn frame(&self) -> (u32, u32) {
        self.anim.frame()
    }

    /// Hide the ship and make it untouchable until respawn
    pub fn explode(&mut self) {
        self.status = PlayerStatus::Exploding;
        self.render = false;
        self.is_invulnerable = true;
        self.is_accelerating = false;
        self.shield = false;
        self.shield_flash = false;
    }

    /// Restore spawn kinematics at `center`; `grace` keeps the ship
    /// invulnerable until cleared
    pub fn respawn(&mut self, center: Vec2, grace: bool) {
        self.body = Body::at(center);
        self.angle = wrap_degrees(self.cfg.start_angle);
        self.rotation = 0.0;
        self.status = PlayerStatus::Alive;
        self.is_accelerating = false;
        self.is_invulnerable = grace;
        self.render = true;
        self.shield = false;
        self.shield_flash = false;
        self.anim = ClipPlayer::new(IDLE);
        self.blink_ticks = 0;
        self.hitbox.translate(center);
    }
}

impl HasHitBox for Player {
    fn hitbox(&self) -> &HitBox {
        &self.hitbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FIELD: Vec2 = Vec2::new(800.0, 800.0);

    fn player() -> Player {
        Player::new(&PlayerSettings::default(), FIELD * 0.5)
    }

    #[test]
    fn test_thrust_follows_facing() {
        let mut p = player();
        // Facing north (270°): thrust moves the ship up the screen
        let input = TickInput {
            thrust: true,
            ..Default::default()
        };
        p.update(&input, FIELD);
        assert!(p.vel().y < 0.0);
        assert!(p.vel().x.abs() < 1e-6);
        assert!(p.pos().y < 400.0);
        assert_eq!(p.frame(), (0, 3));
    }

    #[test]
    fn test_rotation_clamped() {
        let mut p = player();
        for _ in 0..20 {
            p.rotate_right();
        }
        assert_eq!(p.rotation(), 3.0);
        for _ in 0..40 {
            p.rotate_left();
        }
        assert_eq!(p.rotation(), -3.0);
    }

    #[test]
    fn test_wraps_across_edges() {
        let mut p = player();
        p.set_position(Vec2::new(839.0, 400.0)).unwrap();
        p.set_velocity(Vec2::new(2.0, 0.0)).unwrap();
        p.update(&TickInput::default(), FIELD);
        // Half of the 80px scaled sprite
        assert_eq!(p.pos().x, -40.0);
        assert_eq!(p.hitbox().center().x, -40.0);
    }

    #[test]
    fn test_blinks_while_invulnerable() {
        let mut p = player();
        p.respawn(FIELD * 0.5, true);
        let mut seen_hidden = false;
        for _ in 0..(BLINK_TICKS * 2) {
            p.update(&TickInput::default(), FIELD);
            seen_hidden |= !p.visible();
        }
        assert!(seen_hidden);
        p.is_invulnerable = false;
        p.update(&TickInput::default(), FIELD);
        assert!(p.visible());
    }

    #[test]
    fn test_explode_freezes_ship() {
        let mut p = player();
        p.set_velocity(Vec2::new(1.0, 1.0)).unwrap();
        p.explode();
        let before = p.pos();
        p.update(&TickInput::default(), FIELD);
        assert_eq!(p.pos(), before);
        assert!(!p.visible());
        assert!(p.is_invulnerable);
    }

    #[test]
    fn test_thrust_lock() {
        let mut p = player();
        p.thrust_locked = true;
        let input = TickInput {
            thrust: true,
            ..Default::default()
        };
        p.update(&input, FIELD);
        assert_eq!(p.vel(), Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_velocity_never_exceeds_cap(
            steps in proptest::collection::vec((0.0f32..360.0, 0u8..40), 1..20),
        ) {
            let mut p = player();
            for (angle, thrusts) in steps {
                p.angle = angle;
                for _ in 0..thrusts {
                    p.accelerate();
                    prop_assert!(p.vel().length() <= 3.0 + 1e-4);
                }
            }
        }

        #[test]
        fn prop_angle_stays_wrapped(
            turns in proptest::collection::vec(-1i8..=1, 1..400),
        ) {
            let cfg = PlayerSettings { torque: 7.0, max_rotation: 45.0, ..Default::default() };
            let mut p = Player::new(&cfg, FIELD * 0.5);
            for t in turns {
                let input = TickInput {
                    rotate_right: t > 0,
                    rotate_left: t < 0,
                    ..Default::default()
                };
                p.update(&input, FIELD);
                prop_assert!(p.angle() >= 0.0 && p.angle() < 360.0);
            }
        }
    }
}
