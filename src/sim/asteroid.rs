//! Drifting, spinning rocks
//!
//! The controller keeps the field at a fixed population. Destroyed rocks
//! leave a gap that is refilled one per frame, and shot rocks are re-rolled
//! in place as fresh off-screen spawns.

use glam::Vec2;
use rand::Rng;

use super::body::{Body, SpawnSide};
use super::hitbox::{HasHitBox, HitBox};
use crate::math::{random_float, random_int, wrap_degrees};
use crate::settings::AsteroidSettings;

#[derive(Debug, Clone)]
pub struct Asteroid {
    body: Body,
    angle: f32,
    /// Spin (degrees per frame), fixed at spawn
    rotation: f32,
    scale: f32,
    /// Index into the variation sheet
    variation: u32,
    size: Vec2,
    hitbox: HitBox,
}

impl Asteroid {
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

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn variation(&self) -> u32 {
        self.variation
    }

    /// `(row, col)` of this rock's variation in a sheet `cols` wide
    pub fn sheet_cell(&self, cols: u32) -> (u32, u32) {
        let cols = cols.max(1);
        (self.variation / cols, self.variation % cols)
    }

    fn with_velocity(mut self, vel: Vec2) -> Self {
        if self.body.set_vel(vel).is_err() {
            log::warn!("asteroid spawned with non-finite velocity {vel}");
        }
        self
    }

    fn advance(&mut self, field: Vec2) {
        self.body.integrate();
        self.angle = wrap_degrees(self.angle + self.rotation);
        self.body.wrap(field, self.size * 0.5);
        self.hitbox.translate(self.body.pos());
    }
}

impl HasHitBox for Asteroid {
    fn hitbox(&self) -> &HitBox {
        &self.hitbox
    }
}

#[derive(Debug, Clone)]
pub struct AsteroidController {
    asteroids: Vec<Asteroid>,
    cfg: AsteroidSettings,
    field: Vec2,
}

impl AsteroidController {
    /// Fill the field with a full population of random rocks
    pub fn new(cfg: &AsteroidSettings, field: Vec2, rng: &mut impl Rng) -> Self {
        let mut controller = Self {
            asteroids: Vec::with_capacity(cfg.population),
            cfg: cfg.clone(),
            field,
        };
        controller.reset(rng);
        controller
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn len(&self) -> usize {
        self.asteroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asteroids.is_empty()
    }

    /// Target live count
    pub fn population(&self) -> usize {
        self.cfg.population
    }

    /// Roll a new rock just beyond a random screen edge, drifting inward
    pub fn create_random(&self, rng: &mut impl Rng) -> Asteroid {
        let cfg = &self.cfg;
        let scale = random_float(rng, cfg.min_scale, cfg.max_scale);
        let size = cfg.sprite.size_at(scale);

        let side = SpawnSide::random(rng);
        let inward = side.inward();
        let across = inward.perp();
        let vel = inward * random_float(rng, cfg.min_speed, cfg.max_speed)
            + across * random_float(rng, -cfg.drift, cfg.drift);

        // Start inside the wrap margin so the rock isn't teleported away
        // before it drifts on screen
        let offset = cfg.spawn_buffer.min(size.max_element() * 0.5);
        let pos = side.edge_point(self.field, rng.random::<f32>(), offset);

        let max_variation = cfg.variations.max(1) as i32 - 1;
        Asteroid {
            body: Body::at(pos),
            angle: random_float(rng, 0.0, 360.0) % 360.0,
            rotation: random_float(rng, -cfg.max_spin, cfg.max_spin),
            scale,
            variation: random_int(rng, 0, max_variation) as u32,
            size,
            hitbox: HitBox::new(size, cfg.sprite.hitbox_scale, pos),
        }
        .with_velocity(vel)
    }

    /// Advance every rock, then top the population back up by at most one
    pub fn update(&mut self, rng: &mut impl Rng) {
        for asteroid in &mut self.asteroids {
            asteroid.advance(self.field);
        }
        if self.asteroids.len() < self.cfg.population {
            let asteroid = self.create_random(rng);
            self.asteroids.push(asteroid);
            log::debug!(
                "asteroid synthesized ({}/{})",
                self.asteroids.len(),
                self.cfg.population
            );
        }
    }

    /// Remove a rock outright; the gap refills on later updates
    pub fn destroy(&mut self, index: usize) -> Option<Asteroid> {
        (index < self.asteroids.len()).then(|| self.asteroids.remove(index))
    }

    /// Replace the rock at `index` with a fresh random spawn
    pub fn respawn(&mut self, index: usize, rng: &mut impl Rng) {
        if index < self.asteroids.len() {
            self.asteroids[index] = self.create_random(rng);
        }
    }

    /// Discard every rock and roll a full population
    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.asteroids.clear();
        for _ in 0..self.cfg.population {
            let asteroid = self.create_random(rng);
            self.asteroids.push(asteroid);
        }
    }
}
