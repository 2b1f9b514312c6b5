//! Pooled shots for both the player and enemies
//!
//! There is one projectile type. What distinguishes a player laser from an
//! enemy bolt is the [`ProjectileKind`] the owning controller was built
//! with.

use glam::Vec2;

use super::body::Body;
use super::hitbox::{HasHitBox, HitBox};
use super::pool::{Pool, Poolable};
use crate::audio::SoundId;
use crate::error::SimError;
use crate::math::heading;
use crate::render::SpriteId;
use crate::settings::{PoolPolicy, ProjectileSettings, SpriteSpec};

/// Everything that differs between projectile flavors
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileKind {
    pub name: &'static str,
    pub sprite: SpriteId,
    pub spec: SpriteSpec,
    pub speed: f32,
    /// Add the shooter's velocity to the muzzle velocity
    pub inherit_momentum: bool,
    pub sound: Option<SoundId>,
}

impl ProjectileKind {
    pub fn player(cfg: &ProjectileSettings) -> Self {
        Self::from_settings("projectiles", SpriteId::Laser, cfg)
    }

    pub fn enemy(cfg: &ProjectileSettings) -> Self {
        Self::from_settings("enemy_projectiles", SpriteId::EnemyLaser, cfg)
    }

    fn from_settings(name: &'static str, sprite: SpriteId, cfg: &ProjectileSettings) -> Self {
        Self {
            name,
            sprite,
            spec: cfg.sprite,
            speed: cfg.speed,
            inherit_momentum: cfg.inherit_momentum,
            sound: cfg.sound.then_some(SoundId::Laser),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Projectile {
    body: Body,
    angle: f32,
    size: Vec2,
    hitbox: HitBox,
}

/// Spawn parameters for a pooled [`Projectile`]
#[derive(Debug, Clone, Copy)]
pub struct ProjectileSpawn {
    pub body: Body,
    pub angle: f32,
    pub spec: SpriteSpec,
}

impl Poolable for Projectile {
    type Spawn = ProjectileSpawn;

    fn init(&mut self, spawn: ProjectileSpawn) {
        self.body = spawn.body;
        self.angle = spawn.angle;
        self.size = spawn.spec.size();
        self.hitbox = HitBox::new(self.size, spawn.spec.hitbox_scale, spawn.body.pos());
    }
}

impl Projectile {
    pub fn pos(&self) -> Vec2 {
        self.body.pos()
    }

    pub fn vel(&self) -> Vec2 {
        self.body.vel()
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }
}

impl HasHitBox for Projectile {
    fn hitbox(&self) -> &HitBox {
        &self.hitbox
    }
}

#[derive(Debug, Clone)]
pub struct ProjectileController {
    pool: Pool<Projectile>,
    kind: ProjectileKind,
    field: Vec2,
}

impl ProjectileController {
    pub fn new(kind: ProjectileKind, capacity: usize, policy: PoolPolicy, field: Vec2) -> Self {
        Self {
            pool: Pool::new(kind.name, capacity, policy),
            kind,
            field,
        }
    }

    pub fn kind(&self) -> &ProjectileKind {
        &self.kind
    }

    pub fn projectiles(&self) -> &[Projectile] {
        self.pool.active()
    }

    pub fn pool(&self) -> &Pool<Projectile> {
        &self.pool
    }

    /// Fire from `origin` along `angle`. `inherited` is the shooter's
    /// velocity, added only for kinds that carry momentum. Returns the
    /// sound to play, if any.
    pub fn shoot(
        &mut self,
        origin: Vec2,
        angle: f32,
        inherited: Vec2,
    ) -> Result<Option<SoundId>, SimError> {
        let mut vel = heading(angle) * self.kind.speed;
        if self.kind.inherit_momentum {
            vel += inherited;
        }
        let body = Body::new(origin, vel)?;
        self.pool.acquire(ProjectileSpawn {
            body,
            angle,
            spec: self.kind.spec,
        })?;
        Ok(self.kind.sound)
    }

    /// Move every shot and retire the ones that left the field
    pub fn update(&mut self) -> usize {
        for p in self.pool.active_mut() {
            p.body.integrate();
            p.hitbox.translate(p.body.pos());
        }
        let field = self.field;
        self.pool.release_where(|p| p.body.outside(field))
    }

    /// Return shots that hit something this frame
    pub fn retire(&mut self, indices: &[usize]) -> usize {
        self.pool.release_marked(indices)
    }

    pub fn reset(&mut self) {
        self.pool.reset();
    }
}
