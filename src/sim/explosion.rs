//! One-shot explosion effects
//!
//! Explosions don't move or collide. Each plays its sheet once and is
//! recycled as soon as the animation reports it is done.

use glam::Vec2;
use rand::Rng;

use super::animation::SheetAnimation;
use super::pool::{Pool, Poolable};
use crate::audio::SoundId;
use crate::error::SimError;
use crate::math::random_int;
use crate::render::SpriteId;
use crate::settings::{ExplosionSettings, PoolPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExplosionKind {
    /// Asteroid breaking apart
    #[default]
    Rock,
    Player,
    Enemy,
}

impl ExplosionKind {
    pub fn sound(self) -> SoundId {
        match self {
            Self::Rock => SoundId::Explosion,
            Self::Player => SoundId::PlayerExplosion,
            Self::Enemy => SoundId::EnemyExplosion,
        }
    }

    pub fn sprite(self) -> SpriteId {
        match self {
            Self::Rock => SpriteId::Explosion,
            Self::Player => SpriteId::PlayerExplosion,
            Self::Enemy => SpriteId::EnemyExplosion,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Explosion {
    kind: ExplosionKind,
    pos: Vec2,
    /// Degrees, picked once at spawn
    rotation: f32,
    size: Vec2,
    anim: SheetAnimation,
}

#[derive(Debug, Clone, Copy)]
pub struct ExplosionSpawn {
    pub kind: ExplosionKind,
    pub pos: Vec2,
    pub rotation: f32,
    pub size: Vec2,
    pub anim: SheetAnimation,
}

impl Poolable for Explosion {
    type Spawn = ExplosionSpawn;

    fn init(&mut self, spawn: ExplosionSpawn) {
        self.kind = spawn.kind;
        self.pos = spawn.pos;
        self.rotation = spawn.rotation;
        self.size = spawn.size;
        self.anim = spawn.anim;
    }
}

impl Explosion {
    pub fn kind(&self) -> ExplosionKind {
        self.kind
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn frame(&self) -> (u32, u32) {
        self.anim.frame()
    }

    pub fn is_done(&self) -> bool {
        self.anim.is_done()
    }
}

#[derive(Debug, Clone)]
pub struct ExplosionController {
    pool: Pool<Explosion>,
    cfg: ExplosionSettings,
}

impl ExplosionController {
    pub fn new(cfg: &ExplosionSettings, capacity: usize, policy: PoolPolicy) -> Self {
        Self {
            pool: Pool::new("explosions", capacity, policy),
            cfg: cfg.clone(),
        }
    }

    pub fn explosions(&self) -> &[Explosion] {
        self.pool.active()
    }

    pub fn pool(&self) -> &Pool<Explosion> {
        &self.pool
    }

    /// Scale used when the caller has nothing better to go on
    pub fn default_scale(&self, kind: ExplosionKind) -> f32 {
        match kind {
            ExplosionKind::Rock => self.cfg.sprite.scale,
            ExplosionKind::Player => self.cfg.player_scale,
            ExplosionKind::Enemy => self.cfg.enemy_scale,
        }
    }

    /// Start an explosion at `pos`. Returns the sound it makes.
    pub fn explode(
        &mut self,
        kind: ExplosionKind,
        pos: Vec2,
        scale: f32,
        rng: &mut impl Rng,
    ) -> Result<SoundId, SimError> {
        if !pos.is_finite() {
            return Err(SimError::NonFinite {
                what: "explosion position",
                x: pos.x,
                y: pos.y,
            });
        }
        let cfg = &self.cfg;
        let spawn = ExplosionSpawn {
            kind,
            pos,
            rotation: random_int(rng, 1, 360) as f32,
            size: cfg.sprite.size_at(scale),
            anim: SheetAnimation::new(cfg.cols, cfg.rows, cfg.stagger, false),
        };
        self.pool.acquire(spawn)?;
        Ok(kind.sound())
    }

    /// Step every animation and recycle the finished ones
    pub fn update(&mut self) -> usize {
        for e in self.pool.active_mut() {
            e.anim.step();
        }
        self.pool.release_where(Explosion::is_done)
    }

    pub fn reset(&mut self) {
        self.pool.reset();
    }
}
