//! Enemy saucers
//!
//! Enemies arrive in waves, drift across the field on a fixed heading and
//! keep their turret trained on the player. A new wave is only planned once
//! the previous one has been wiped out.

use glam::Vec2;
use rand::Rng;

use super::body::{Body, SpawnSide};
use super::hitbox::{HasHitBox, HitBox};
use crate::math::{normalize, points_angle_deg, random_float, random_int};
use crate::settings::EnemySettings;

#[derive(Debug, Clone)]
pub struct Enemy {
    body: Body,
    /// Bearing to the player, refreshed every frame
    angle: f32,
    size: Vec2,
    hitbox: HitBox,
    last_attack_ms: f64,
    attack_interval_ms: f64,
}

impl Enemy {
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

    pub fn attack_interval_ms(&self) -> f64 {
        self.attack_interval_ms
    }

    /// Move, wrap, re-aim at `target`. Returns true when the attack
    /// interval has elapsed and the enemy fires this frame.
    fn update(&mut self, field: Vec2, target: Vec2, now_ms: f64) -> bool {
        self.body.integrate();
        self.body.wrap(field, self.size * 0.5);
        self.hitbox.translate(self.body.pos());
        self.angle = points_angle_deg(self.body.pos(), target);

        if now_ms - self.last_attack_ms > self.attack_interval_ms {
            self.last_attack_ms = now_ms;
            true
        } else {
            false
        }
    }
}

impl HasHitBox for Enemy {
    fn hitbox(&self) -> &HitBox {
        &self.hitbox
    }
}

/// A shot an enemy wants fired this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireRequest {
    pub origin: Vec2,
    pub angle: f32,
}

/// Timing and size of the next wave
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavePlan {
    pub delay_ms: f64,
    pub count: u32,
}

#[derive(Debug, Clone)]
pub struct EnemyController {
    enemies: Vec<Enemy>,
    cfg: EnemySettings,
    field: Vec2,
    wave_pending: bool,
    waves: u32,
}

impl EnemyController {
    pub fn new(cfg: &EnemySettings, field: Vec2) -> Self {
        Self {
            enemies: Vec::new(),
            cfg: cfg.clone(),
            field,
            wave_pending: false,
            waves: 0,
        }
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn wave_pending(&self) -> bool {
        self.wave_pending
    }

    /// Waves spawned since the last reset
    pub fn waves(&self) -> u32 {
        self.waves
    }

    /// The field is clear and nothing is scheduled yet
    pub fn needs_wave(&self) -> bool {
        self.enemies.is_empty() && !self.wave_pending
    }

    /// Draw the next wave's delay and size and mark it pending
    pub fn plan_wave(&mut self, rng: &mut impl Rng) -> WavePlan {
        let interval = self.cfg.wave_interval_ms;
        let delay_ms = if interval > 0.0 {
            rng.random_range(interval..=interval * 2.0)
        } else {
            0.0
        };
        let count = random_int(
            rng,
            self.cfg.min_wave_size as i32,
            self.cfg.max_wave_size as i32,
        ) as u32;
        self.wave_pending = true;
        log::debug!("wave of {count} planned in {delay_ms:.0}ms");
        WavePlan { delay_ms, count }
    }

    pub fn spawn_wave(&mut self, count: u32, now_ms: f64, rng: &mut impl Rng) {
        for _ in 0..count {
            let enemy = self.create_random(now_ms, rng);
            self.enemies.push(enemy);
        }
        self.wave_pending = false;
        self.waves += 1;
        log::info!("Wave {} incoming: {} enemies", self.waves, count);
    }

    fn create_random(&self, now_ms: f64, rng: &mut impl Rng) -> Enemy {
        let cfg = &self.cfg;
        let size = cfg.sprite.size();
        let offset = cfg.spawn_buffer.min(size.max_element() * 0.5);
        let side = SpawnSide::random(rng);
        let pos = side.edge_point(self.field, rng.random::<f32>(), offset);

        // Head for somewhere around the middle of the field
        let jitter = Vec2::new(
            random_float(rng, -cfg.target_jitter, cfg.target_jitter),
            random_float(rng, -cfg.target_jitter, cfg.target_jitter),
        );
        let speed = random_float(rng, cfg.min_speed, cfg.max_speed);
        let vel = normalize(self.field * 0.5 + jitter - pos, speed)
            .unwrap_or_else(|| side.inward() * speed);

        let attack_interval_ms = if cfg.max_attack_interval_ms > cfg.min_attack_interval_ms {
            rng.random_range(cfg.min_attack_interval_ms..=cfg.max_attack_interval_ms)
        } else {
            cfg.min_attack_interval_ms
        };

        let mut body = Body::at(pos);
        if body.set_vel(vel).is_err() {
            log::warn!("enemy spawned with non-finite velocity {vel}");
        }
        Enemy {
            body,
            angle: points_angle_deg(pos, self.field * 0.5),
            size,
            hitbox: HitBox::new(size, cfg.sprite.hitbox_scale, pos),
            last_attack_ms: now_ms,
            attack_interval_ms,
        }
    }

    /// Advance every enemy and collect the shots fired this frame
    pub fn update(&mut self, target: Vec2, now_ms: f64) -> Vec<FireRequest> {
        let mut shots = Vec::new();
        for enemy in &mut self.enemies {
            if enemy.update(self.field, target, now_ms) {
                shots.push(FireRequest {
                    origin: enemy.pos(),
                    angle: enemy.angle,
                });
            }
        }
        shots
    }

    /// Remove the enemies at `indices` (collected this frame)
    pub fn remove(&mut self, indices: &[usize]) -> Vec<Enemy> {
        let mut indices = indices.to_vec();
        indices.sort_unstable();
        indices.dedup();
        let mut removed = Vec::with_capacity(indices.len());
        for i in indices.into_iter().rev() {
            if i < self.enemies.len() {
                removed.push(self.enemies.remove(i));
            }
        }
        removed
    }

    /// Park a stationary enemy at `pos` that never fires
    #[cfg(test)]
    pub(crate) fn spawn_at(&mut self, pos: Vec2, now_ms: f64) {
        let size = self.cfg.sprite.size();
        self.enemies.push(Enemy {
            body: Body::at(pos),
            angle: 0.0,
            size,
            hitbox: HitBox::new(size, self.cfg.sprite.hitbox_scale, pos),
            last_attack_ms: now_ms,
            attack_interval_ms: f64::MAX,
        });
    }

    /// Push every attack clock forward, e.g. by the time spent paused
    pub fn shift_clock(&mut self, delta_ms: f64) {
        for enemy in &mut self.enemies {
            enemy.last_attack_ms += delta_ms;
        }
    }

    pub fn reset(&mut self) {
        self.enemies.clear();
        self.wave_pending = false;
        self.waves = 0;
    }
}
