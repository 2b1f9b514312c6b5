//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host clock passed in, never read
//! - Seeded RNG only
//! - Stable iteration order (insertion order of each collection)
//! - No rendering, audio or platform dependencies

pub mod animation;
pub mod asteroid;
pub mod body;
pub mod collision;
pub mod enemy;
pub mod explosion;
pub mod hitbox;
pub mod player;
pub mod pool;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod timeout;

pub use asteroid::{Asteroid, AsteroidController};
pub use body::{Body, SpawnSide};
pub use collision::{PlayerContacts, ProjectileHits, sweep_player, sweep_projectiles};
pub use enemy::{Enemy, EnemyController, FireRequest, WavePlan};
pub use explosion::{Explosion, ExplosionController, ExplosionKind};
pub use hitbox::{HasHitBox, HitBox};
pub use player::{Player, PlayerStatus};
pub use pool::{Pool, Poolable};
pub use projectile::{Projectile, ProjectileController, ProjectileKind};
pub use state::{GameEvent, GamePhase, GameState, TimerEvent};
pub use tick::{TickInput, tick};
pub use timeout::{Scheduler, Timeout, TimeoutId, TimeoutState};
