//! Game state and core simulation types
//!
//! One `GameState` owns every collection in a game. Nothing here is global,
//! so several simulations can run side by side (tests clone them freely).

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::asteroid::AsteroidController;
use super::enemy::EnemyController;
use super::explosion::ExplosionController;
use super::player::Player;
use super::projectile::{ProjectileController, ProjectileKind};
use super::timeout::Scheduler;
use crate::audio::SoundCmd;
use crate::error::SimError;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, waiting for the start key
    Title,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
}

/// Deferred effects driven by the pausable scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    SpawnWave { count: u32 },
    /// Death sequence finished: reset the round
    Respawn,
    /// Post-respawn invulnerability ends
    GraceOver,
    ShieldFlashOver,
    ThrustUnlock,
}

/// Side effects for the host, drained once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundCmd),
    Score(u32),
    Record(u32),
    /// Transient banner text
    Alert(String),
    Paused(bool),
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub phase: GamePhase,
    pub player: Player,
    pub asteroids: AsteroidController,
    pub enemies: EnemyController,
    pub projectiles: ProjectileController,
    pub enemy_projectiles: ProjectileController,
    pub explosions: ExplosionController,
    pub timers: Scheduler<TimerEvent>,
    pub score: u32,
    /// Best score of any finished round
    pub record: u32,
    /// Enemies shot down
    pub kills: u32,
    pub asteroids_destroyed: u32,
    pub deaths: u32,
    /// Simulation steps taken
    pub frame: u64,
    /// Host clock at the last step
    pub now_ms: f64,
    /// Host clock when the game was paused
    pub paused_at: Option<f64>,
    /// Run seed for reproducibility
    pub seed: u64,
    events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Build a fresh game on the title screen
    pub fn new(settings: Settings, seed: u64) -> Result<Self, SimError> {
        settings.validate()?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let field = settings.field.size();
        let pools = &settings.pools;

        let state = Self {
            phase: GamePhase::Title,
            player: Player::new(&settings.player, settings.field.center()),
            asteroids: AsteroidController::new(&settings.asteroids, field, &mut rng),
            enemies: EnemyController::new(&settings.enemies, field),
            projectiles: ProjectileController::new(
                ProjectileKind::player(&settings.projectiles.player),
                pools.projectiles,
                pools.policy,
                field,
            ),
            enemy_projectiles: ProjectileController::new(
                ProjectileKind::enemy(&settings.projectiles.enemy),
                pools.enemy_projectiles,
                pools.policy,
                field,
            ),
            explosions: ExplosionController::new(
                &settings.explosions,
                pools.explosions,
                pools.policy,
            ),
            timers: Scheduler::new(),
            score: 0,
            record: 0,
            kills: 0,
            asteroids_destroyed: 0,
            deaths: 0,
            frame: 0,
            now_ms: 0.0,
            paused_at: None,
            seed,
            events: Vec::new(),
            rng,
            settings,
        };
        log::info!("New game (seed {seed})");
        Ok(state)
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Queue a sound unless sound is switched off
    pub fn emit_sound(&mut self, cmd: SoundCmd) {
        if self.settings.audio.enable_sound {
            self.events.push(GameEvent::Sound(cmd));
        }
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Start a new round: bank the record, zero the score and restore fresh
    /// populations. Every pending timer is dropped.
    pub fn reset_round(&mut self, now_ms: f64) {
        self.record = self.record.max(self.score);
        self.score = 0;

        self.timers.clear();
        self.asteroids.reset(&mut self.rng);
        self.enemies.reset();
        self.projectiles.reset();
        self.enemy_projectiles.reset();
        self.explosions.reset();

        let grace_ms = self.settings.timing.respawn_grace_ms;
        self.player.respawn(self.settings.field.center(), grace_ms > 0.0);
        self.player.thrust_locked = false;
        if grace_ms > 0.0 {
            self.timers.schedule(TimerEvent::GraceOver, grace_ms, now_ms);
        }

        self.emit(GameEvent::Score(self.score));
        self.emit(GameEvent::Record(self.record));
        log::info!("Round reset (record {})", self.record);
    }
}
