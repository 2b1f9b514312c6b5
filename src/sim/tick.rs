//! One simulation step
//!
//! Order within a step is fixed: input, timers, motion, collision sweeps,
//! then consequences. Sweeps only collect indices and all removals happen
//! afterwards.

use glam::Vec2;

use super::collision::{PlayerContacts, ProjectileHits, sweep_player, sweep_projectiles};
use super::explosion::ExplosionKind;
use super::state::{GameEvent, GamePhase, GameState, TimerEvent};
use crate::audio::{SoundCmd, SoundId};
use crate::error::SimError;

pub const WAVE_ALERT: &str = "Incoming wave";

/// Input sampled for a single step
///
/// Held keys are levels; the rest are edges that are true only on the
/// frame the key went down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub thrust: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub fire: bool,
    pub shield: bool,
    pub pause: bool,
    pub restart: bool,
    /// Handled by the runner, which owns the audio backend
    pub mute: bool,
    pub start: bool,
}

impl TickInput {
    /// The same input with every edge cleared, for extra substeps
    pub fn held_only(&self) -> Self {
        Self {
            thrust: self.thrust,
            rotate_left: self.rotate_left,
            rotate_right: self.rotate_right,
            ..Default::default()
        }
    }
}

/// Advance the game by one step at host time `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    state.now_ms = now_ms;

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                pause(state, now_ms);
                return;
            }
            GamePhase::Paused => resume(state, now_ms),
            GamePhase::Title => {}
        }
    }

    match state.phase {
        GamePhase::Paused => return,
        GamePhase::Title => {
            if !input.start {
                return;
            }
            state.phase = GamePhase::Playing;
            state.emit_sound(SoundCmd::Loop(SoundId::Music));
            log::info!("Game started");
        }
        GamePhase::Playing => {}
    }

    state.frame += 1;

    if input.restart {
        restart(state, now_ms);
    }

    for event in state.timers.poll(now_ms) {
        if apply_timer(state, event, now_ms) {
            // The round was reset; anything else due belonged to the old one
            break;
        }
    }

    handle_actions(state, input);

    let field = state.settings.field.size();
    state.player.update(input, field);
    state.asteroids.update(&mut state.rng);
    let shots = state.enemies.update(state.player.pos(), now_ms);
    for shot in shots {
        let fired = state
            .enemy_projectiles
            .shoot(shot.origin, shot.angle, Vec2::ZERO);
        play_or_warn(state, fired.map(|s| s.map(SoundCmd::Play)));
    }
    state.projectiles.update();
    state.enemy_projectiles.update();
    state.explosions.update();

    let hits = sweep_projectiles(
        state.projectiles.projectiles(),
        state.asteroids.asteroids(),
        state.enemies.enemies(),
    );
    let contacts = if state.player.is_alive() {
        sweep_player(
            &state.player,
            state.asteroids.asteroids(),
            state.enemy_projectiles.projectiles(),
        )
    } else {
        PlayerContacts::default()
    };

    apply_hits(state, &hits);
    apply_contacts(state, &contacts, &hits, now_ms);

    if state.is_playing() && state.enemies.needs_wave() {
        let plan = state.enemies.plan_wave(&mut state.rng);
        state
            .timers
            .schedule(TimerEvent::SpawnWave { count: plan.count }, plan.delay_ms, now_ms);
    }
}

fn pause(state: &mut GameState, now_ms: f64) {
    state.phase = GamePhase::Paused;
    state.paused_at = Some(now_ms);
    state.timers.pause_all(now_ms);
    state.emit(GameEvent::Paused(true));
    log::info!("Paused at frame {}", state.frame);
}

fn resume(state: &mut GameState, now_ms: f64) {
    let paused_for = state.paused_at.take().map_or(0.0, |at| now_ms - at);
    state.timers.resume_all(now_ms);
    state.enemies.shift_clock(paused_for);
    state.phase = GamePhase::Playing;
    state.emit(GameEvent::Paused(false));
    log::info!("Resumed after {paused_for:.0}ms");
}

/// Manual restart: fresh round, thrust locked for a moment so a held key
/// doesn't launch the ship straight away
fn restart(state: &mut GameState, now_ms: f64) {
    state.reset_round(now_ms);
    let lock_ms = state.settings.timing.thrust_lock_ms;
    if lock_ms > 0.0 {
        state.player.thrust_locked = true;
        state.timers.schedule(TimerEvent::ThrustUnlock, lock_ms, now_ms);
    }
    log::info!("Restarted");
}

/// Apply one fired timer. Returns true if the round was reset.
fn apply_timer(state: &mut GameState, event: TimerEvent, now_ms: f64) -> bool {
    match event {
        TimerEvent::SpawnWave { count } => {
            state.enemies.spawn_wave(count, now_ms, &mut state.rng);
            state.emit(GameEvent::Alert(WAVE_ALERT.to_string()));
            state.emit_sound(SoundCmd::Play(SoundId::WaveAlert));
        }
        TimerEvent::Respawn => {
            state.reset_round(now_ms);
            return true;
        }
        TimerEvent::GraceOver => {
            if state.player.is_alive() {
                state.player.is_invulnerable = false;
            }
        }
        TimerEvent::ShieldFlashOver => state.player.shield_flash = false,
        TimerEvent::ThrustUnlock => state.player.thrust_locked = false,
    }
    false
}

fn handle_actions(state: &mut GameState, input: &TickInput) {
    if !state.player.is_alive() {
        return;
    }
    if input.shield {
        state.player.shield = !state.player.shield;
        log::debug!("Shield {}", if state.player.shield { "up" } else { "down" });
    }
    if input.fire {
        let (pos, angle, vel) = (
            state.player.pos(),
            state.player.angle(),
            state.player.vel(),
        );
        let fired = state.projectiles.shoot(pos, angle, vel);
        play_or_warn(state, fired.map(|s| s.map(SoundCmd::Play)));
    }
}

/// Forward a spawn's sound, or log why the spawn was dropped
fn play_or_warn(state: &mut GameState, result: Result<Option<SoundCmd>, SimError>) {
    match result {
        Ok(Some(cmd)) => state.emit_sound(cmd),
        Ok(None) => {}
        Err(e) => log::warn!("Spawn dropped: {e}"),
    }
}

fn explode(state: &mut GameState, kind: ExplosionKind, pos: Vec2, scale: f32) {
    let result = state
        .explosions
        .explode(kind, pos, scale, &mut state.rng)
        .map(|s| Some(SoundCmd::Play(s)));
    play_or_warn(state, result);
}

fn apply_hits(state: &mut GameState, hits: &ProjectileHits) {
    if hits.is_empty() {
        return;
    }

    // Shot rocks are re-rolled in place, so indices stay valid
    for &ai in &hits.asteroids {
        let Some(rock) = state.asteroids.asteroids().get(ai) else {
            continue;
        };
        let (pos, scale) = (rock.pos(), rock.scale() * 2.0);
        explode(state, ExplosionKind::Rock, pos, scale);
        state.asteroids.respawn(ai, &mut state.rng);
        state.asteroids_destroyed += 1;
        state.add_score(state.settings.scoring.asteroid);
    }

    let enemy_scale = state.explosions.default_scale(ExplosionKind::Enemy);
    for enemy in state.enemies.remove(&hits.enemies) {
        explode(state, ExplosionKind::Enemy, enemy.pos(), enemy_scale);
        state.kills += 1;
        state.add_score(state.settings.scoring.enemy);
    }

    state.projectiles.retire(&hits.projectiles);
    state.emit(GameEvent::Score(state.score));
}

fn apply_contacts(
    state: &mut GameState,
    contacts: &PlayerContacts,
    hits: &ProjectileHits,
    now_ms: f64,
) {
    if contacts.is_empty() {
        return;
    }

    // A rock shot this frame was already replaced
    for &ai in &contacts.asteroids {
        if !hits.asteroids.contains(&ai) {
            state.asteroids.respawn(ai, &mut state.rng);
        }
    }

    if state.player.is_invulnerable {
        return;
    }

    state.enemy_projectiles.retire(&contacts.enemy_projectiles);

    if state.player.shield {
        state.player.shield_flash = true;
        state.emit_sound(SoundCmd::Play(SoundId::ShieldHit));
        let flash_ms = state.settings.timing.shield_flash_ms;
        state.timers.schedule(TimerEvent::ShieldFlashOver, flash_ms, now_ms);
        log::debug!("Shield absorbed a hit");
        return;
    }

    let pos = state.player.pos();
    state.player.explode();
    state.deaths += 1;
    let scale = state.explosions.default_scale(ExplosionKind::Player);
    explode(state, ExplosionKind::Player, pos, scale);
    let delay_ms = state.settings.timing.respawn_delay_ms;
    state.timers.schedule(TimerEvent::Respawn, delay_ms, now_ms);
    log::info!("Player destroyed (score {})", state.score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::hitbox::HasHitBox;

    const FRAME: f64 = 1000.0 / 60.0;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(Settings::default(), seed).unwrap();
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            0.0,
        );
        state.drain_events();
        state
    }

    /// Step `frames` idle frames with the ship untouchable
    fn warm_up(state: &mut GameState, frames: u32) {
        state.player.is_invulnerable = true;
        for _ in 0..frames {
            let now = state.now_ms + FRAME;
            tick(state, &TickInput::default(), now);
        }
        state.player.is_invulnerable = false;
        state.drain_events();
    }

    /// A rock comfortably on screen and where it will be next frame
    fn on_screen_rock(state: &GameState) -> (usize, Vec2) {
        state
            .asteroids
            .asteroids()
            .iter()
            .enumerate()
            .map(|(i, a)| (i, a.pos() + a.vel()))
            .find(|(_, p)| p.x > 45.0 && p.x < 755.0 && p.y > 45.0 && p.y < 755.0)
            .expect("no rock on screen")
    }

    /// Clear the field: no rocks nearby, no enemies, nothing scheduled
    fn empty_field(state: &mut GameState) {
        while state.asteroids.destroy(0).is_some() {}
        state.enemies.reset();
        state.timers.clear();
        state.drain_events();
    }

    fn positions(state: &GameState) -> Vec<Vec2> {
        let mut out = vec![state.player.pos()];
        out.extend(state.asteroids.asteroids().iter().map(|a| a.pos()));
        out.extend(state.enemies.enemies().iter().map(|e| e.pos()));
        out.extend(state.projectiles.projectiles().iter().map(|p| p.pos()));
        out
    }

    #[test]
    fn test_title_waits_for_start() {
        let mut state = GameState::new(Settings::default(), 1).unwrap();
        let before = positions(&state);
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.phase, GamePhase::Title);
        assert_eq!(positions(&state), before);

        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            FRAME,
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::Sound(SoundCmd::Loop(SoundId::Music)))
        );
    }

    #[test]
    fn test_invulnerable_contact_is_harmless() {
        let mut state = playing(3);
        warm_up(&mut state, 200);
        let score = state.score;
        let deaths = state.deaths;

        let (i, landing) = on_screen_rock(&state);
        state.player.set_position(landing).unwrap();
        state.player.is_invulnerable = true;
        let now = state.now_ms + FRAME;
        tick(&mut state, &TickInput::default(), now);

        assert_eq!(state.score, score);
        assert_eq!(state.deaths, deaths);
        assert!(state.player.is_alive());
        // The rock was re-rolled somewhere else
        assert!(state.asteroids.asteroids()[i].pos().distance(landing) > 1.0);
        assert_eq!(state.asteroids.len(), 10);
    }

    #[test]
    fn test_unshielded_contact_kills_then_respawns() {
        let mut state = playing(4);
        warm_up(&mut state, 200);
        let (_, landing) = on_screen_rock(&state);
        state.player.set_position(landing).unwrap();

        let t = state.now_ms + FRAME;
        tick(&mut state, &TickInput::default(), t);
        assert!(!state.player.is_alive());
        assert_eq!(state.deaths, 1);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::Sound(SoundCmd::Play(SoundId::PlayerExplosion)))
        );

        // Respawn fires after the configured delay, not before
        tick(&mut state, &TickInput::default(), t + 1999.0);
        assert!(!state.player.is_alive());
        tick(&mut state, &TickInput::default(), t + 2000.0);
        assert!(state.player.is_alive());
        assert!(state.player.is_invulnerable);
        assert_eq!(state.player.pos(), state.settings.field.center());
        assert_eq!(state.score, 0);

        // Grace runs out
        tick(&mut state, &TickInput::default(), t + 3600.0);
        assert!(!state.player.is_invulnerable);
    }

    #[test]
    fn test_shield_absorbs_and_flashes() {
        let mut state = playing(5);
        warm_up(&mut state, 200);
        let t = state.now_ms + FRAME;
        tick(
            &mut state,
            &TickInput {
                shield: true,
                ..Default::default()
            },
            t,
        );
        assert!(state.player.shield);

        let (_, landing) = on_screen_rock(&state);
        state.player.set_position(landing).unwrap();
        tick(&mut state, &TickInput::default(), t + FRAME);

        assert!(state.player.is_alive());
        assert!(state.player.shield_flash);
        assert_eq!(state.deaths, 0);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::Sound(SoundCmd::Play(SoundId::ShieldHit)))
        );

        tick(&mut state, &TickInput::default(), t + FRAME + 200.0);
        assert!(!state.player.shield_flash);
    }

    #[test]
    fn test_shot_rock_scores_and_is_replaced() {
        let mut state = playing(6);
        warm_up(&mut state, 200);
        let before = state.asteroids_destroyed;
        let (_, target) = on_screen_rock(&state);

        // A shot that lands exactly on the rock next frame
        state
            .projectiles
            .shoot(target - Vec2::new(20.0, 0.0), 0.0, Vec2::ZERO)
            .unwrap();
        state.player.is_invulnerable = true;
        let now = state.now_ms + FRAME;
        tick(&mut state, &TickInput::default(), now);

        assert!(state.asteroids_destroyed > before);
        assert!(state.score >= 10);
        assert_eq!(state.asteroids.len(), 10);
        assert!(state.projectiles.projectiles().is_empty());
        assert!(!state.explosions.explosions().is_empty());
        assert!(state.drain_events().contains(&GameEvent::Score(state.score)));
    }

    #[test]
    fn test_shot_enemy_scores_and_next_wave_is_planned() {
        let mut state = playing(14);
        empty_field(&mut state);
        state.player.is_invulnerable = true;
        let target = Vec2::new(400.0, 200.0);
        state.enemies.spawn_at(target, state.now_ms);
        state
            .projectiles
            .shoot(target - Vec2::new(20.0, 0.0), 0.0, Vec2::ZERO)
            .unwrap();

        let now = state.now_ms + FRAME;
        tick(&mut state, &TickInput::default(), now);

        assert!(state.enemies.is_empty());
        assert_eq!(state.kills, 1);
        assert_eq!(state.score, state.settings.scoring.enemy);
        assert!(state.projectiles.projectiles().is_empty());
        assert!(
            state
                .explosions
                .explosions()
                .iter()
                .any(|x| x.kind() == ExplosionKind::Enemy)
        );
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Sound(SoundCmd::Play(SoundId::EnemyExplosion))));
        assert!(events.contains(&GameEvent::Score(state.score)));
        // An empty field gets exactly one new wave
        assert!(state.enemies.wave_pending());
        assert_eq!(state.timers.pending(), 1);
    }

    #[test]
    fn test_enemy_shot_kills_unshielded_player() {
        let mut state = playing(15);
        empty_field(&mut state);
        state.player.is_invulnerable = false;
        let pos = state.player.pos();
        state
            .enemy_projectiles
            .shoot(pos - Vec2::new(6.0, 0.0), 0.0, Vec2::ZERO)
            .unwrap();

        let now = state.now_ms + FRAME;
        tick(&mut state, &TickInput::default(), now);

        assert!(!state.player.is_alive());
        assert_eq!(state.deaths, 1);
        assert!(state.enemy_projectiles.projectiles().is_empty());
        assert!(
            state
                .explosions
                .explosions()
                .iter()
                .any(|x| x.kind() == ExplosionKind::Player)
        );
    }

    #[test]
    fn test_shield_absorbs_enemy_shot() {
        let mut state = playing(16);
        empty_field(&mut state);
        state.player.is_invulnerable = false;
        state.player.shield = true;
        let pos = state.player.pos();
        state
            .enemy_projectiles
            .shoot(pos - Vec2::new(6.0, 0.0), 0.0, Vec2::ZERO)
            .unwrap();

        let now = state.now_ms + FRAME;
        tick(&mut state, &TickInput::default(), now);

        assert!(state.player.is_alive());
        assert!(state.player.shield_flash);
        assert_eq!(state.deaths, 0);
        // The bolt is spent on the shield
        assert!(state.enemy_projectiles.projectiles().is_empty());
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::Sound(SoundCmd::Play(SoundId::ShieldHit)))
        );
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut state = playing(8);
        for i in 1..=30 {
            tick(&mut state, &TickInput::default(), i as f64 * FRAME);
        }
        let mut reference = state.clone();
        let t = 31.0 * FRAME;

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, t);
        assert!(state.is_paused());
        let frozen = positions(&state);
        for i in 0..100 {
            tick(&mut state, &TickInput::default(), t + i as f64 * 50.0);
            assert_eq!(positions(&state), frozen);
        }
        // Resuming steps exactly one frame
        tick(&mut state, &pause, t + 6000.0);
        tick(&mut reference, &TickInput::default(), t);
        assert!(state.is_playing());
        assert_eq!(positions(&state), positions(&reference));
    }

    #[test]
    fn test_pause_holds_respawn_countdown() {
        let mut state = playing(9);
        warm_up(&mut state, 200);
        let (_, landing) = on_screen_rock(&state);
        state.player.set_position(landing).unwrap();
        let t = state.now_ms + FRAME;
        tick(&mut state, &TickInput::default(), t);
        assert!(!state.player.is_alive());

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, t + 500.0);
        tick(&mut state, &pause, t + 10_000.0);
        // 500ms were used before the pause, 1500ms remain
        tick(&mut state, &TickInput::default(), t + 11_400.0);
        assert!(!state.player.is_alive());
        tick(&mut state, &TickInput::default(), t + 11_600.0);
        assert!(state.player.is_alive());
    }

    #[test]
    fn test_first_wave_is_scheduled_once() {
        let mut state = playing(10);
        state.player.is_invulnerable = true;
        assert!(state.enemies.wave_pending());
        let pending = state.timers.pending();
        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.timers.pending(), pending);

        let mut t = FRAME;
        while state.enemies.is_empty() {
            t += FRAME;
            tick(&mut state, &TickInput::default(), t);
            assert!(t < 11_000.0, "wave never arrived");
        }
        assert!((2..=5).contains(&state.enemies.len()));
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::Alert(WAVE_ALERT.to_string()))
        );
    }

    #[test]
    fn test_restart_locks_thrust() {
        let mut state = playing(11);
        state.score = 40;
        let input = TickInput {
            restart: true,
            thrust: true,
            ..Default::default()
        };
        tick(&mut state, &input, FRAME);
        assert_eq!(state.record, 40);
        assert_eq!(state.score, 0);
        assert!(state.player.thrust_locked);
        assert_eq!(state.player.vel(), Vec2::ZERO);

        let thrust = TickInput {
            thrust: true,
            ..Default::default()
        };
        tick(&mut state, &thrust, FRAME + 1000.0);
        assert!(!state.player.thrust_locked);
        assert!(state.player.vel().length() > 0.0);
    }

    #[test]
    fn test_fire_emits_laser() {
        let mut state = playing(12);
        tick(
            &mut state,
            &TickInput {
                fire: true,
                ..Default::default()
            },
            FRAME,
        );
        assert_eq!(state.projectiles.projectiles().len(), 1);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::Sound(SoundCmd::Play(SoundId::Laser)))
        );
    }

    #[test]
    fn test_exhausted_pool_drops_shot() {
        let mut settings = Settings::default();
        settings.pools.projectiles = 1;
        let mut state = GameState::new(settings, 13).unwrap();
        let fire = TickInput {
            fire: true,
            start: true,
            ..Default::default()
        };
        tick(&mut state, &fire, 0.0);
        tick(&mut state, &fire, FRAME);
        assert_eq!(state.projectiles.projectiles().len(), 1);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = playing(99);
        let mut b = playing(99);
        for i in 1..600 {
            let input = TickInput {
                thrust: i % 3 == 0,
                rotate_left: i % 7 < 2,
                fire: i % 15 == 0,
                ..Default::default()
            };
            tick(&mut a, &input, i as f64 * FRAME);
            tick(&mut b, &input, i as f64 * FRAME);
        }
        assert_eq!(positions(&a), positions(&b));
        assert_eq!(a.score, b.score);
        assert_eq!(a.player.hitbox(), b.player.hitbox());
    }
}
