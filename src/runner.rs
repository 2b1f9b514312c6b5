//! Frame driver
//!
//! The host calls [`Runner::frame`] from its refresh callback. The runner
//! decides how many simulation steps that frame gets, feeds them input,
//! forwards the resulting events to the host's audio and HUD, and draws.

use crate::audio::{AudioBackend, toggle_music};
use crate::error::SimError;
use crate::hud::Hud;
use crate::input::KeyTracker;
use crate::render::{Renderer, render};
use crate::settings::{Pacing, Settings, TimingSettings};
use crate::sim::{GameEvent, GameState, tick};

/// What a host frame amounted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Called too soon; nothing simulated or drawn
    Skipped,
    /// Ran this many simulation steps, then drew
    Stepped(u32),
}

/// Turns host timestamps into simulation step times
#[derive(Debug, Clone)]
pub struct FramePacer {
    pacing: Pacing,
    frame_ms: f64,
    max_substeps: u32,
    last_ms: Option<f64>,
    accumulator: f64,
    /// Simulation clock under `Pacing::Fixed`
    sim_ms: f64,
}

impl FramePacer {
    pub fn new(timing: &TimingSettings) -> Self {
        Self {
            pacing: timing.pacing,
            frame_ms: timing.frame_ms(),
            max_substeps: timing.max_substeps.max(1),
            last_ms: None,
            accumulator: 0.0,
            sim_ms: 0.0,
        }
    }

    pub fn frame_ms(&self) -> f64 {
        self.frame_ms
    }

    /// Timestamps of the steps due at host time `now_ms`
    pub fn due(&mut self, now_ms: f64) -> Vec<f64> {
        let Some(last) = self.last_ms else {
            self.last_ms = Some(now_ms);
            self.sim_ms = now_ms;
            return vec![now_ms];
        };
        let elapsed = (now_ms - last).max(0.0);

        match self.pacing {
            Pacing::Gate => {
                if elapsed < self.frame_ms {
                    return Vec::new();
                }
                // Keep the cadence aligned to the frame grid
                self.last_ms = Some(now_ms - elapsed % self.frame_ms);
                vec![now_ms]
            }
            Pacing::Fixed => {
                self.last_ms = Some(now_ms);
                let cap = self.frame_ms * self.max_substeps as f64;
                self.accumulator += elapsed.min(cap);

                let mut steps = Vec::new();
                let max = self.max_substeps as usize;
                while self.accumulator >= self.frame_ms && steps.len() < max {
                    self.sim_ms += self.frame_ms;
                    self.accumulator -= self.frame_ms;
                    steps.push(self.sim_ms);
                }
                steps
            }
        }
    }
}

/// Owns a game plus everything needed to drive it from a host loop
#[derive(Debug, Clone)]
pub struct Runner {
    pub state: GameState,
    pub keys: KeyTracker,
    pacer: FramePacer,
}

impl Runner {
    pub fn new(settings: Settings, seed: u64) -> Result<Self, SimError> {
        let pacer = FramePacer::new(&settings.timing);
        Ok(Self {
            state: GameState::new(settings, seed)?,
            keys: KeyTracker::new(),
            pacer,
        })
    }

    /// Run one host frame at `now_ms`
    pub fn frame(
        &mut self,
        now_ms: f64,
        renderer: &mut impl Renderer,
        audio: &mut impl AudioBackend,
        hud: &mut impl Hud,
    ) -> FrameOutcome {
        let steps = self.pacer.due(now_ms);
        if steps.is_empty() {
            return FrameOutcome::Skipped;
        }

        // Presses are only consumed on frames that actually step
        let input = self.keys.snapshot();
        if input.mute {
            self.state.settings.audio.enable_sound = toggle_music(audio);
        }

        // Edges go to the first substep only
        let held = input.held_only();
        for (i, &at) in steps.iter().enumerate() {
            tick(&mut self.state, if i == 0 { &input } else { &held }, at);
        }

        for event in self.state.drain_events() {
            match event {
                GameEvent::Sound(cmd) => audio.apply(cmd),
                GameEvent::Score(score) => hud.set_score(score),
                GameEvent::Record(record) => hud.set_record(record),
                GameEvent::Alert(text) => hud.alert(&text),
                GameEvent::Paused(paused) => hud.set_paused(paused),
            }
        }

        render(&self.state, renderer);
        FrameOutcome::Stepped(steps.len() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{SilentAudio, SoundId};
    use crate::hud::LogHud;
    use crate::input::Key;
    use crate::render::DrawCmd;
    use crate::sim::GamePhase;
    use glam::Vec2;

    #[derive(Default)]
    struct Frames(u32);

    impl Renderer for Frames {
        fn begin(&mut self, _size: Vec2) {}
        fn draw(&mut self, _cmd: &DrawCmd) {}
        fn present(&mut self) {
            self.0 += 1;
        }
    }

    fn fixed() -> TimingSettings {
        TimingSettings {
            pacing: Pacing::Fixed,
            ..Default::default()
        }
    }

    #[test]
    fn test_gate_skips_early_frames() {
        let mut pacer = FramePacer::new(&TimingSettings::default());
        assert_eq!(pacer.due(0.0).len(), 1);
        // A 144 Hz host calls back about every 7ms
        assert!(pacer.due(7.0).is_empty());
        assert!(pacer.due(14.0).is_empty());
        assert_eq!(pacer.due(21.0), vec![21.0]);
        // Never more than one step, however late
        assert_eq!(pacer.due(500.0).len(), 1);
    }

    #[test]
    fn test_fixed_accumulates_and_caps() {
        let mut pacer = FramePacer::new(&fixed());
        let frame = pacer.frame_ms();
        pacer.due(0.0);
        assert_eq!(pacer.due(frame * 2.5).len(), 2);
        // Leftover half frame carries over
        assert_eq!(pacer.due(frame * 3.5).len(), 1);
        // A long stall is clamped to max_substeps
        assert_eq!(pacer.due(frame * 1000.0).len(), 4);
    }

    #[test]
    fn test_runner_plays_a_round() {
        let mut runner = Runner::new(Settings::default(), 5).unwrap();
        let (mut frames, mut audio, mut hud) =
            (Frames::default(), SilentAudio::new(), LogHud::default());
        let frame_ms = 20.0;

        runner.keys.key_down(Key::Start);
        let outcome = runner.frame(0.0, &mut frames, &mut audio, &mut hud);
        assert_eq!(outcome, FrameOutcome::Stepped(1));
        assert_eq!(runner.state.phase, GamePhase::Playing);
        assert!(audio.is_playing(SoundId::Music));

        runner.keys.key_down(Key::Fire);
        assert_eq!(
            runner.frame(5.0, &mut frames, &mut audio, &mut hud),
            FrameOutcome::Skipped
        );
        // The press survives the skipped frame
        runner.frame(frame_ms, &mut frames, &mut audio, &mut hud);
        assert_eq!(runner.state.projectiles.projectiles().len(), 1);
        assert_eq!(audio.history.last(), Some(&SoundId::Laser));
        assert_eq!(frames.0, 2);

        runner.keys.key_down(Key::Pause);
        runner.frame(2.0 * frame_ms, &mut frames, &mut audio, &mut hud);
        assert!(hud.paused);
    }

    #[test]
    fn test_mute_toggles_music_and_effects() {
        let mut runner = Runner::new(Settings::default(), 5).unwrap();
        let (mut frames, mut audio, mut hud) =
            (Frames::default(), SilentAudio::new(), LogHud::default());
        let frame_ms = 20.0;

        runner.keys.key_down(Key::Start);
        runner.frame(0.0, &mut frames, &mut audio, &mut hud);

        runner.keys.key_down(Key::Mute);
        runner.frame(frame_ms, &mut frames, &mut audio, &mut hud);
        assert!(!audio.is_playing(SoundId::Music));
        assert!(!runner.state.settings.audio.enable_sound);

        // Muted: shots are silent
        let played = audio.history.len();
        runner.keys.key_down(Key::Fire);
        runner.frame(2.0 * frame_ms, &mut frames, &mut audio, &mut hud);
        assert_eq!(audio.history.len(), played);

        runner.keys.key_up(Key::Mute);
        runner.keys.key_down(Key::Mute);
        runner.frame(3.0 * frame_ms, &mut frames, &mut audio, &mut hud);
        assert!(audio.is_playing(SoundId::Music));
        assert!(runner.state.settings.audio.enable_sound);
    }

    #[test]
    fn test_fixed_runner_substeps_once_per_edge() {
        let settings = Settings {
            timing: fixed(),
            ..Default::default()
        };
        let mut runner = Runner::new(settings, 5).unwrap();
        let (mut frames, mut audio, mut hud) =
            (Frames::default(), SilentAudio::new(), LogHud::default());
        runner.keys.key_down(Key::Start);
        runner.frame(0.0, &mut frames, &mut audio, &mut hud);

        runner.keys.key_down(Key::Fire);
        let frame_ms = 1000.0 / 60.0;
        let outcome = runner.frame(3.5 * frame_ms, &mut frames, &mut audio, &mut hud);
        assert_eq!(outcome, FrameOutcome::Stepped(3));
        assert_eq!(runner.state.projectiles.projectiles().len(), 1);
    }
}
