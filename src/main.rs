//! Rock Raider - headless entry point
//!
//! Plays a scripted session without a window: useful for soak-testing
//! settings files and checking determinism from the command line.
//!
//! Usage: `rock-raider [settings.json] [seed] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use glam::Vec2;
    use rock_raider::audio::SilentAudio;
    use rock_raider::hud::LogHud;
    use rock_raider::input::Key;
    use rock_raider::render::{DrawCmd, Renderer};
    use rock_raider::{FrameOutcome, Runner, Settings};

    /// Counts what would have been drawn
    #[derive(Default)]
    struct CountingRenderer {
        frames: u64,
        cmds: u64,
    }

    impl Renderer for CountingRenderer {
        fn begin(&mut self, _size: Vec2) {}

        fn draw(&mut self, _cmd: &DrawCmd) {
            self.cmds += 1;
        }

        fn present(&mut self) {
            self.frames += 1;
        }
    }

    env_logger::init();
    log::info!("Rock Raider (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) if path != "-" => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading settings from {path}"))?;
            Settings::from_json(&json).with_context(|| format!("parsing {path}"))?
        }
        _ => Settings::default(),
    };
    let seed: u64 = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid seed {s:?}"))?,
        None => 0x5eed,
    };
    let seconds: f64 = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid duration {s:?}"))?,
        None => 60.0,
    };

    let mut runner = Runner::new(settings, seed)?;
    let mut renderer = CountingRenderer::default();
    let mut audio = SilentAudio::new();
    let mut hud = LogHud::default();

    // Simulated 60 Hz display
    let host_frame_ms = 1000.0 / 60.0;
    let total = (seconds * 60.0) as u64;
    let mut stepped = 0u64;

    runner.keys.key_down(Key::Start);
    for i in 0..total {
        // Circle-strafe: thrust in bursts, turn steadily, fire twice a second
        if i % 90 == 0 {
            runner.keys.key_down(Key::Thrust);
        } else if i % 90 == 30 {
            runner.keys.key_up(Key::Thrust);
        }
        if i % 240 == 0 {
            runner.keys.key_down(Key::RotateRight);
        } else if i % 240 == 120 {
            runner.keys.key_up(Key::RotateRight);
        }
        if i % 30 == 0 {
            runner.keys.key_down(Key::Fire);
        } else if i % 30 == 1 {
            runner.keys.key_up(Key::Fire);
        }

        // Add a little jitter so the pacer has something to do
        let now = i as f64 * host_frame_ms + (i % 3) as f64 * 0.5;
        if let FrameOutcome::Stepped(n) = runner.frame(now, &mut renderer, &mut audio, &mut hud) {
            stepped += n as u64;
        }
    }

    let state = &runner.state;
    log::info!(
        "Ran {} host frames ({} steps, {} draw commands)",
        total,
        stepped,
        renderer.cmds
    );
    log::info!(
        "Score {} / record {} | rocks {} | enemies {} | deaths {} | waves alerted {}",
        state.score,
        state.record.max(state.score),
        state.asteroids_destroyed,
        state.kills,
        state.deaths,
        hud.alerts.len()
    );
    println!(
        "seed={} frames={} score={} record={} deaths={}",
        seed,
        state.frame,
        state.score,
        state.record.max(state.score),
        state.deaths
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `rock_raider::Runner` from their own frame callback
}
