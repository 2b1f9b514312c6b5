//! Sound intents
//!
//! The simulation never touches an audio API. It emits [`SoundCmd`]s and the
//! host's [`AudioBackend`] plays them.

use std::collections::HashSet;

/// Logical sound resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundId {
    /// Background track
    Music,
    /// Player laser shot
    Laser,
    /// Asteroid breaking apart
    Explosion,
    /// Player ship destroyed
    PlayerExplosion,
    /// Enemy ship destroyed
    EnemyExplosion,
    /// Shield absorbed a hit
    ShieldHit,
    /// New enemy wave incoming
    WaveAlert,
}

/// A request for the audio backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCmd {
    Play(SoundId),
    /// Play and keep repeating
    Loop(SoundId),
    Pause(SoundId),
}

/// Host audio implementation
pub trait AudioBackend {
    fn play(&mut self, id: SoundId);
    fn pause(&mut self, id: SoundId);
    fn set_looping(&mut self, id: SoundId, looping: bool);
    fn is_playing(&self, id: SoundId) -> bool;

    fn apply(&mut self, cmd: SoundCmd) {
        match cmd {
            SoundCmd::Play(id) => self.play(id),
            SoundCmd::Loop(id) => {
                self.set_looping(id, true);
                self.play(id);
            }
            SoundCmd::Pause(id) => self.pause(id),
        }
    }
}

/// Flip the music on or off. Returns whether sound is now enabled.
pub fn toggle_music(audio: &mut impl AudioBackend) -> bool {
    if audio.is_playing(SoundId::Music) {
        audio.pause(SoundId::Music);
        log::info!("Music muted");
        false
    } else {
        audio.set_looping(SoundId::Music, true);
        audio.play(SoundId::Music);
        log::info!("Music unmuted");
        true
    }
}

/// Backend that plays nothing but remembers what would be playing.
///
/// One-shot effects are considered finished as soon as they start.
#[derive(Debug, Default)]
pub struct SilentAudio {
    looping: HashSet<SoundId>,
    playing: HashSet<SoundId>,
    /// Every play request received, in order
    pub history: Vec<SoundId>,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioBackend for SilentAudio {
    fn play(&mut self, id: SoundId) {
        self.history.push(id);
        if self.looping.contains(&id) {
            self.playing.insert(id);
        }
    }

    fn pause(&mut self, id: SoundId) {
        self.playing.remove(&id);
    }

    fn set_looping(&mut self, id: SoundId, looping: bool) {
        if looping {
            self.looping.insert(id);
        } else {
            self.looping.remove(&id);
        }
    }

    fn is_playing(&self, id: SoundId) -> bool {
        self.playing.contains(&id)
    }
}
