use std::path::PathBuf;

use super::{SoundPlayer, resolve_sound_path};

/// Sound manager used when the `sound` feature is disabled.
///
/// Resolves files so missing sounds are still reported, but plays nothing.
#[derive(Debug)]
pub struct SoundManager {
    sound_dir: PathBuf,
}

impl SoundManager {
    pub fn new(sound_dir: PathBuf) -> Option<Self> {
        Some(Self { sound_dir })
    }

    /// Returns whether the sound file exists.
    pub fn play_sound_file(&mut self, name: &str) -> bool {
        match resolve_sound_path(&self.sound_dir, name) {
            Some(path) => {
                tracing::debug!("Sound playback disabled, skipping {}", path.display());
                true
            }
            None => {
                tracing::warn!("Sound not found: {name}");
                false
            }
        }
    }
}

impl SoundPlayer for SoundManager {
    fn play_sound(&mut self, name: &str) {
        self.play_sound_file(name);
    }
}
