//! Fire-and-forget playback of click and disable sounds.
//!
//! When the `sound` feature is disabled (e.g. during tests), `SoundManager`
//! only resolves and logs the requested file; nothing is played.

#[cfg(feature = "sound")]
mod real;

#[cfg(feature = "sound")]
pub use real::SoundManager;

#[cfg(not(feature = "sound"))]
mod stub;

#[cfg(not(feature = "sound"))]
pub use stub::SoundManager;

use std::path::{Path, PathBuf};

/// Plays a named sound without waiting for completion.
pub trait SoundPlayer {
    fn play_sound(&mut self, name: &str);
}

/// Resolve a sound name against `sound_dir`, trying the name as given and
/// then with common audio extensions appended.
pub(crate) fn resolve_sound_path(sound_dir: &Path, name: &str) -> Option<PathBuf> {
    let direct = if Path::new(name).is_absolute() {
        PathBuf::from(name)
    } else {
        sound_dir.join(name)
    };
    if direct.is_file() {
        return Some(direct);
    }
    ["wav", "ogg", "mp3", "caf"]
        .iter()
        .map(|ext| sound_dir.join(format!("{name}.{ext}")))
        .find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_with_and_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("click.wav"), b"RIFF").unwrap();
        assert_eq!(
            resolve_sound_path(dir.path(), "click"),
            Some(dir.path().join("click.wav"))
        );
        assert_eq!(
            resolve_sound_path(dir.path(), "click.wav"),
            Some(dir.path().join("click.wav"))
        );
        assert_eq!(resolve_sound_path(dir.path(), "boing"), None);
    }
}
