use rodio::stream::{OutputStream, OutputStreamBuilder};
use rodio::{Decoder, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::{SoundPlayer, resolve_sound_path};

/// Plays button sounds through the default audio device via rodio.
pub struct SoundManager {
    stream: OutputStream,
    active: Vec<Sink>,
    sound_dir: PathBuf,
}

impl std::fmt::Debug for SoundManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundManager")
            .field("sound_dir", &self.sound_dir)
            .field("active", &self.active.len())
            .finish()
    }
}

impl SoundManager {
    /// Initialize audio output. Returns `None` if no audio device is available.
    pub fn new(sound_dir: PathBuf) -> Option<Self> {
        let stream = OutputStreamBuilder::from_default_device()
            .ok()?
            .open_stream_or_fallback()
            .ok()?;
        Some(Self {
            stream,
            active: Vec::new(),
            sound_dir,
        })
    }

    /// Returns whether playback started.
    pub fn play_sound_file(&mut self, name: &str) -> bool {
        // Remove finished sinks to free resources.
        self.active.retain(|sink| !sink.empty());
        let Some(path) = resolve_sound_path(&self.sound_dir, name) else {
            tracing::warn!("Sound not found: {name}");
            return false;
        };
        match self.play_file(&path) {
            Some(sink) => {
                self.active.push(sink);
                true
            }
            None => {
                tracing::warn!("Failed to decode sound {}", path.display());
                false
            }
        }
    }

    fn play_file(&self, path: &Path) -> Option<Sink> {
        let file = File::open(path).ok()?;
        let source = Decoder::new(BufReader::new(file)).ok()?;
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        Some(sink)
    }
}

impl SoundPlayer for SoundManager {
    fn play_sound(&mut self, name: &str) {
        self.play_sound_file(name);
    }
}
