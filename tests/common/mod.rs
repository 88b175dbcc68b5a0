//! Shared test helpers.

use std::cell::RefCell;
use std::rc::Rc;

use image::{Rgba, RgbaImage};
use sprite_button::render::BlockTextEngine;
use sprite_button::sound::SoundPlayer;
use sprite_button::{Bitmap, MemoryAssets, Resolver};

pub const BLUE: [u8; 4] = [0, 0, 255, 255];
pub const YELLOW: [u8; 4] = [255, 255, 0, 255];

/// The demo's named images as flat color plates.
#[allow(dead_code)]
pub fn demo_assets() -> MemoryAssets {
    let mut assets = MemoryAssets::new();
    assets.insert("back.png", plate(64, 32, BLUE));
    assets.insert("back_d.png", plate(64, 32, [255, 0, 0, 255]));
    assets.insert("bkbtn.png", plate(180, 48, YELLOW));
    assets
}

pub fn plate(width: u32, height: u32, rgba: [u8; 4]) -> Bitmap {
    Bitmap::new(RgbaImage::from_pixel(width, height, Rgba(rgba)))
}

/// Resolver over the demo images with deterministic block glyphs.
#[allow(dead_code)]
pub fn block_resolver() -> Resolver {
    Resolver::new(demo_assets(), BlockTextEngine::new())
}

/// Sound player that records the names it was asked to play.
#[derive(Debug, Default, Clone)]
#[allow(dead_code)]
pub struct RecordingPlayer {
    pub played: Rc<RefCell<Vec<String>>>,
}

impl SoundPlayer for RecordingPlayer {
    fn play_sound(&mut self, name: &str) {
        self.played.borrow_mut().push(name.to_string());
    }
}
