//! Text shaping and glyph rasterization using cosmic-text.
//!
//! Wraps a cosmic-text `FontSystem` for shaping and measurement and a
//! `SwashCache` for rasterizing glyphs straight into a bitmap canvas.

use std::path::Path;

use cosmic_text::{Attrs, AttrsOwned, Buffer, Family, Metrics, Shaping, SwashContent, fontdb};
use image::RgbaImage;

use super::bitmap::blend_pixel;
use super::text::{FontSpec, TextEngine};
use super::{Color, Size};
use crate::Result;

/// Text engine backed by cosmic-text.
///
/// A family of `None` maps to the generic sans-serif family, which fontdb
/// resolves to the platform's system UI font.
pub struct CosmicTextEngine {
    font_system: cosmic_text::FontSystem,
    swash_cache: cosmic_text::SwashCache,
}

impl std::fmt::Debug for CosmicTextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosmicTextEngine")
            .field("faces", &self.font_system.db().len())
            .finish()
    }
}

impl Default for CosmicTextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CosmicTextEngine {
    /// Create an engine with the system fonts loaded.
    pub fn new() -> Self {
        let font_system = cosmic_text::FontSystem::new();
        if font_system.db().is_empty() {
            tracing::warn!("No system fonts found; text will not render");
        }
        Self {
            font_system,
            swash_cache: cosmic_text::SwashCache::new(),
        }
    }

    /// Create an engine over an explicit font database (no system fonts).
    pub fn with_database(db: fontdb::Database) -> Self {
        let font_system = cosmic_text::FontSystem::new_with_locale_and_db("en-US".to_string(), db);
        Self {
            font_system,
            swash_cache: cosmic_text::SwashCache::new(),
        }
    }

    /// Load every font file found under `dir`.
    pub fn load_fonts_dir(&mut self, dir: &Path) {
        let before = self.font_system.db().len();
        self.font_system.db_mut().load_fonts_dir(dir);
        tracing::debug!(
            "Loaded {} font faces from {}",
            self.font_system.db().len() - before,
            dir.display()
        );
    }

    /// Whether a face with this family name is loaded (case-insensitive).
    pub fn has_family(&self, family: &str) -> bool {
        self.font_system
            .db()
            .faces()
            .any(|face| face.families.iter().any(|(name, _)| name.eq_ignore_ascii_case(family)))
    }

    fn attrs_owned(&self, font: &FontSpec) -> Result<AttrsOwned> {
        let attrs = match &font.family {
            Some(name) => {
                if !self.has_family(name) {
                    return Err(font.unresolved());
                }
                Attrs::new().family(Family::Name(name))
            }
            None => Attrs::new().family(Family::SansSerif),
        };
        Ok(AttrsOwned::new(&attrs))
    }

    /// Shape `text` into an unbounded buffer.
    fn shape(&mut self, text: &str, font: &FontSpec) -> Result<Buffer> {
        // cosmic-text asserts on a zero line height.
        font.check_size()?;
        let attrs = self.attrs_owned(font)?;
        let metrics = Metrics::new(font.size, font.line_height());
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(
            &mut self.font_system,
            text,
            &attrs.as_attrs(),
            Shaping::Advanced,
            None,
        );
        buffer.shape_until_scroll(&mut self.font_system, true);
        Ok(buffer)
    }
}

impl TextEngine for CosmicTextEngine {
    fn measure(&mut self, text: &str, font: &FontSpec) -> Result<Size> {
        let buffer = self.shape(text, font)?;
        let mut width = 0.0_f32;
        let mut lines = 0u32;
        for run in buffer.layout_runs() {
            width = width.max(run.line_w);
            lines += 1;
        }
        let lines = lines.max(1);
        Ok(Size::new(
            width.ceil() as u32,
            lines * font.line_height() as u32,
        ))
    }

    fn draw(
        &mut self,
        canvas: &mut RgbaImage,
        text: &str,
        origin: (f32, f32),
        font: &FontSpec,
        color: Color,
    ) -> Result<()> {
        let buffer = self.shape(text, font)?;
        let rgba = color.to_rgba8();
        let (ox, oy) = (origin.0.round() as i32, origin.1.round() as i32);

        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                let pg = glyph.physical((0.0, 0.0), 1.0);
                let Some(image) = self
                    .swash_cache
                    .get_image(&mut self.font_system, pg.cache_key)
                    .as_ref()
                else {
                    continue;
                };
                let left = ox + pg.x + image.placement.left;
                let top = oy + run.line_y as i32 + pg.y - image.placement.top;
                write_glyph(canvas, left, top, image, rgba);
            }
        }
        Ok(())
    }
}

/// Blend one rasterized glyph into the canvas.
///
/// Handles all swash content types: Mask (alpha-only), Color (RGBA), SubpixelMask (RGB).
fn write_glyph(
    canvas: &mut RgbaImage,
    left: i32,
    top: i32,
    image: &cosmic_text::SwashImage,
    color: [u8; 4],
) {
    let width = image.placement.width as i32;
    let height = image.placement.height as i32;
    for y in 0..height {
        for x in 0..width {
            let i = (y * width + x) as usize;
            match image.content {
                SwashContent::Mask => {
                    let alpha = image.data.get(i).copied().unwrap_or(0);
                    blend_pixel(canvas, left + x, top + y, color, alpha as f32 / 255.0);
                }
                SwashContent::Color => {
                    let px = [
                        image.data.get(i * 4).copied().unwrap_or(0),
                        image.data.get(i * 4 + 1).copied().unwrap_or(0),
                        image.data.get(i * 4 + 2).copied().unwrap_or(0),
                        image.data.get(i * 4 + 3).copied().unwrap_or(0),
                    ];
                    blend_pixel(canvas, left + x, top + y, px, 1.0);
                }
                SwashContent::SubpixelMask => {
                    let alpha = image.data.get(i * 3).copied().unwrap_or(0);
                    blend_pixel(canvas, left + x, top + y, color, alpha as f32 / 255.0);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn empty_engine() -> CosmicTextEngine {
        CosmicTextEngine::with_database(fontdb::Database::new())
    }

    #[test]
    fn named_family_missing_from_database_fails() {
        let mut engine = empty_engine();
        let err = engine
            .measure("Tap me", &FontSpec::new(Some("Arial".into()), 25.0))
            .unwrap_err();
        assert!(matches!(err, Error::FontResolution { ref family, size } if family == "Arial" && size == 25.0));
    }

    #[test]
    fn draw_with_missing_family_leaves_canvas_untouched() {
        let mut engine = empty_engine();
        let mut canvas = RgbaImage::new(8, 8);
        let result = engine.draw(
            &mut canvas,
            "x",
            (0.0, 0.0),
            &FontSpec::new(Some("Nope".into()), 12.0),
            Color::BLACK,
        );
        assert!(result.is_err());
        assert!(canvas.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn zero_or_negative_size_fails_before_shaping() {
        let mut engine = empty_engine();
        for size in [0.0, -0.5, f32::NAN] {
            let err = engine.measure("Hi", &FontSpec::new(None, size)).unwrap_err();
            assert!(matches!(err, Error::FontResolution { ref family, .. } if family == "system"));
        }
        let mut canvas = RgbaImage::new(8, 8);
        let font = FontSpec::new(None, 0.0);
        assert!(engine.draw(&mut canvas, "x", (0.0, 0.0), &font, Color::BLACK).is_err());
    }

    #[test]
    fn has_family_is_false_without_fonts() {
        let engine = empty_engine();
        assert!(!engine.has_family("Arial"));
    }
}
