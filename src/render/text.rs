//! Text measurement and drawing seam.
//!
//! The resolver only sees [`TextEngine`]. [`CosmicTextEngine`](super::CosmicTextEngine)
//! shapes real fonts; [`BlockTextEngine`] draws fixed-advance blocks and needs
//! no font files, which keeps headless rendering deterministic.

use image::RgbaImage;

use super::bitmap::blend_pixel;
use super::{Color, Size};
use crate::{Error, Result};

/// Line height in tenths of the font size (1.2em).
pub const LINE_HEIGHT_TENTHS: f32 = 12.0;

/// Font request: family name (`None` = system font) and point size.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: Option<String>,
    pub size: f32,
}

impl FontSpec {
    pub fn new(family: Option<String>, size: f32) -> Self {
        Self { family, size }
    }

    pub fn line_height(&self) -> f32 {
        (self.size * LINE_HEIGHT_TENTHS / 10.0).ceil()
    }

    pub(crate) fn unresolved(&self) -> Error {
        Error::FontResolution {
            family: self.family.clone().unwrap_or_else(|| "system".to_string()),
            size: self.size,
        }
    }

    /// Fails unless the size is finite and yields a non-empty line.
    pub(crate) fn check_size(&self) -> Result<()> {
        if self.size.is_finite() && self.size > 0.0 && self.line_height() > 0.0 {
            Ok(())
        } else {
            Err(self.unresolved())
        }
    }
}

/// Platform text layout engine.
pub trait TextEngine {
    /// Pixel size of the laid-out text. Fails with
    /// [`Error::FontResolution`] when a named family is unavailable.
    fn measure(&mut self, text: &str, font: &FontSpec) -> Result<Size>;

    /// Draw `text` with its layout box's top-left corner at `origin`.
    fn draw(
        &mut self,
        canvas: &mut RgbaImage,
        text: &str,
        origin: (f32, f32),
        font: &FontSpec,
        color: Color,
    ) -> Result<()>;
}

/// Fixed-advance text engine that renders every visible character as a
/// solid block.
#[derive(Debug, Clone, Default)]
pub struct BlockTextEngine {
    families: Vec<String>,
}

impl BlockTextEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept the given family names in addition to the system font.
    pub fn with_families<I, S>(families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            families: families.into_iter().map(Into::into).collect(),
        }
    }

    pub fn advance(font: &FontSpec) -> u32 {
        (font.size * 6.0 / 10.0).ceil() as u32
    }

    fn check_family(&self, font: &FontSpec) -> Result<()> {
        font.check_size()?;
        match &font.family {
            Some(name) if !self.families.iter().any(|f| f.eq_ignore_ascii_case(name)) => {
                Err(font.unresolved())
            }
            _ => Ok(()),
        }
    }
}

impl TextEngine for BlockTextEngine {
    fn measure(&mut self, text: &str, font: &FontSpec) -> Result<Size> {
        self.check_family(font)?;
        let lines: Vec<&str> = text.split('\n').collect();
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;
        Ok(Size::new(
            widest * Self::advance(font),
            lines.len() as u32 * font.line_height() as u32,
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
        self.check_family(font)?;
        let advance = Self::advance(font) as i32;
        let line_height = font.line_height() as i32;
        // Glyph box: 1px side bearing, cap height from 20% to 90% of the line.
        let top = (line_height as f32 * 0.2) as i32;
        let bottom = (line_height as f32 * 0.9) as i32;
        let rgba = color.to_rgba8();
        let (ox, oy) = (origin.0.round() as i32, origin.1.round() as i32);

        for (row, line) in text.split('\n').enumerate() {
            let line_y = oy + row as i32 * line_height;
            for (col, ch) in line.chars().enumerate() {
                if ch.is_whitespace() {
                    continue;
                }
                let x0 = ox + col as i32 * advance;
                for y in line_y + top..line_y + bottom {
                    for x in x0 + 1..x0 + advance - 1 {
                        blend_pixel(canvas, x, y, rgba, 1.0);
                    }
                }
            }
        }
        Ok(())
    }
}
