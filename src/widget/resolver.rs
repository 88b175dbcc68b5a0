//! Style resolution: turns one [`StyleDescriptor`] into one [`Bitmap`].
//!
//! Background selection, in priority order:
//! - a named image, loaded through the [`AssetLoader`];
//! - a texture with no label, used as-is (shared, not copied);
//! - a texture with a label, rasterized and then color-keyed so the black
//!   the rasterizer leaves behind becomes transparent again;
//! - otherwise a solid fill (optionally rounded) sized to the box or label.
//!
//! A label, when present, is composited on top of the background.

use std::cell::RefCell;
use std::rc::Rc;

use image::RgbaImage;

use crate::config::StyleDefaults;
use crate::render::{
    Bitmap, Color, FontSpec, Size, TextEngine, draw_image_at, fill, mask_color_key,
    solid_background,
};
use crate::texture::{AssetLoader, SoftwareRasterizer, TextureRasterizer};
use crate::{Error, Result};

use super::style::StyleDescriptor;

/// A measured text label ready to draw.
#[derive(Debug)]
struct Label<'a> {
    text: &'a str,
    font: FontSpec,
    color: Color,
    size: Size,
}

/// Synthesizes bitmaps from style descriptors.
///
/// Cloning is cheap: collaborators are shared, and every button built from
/// one resolver uses the same asset cache and text engine.
#[derive(Clone)]
pub struct Resolver {
    assets: Rc<dyn AssetLoader>,
    text: Rc<RefCell<dyn TextEngine>>,
    rasterizer: Rc<dyn TextureRasterizer>,
    defaults: Rc<StyleDefaults>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// Resolver with the software rasterizer and built-in defaults.
    pub fn new(assets: impl AssetLoader + 'static, text: impl TextEngine + 'static) -> Self {
        Self {
            assets: Rc::new(assets),
            text: Rc::new(RefCell::new(text)),
            rasterizer: Rc::new(SoftwareRasterizer),
            defaults: Rc::new(StyleDefaults::default()),
        }
    }

    pub fn with_rasterizer(mut self, rasterizer: impl TextureRasterizer + 'static) -> Self {
        self.rasterizer = Rc::new(rasterizer);
        self
    }

    pub fn with_defaults(mut self, defaults: StyleDefaults) -> Self {
        self.defaults = Rc::new(defaults);
        self
    }

    pub fn defaults(&self) -> &StyleDefaults {
        &self.defaults
    }

    /// Measure `text` with the descriptor's font, falling back to defaults.
    pub fn measure_text(&self, style: &StyleDescriptor, text: &str) -> Result<Size> {
        self.text.borrow_mut().measure(text, &self.font_for(style))
    }

    fn font_for(&self, style: &StyleDescriptor) -> FontSpec {
        FontSpec::new(
            style.font_name.clone().or_else(|| self.defaults.font_name.clone()),
            style.font_size.unwrap_or(self.defaults.font_size),
        )
    }

    fn background_color(&self, style: &StyleDescriptor) -> Color {
        style.background.unwrap_or(self.defaults.background)
    }

    fn label<'a>(&self, style: &'a StyleDescriptor) -> Result<Option<Label<'a>>> {
        let Some(text) = style.text.as_deref() else {
            return Ok(None);
        };
        let font = self.font_for(style);
        let size = self.text.borrow_mut().measure(text, &font)?;
        Ok(Some(Label {
            text,
            font,
            color: style.text_color.unwrap_or(self.defaults.text_color),
            size,
        }))
    }

    /// Synthesize the bitmap for `style`.
    ///
    /// Pure with respect to the descriptor and the collaborators' content:
    /// resolving the same descriptor twice yields identical pixels.
    pub fn resolve(&self, style: &StyleDescriptor) -> Result<Bitmap> {
        if style.image.is_some() && style.texture.is_some() {
            return Err(Error::ConflictingSources);
        }
        let label = self.label(style)?;

        let background = if let Some(name) = &style.image {
            self.assets.load_image(name)?
        } else if let Some(texture) = &style.texture {
            if label.is_none() {
                tracing::debug!("Using texture {:?} directly", texture.size());
                return Ok(texture.as_bitmap());
            }
            let raster = self.rasterizer.rasterize(texture)?;
            let mut keyed = raster.as_image().clone();
            mask_color_key(&mut keyed);
            Bitmap::new(keyed)
        } else if let Some(label) = &label {
            let size = style.size.unwrap_or(label.size);
            Bitmap::new(solid_background(
                size,
                self.background_color(style),
                style.corner_radius,
            ))
        } else {
            return Err(Error::SynthesisIncomplete);
        };

        match label {
            Some(label) => self.composite(style, Some(&background), &label),
            None => {
                tracing::debug!("Using image {:?} directly", style.image);
                Ok(background)
            }
        }
    }

    /// Draw the label over the background on a fresh canvas.
    fn composite(
        &self,
        style: &StyleDescriptor,
        background: Option<&Bitmap>,
        label: &Label<'_>,
    ) -> Result<Bitmap> {
        let size = style
            .size
            .or_else(|| background.map(Bitmap::size))
            .unwrap_or(label.size);

        let mut canvas = RgbaImage::new(size.width, size.height);
        match background {
            Some(bg) => draw_image_at(&mut canvas, bg.as_image(), 0, 0),
            None => fill(&mut canvas, self.background_color(style)),
        }

        let origin = if size == label.size {
            (0.0, 0.0)
        } else {
            (
                (size.width as f32 - label.size.width as f32) * 0.5,
                (size.height as f32 - label.size.height as f32) * 0.5,
            )
        };
        self.text
            .borrow_mut()
            .draw(&mut canvas, label.text, origin, &label.font, label.color)?;

        tracing::debug!(
            "Composited label {:?} at {:?} on {}x{} canvas",
            label.text,
            origin,
            size.width,
            size.height
        );
        Ok(Bitmap::new(canvas))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::BlockTextEngine;
    use crate::texture::{MemoryAssets, Texture};
    use image::Rgba;

    fn resolver() -> Resolver {
        let mut assets = MemoryAssets::new();
        assets.insert(
            "back.png",
            Bitmap::new(RgbaImage::from_pixel(80, 40, Rgba([200, 120, 40, 255]))),
        );
        Resolver::new(assets, BlockTextEngine::new())
    }

    #[test]
    fn empty_descriptor_is_incomplete() {
        let err = resolver().resolve(&StyleDescriptor::default()).unwrap_err();
        assert!(matches!(err, Error::SynthesisIncomplete));
    }

    #[test]
    fn image_and_texture_conflict() {
        let style = StyleDescriptor {
            image: Some("back.png".into()),
            texture: Some(Texture::from_image(RgbaImage::new(1, 1))),
            ..StyleDescriptor::default()
        };
        assert!(matches!(resolver().resolve(&style), Err(Error::ConflictingSources)));
    }

    #[test]
    fn missing_image_is_reported() {
        let err = resolver().resolve(&StyleDescriptor::image("nope.png")).unwrap_err();
        assert!(matches!(err, Error::AssetNotFound(ref n) if n == "nope.png"));
    }

    #[test]
    fn image_without_label_is_the_loaded_bitmap() {
        let r = resolver();
        let a = r.resolve(&StyleDescriptor::image("back.png")).unwrap();
        let b = r.resolve(&StyleDescriptor::image("back.png")).unwrap();
        assert!(a.ptr_eq(&b));
        assert_eq!(a.size(), Size::new(80, 40));
    }

    #[test]
    fn label_on_image_uses_image_size() {
        let style = StyleDescriptor {
            text: Some("Go".into()),
            ..StyleDescriptor::image("back.png")
        };
        let bitmap = resolver().resolve(&style).unwrap();
        assert_eq!(bitmap.size(), Size::new(80, 40));
        // Top-left corner is outside the centered label.
        assert_eq!(bitmap.pixel(0, 0), Some([200, 120, 40, 255]));
    }

    #[test]
    fn corner_radius_ignored_for_image_background() {
        let style = StyleDescriptor {
            text: Some("Go".into()),
            corner_radius: Some(12.0),
            ..StyleDescriptor::image("back.png")
        };
        let bitmap = resolver().resolve(&style).unwrap();
        assert_eq!(bitmap.pixel(0, 0), Some([200, 120, 40, 255]));
    }

    #[test]
    fn rounded_text_background() {
        let style = StyleDescriptor {
            text: Some("Tap me".into()),
            background: Some(Color::YELLOW),
            corner_radius: Some(10.0),
            size: Some(Size::new(200, 40)),
            ..StyleDescriptor::default()
        };
        let bitmap = resolver().resolve(&style).unwrap();
        assert_eq!(bitmap.size(), Size::new(200, 40));
        assert_eq!(bitmap.pixel(0, 0).map(|p| p[3]), Some(0));
        assert_eq!(bitmap.pixel(100, 2), Some([255, 255, 0, 255]));
    }

    #[test]
    fn unknown_font_fails_resolution() {
        let style = StyleDescriptor {
            font_name: Some("Arial".into()),
            ..StyleDescriptor::text("Hi")
        };
        assert!(matches!(
            resolver().resolve(&style),
            Err(Error::FontResolution { .. })
        ));
    }

    #[test]
    fn defaults_table_drives_unset_fields() {
        let r = resolver().with_defaults(StyleDefaults {
            background: Color::GREEN,
            font_size: 10.0,
            ..StyleDefaults::default()
        });
        let bitmap = r.resolve(&StyleDescriptor::text("ab")).unwrap();
        assert_eq!(bitmap.size(), Size::new(12, 12));
        assert_eq!(bitmap.pixel(0, 0), Some([0, 255, 0, 255]));
    }
}
