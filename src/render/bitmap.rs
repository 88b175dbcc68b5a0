//! Immutable bitmaps and the raster operations used to synthesize them.

use std::path::Path;
use std::sync::Arc;

use image::{Rgba, RgbaImage};

use super::{Color, Size};
use crate::Result;

/// Highest channel value treated as the transparency key after a texture
/// has been flattened over black. Applies to R, G and B independently.
pub const COLOR_KEY_MAX: u8 = 50;

/// An immutable RGBA pixel buffer, shared by reference.
///
/// Cloning a `Bitmap` never copies pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    pixels: Arc<RgbaImage>,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Bitmap {
    pub fn new(image: RgbaImage) -> Self {
        Self { pixels: Arc::new(image) }
    }

    pub fn from_shared(pixels: Arc<RgbaImage>) -> Self {
        Self { pixels }
    }

    /// A bitmap of the given size filled with one color.
    pub fn filled(size: Size, color: Color) -> Self {
        let mut image = RgbaImage::new(size.width, size.height);
        fill(&mut image, color);
        Self::new(image)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// RGBA value at `(x, y)`, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn shared(&self) -> Arc<RgbaImage> {
        Arc::clone(&self.pixels)
    }

    /// Whether both bitmaps share the same pixel storage.
    pub fn ptr_eq(&self, other: &Bitmap) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.pixels.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

/// Overwrite every pixel with `color`.
pub fn fill(canvas: &mut RgbaImage, color: Color) {
    let px = Rgba(color.to_rgba8());
    for p in canvas.pixels_mut() {
        *p = px;
    }
}

/// Synthesize a solid background, optionally clipped to a rounded rectangle.
///
/// Pixels outside the rounded corners stay fully transparent; the corner
/// edge is anti-aliased by pixel-center distance.
pub fn solid_background(size: Size, color: Color, corner_radius: Option<f32>) -> RgbaImage {
    let mut image = RgbaImage::new(size.width, size.height);
    let (w, h) = (size.width as f32, size.height as f32);
    let radius = corner_radius.unwrap_or(0.0).min(w / 2.0).min(h / 2.0);
    if radius <= 0.0 {
        fill(&mut image, color);
        return image;
    }

    let [r, g, b, a] = color.to_rgba8();
    for (x, y, px) in image.enumerate_pixels_mut() {
        let cx = x as f32 + 0.5;
        let cy = y as f32 + 0.5;
        let dx = (radius - cx).max(cx - (w - radius)).max(0.0);
        let dy = (radius - cy).max(cy - (h - radius)).max(0.0);
        let dist = (dx * dx + dy * dy).sqrt();
        let coverage = (radius - dist + 0.5).clamp(0.0, 1.0);
        if coverage > 0.0 {
            *px = Rgba([r, g, b, (a as f32 * coverage).round() as u8]);
        }
    }
    image
}

/// Map every pixel whose R, G and B all lie in `[0, COLOR_KEY_MAX]` to fully
/// transparent.
///
/// Lossy: genuinely dark content in that range is destroyed along with the
/// black fill left behind by flattening a texture.
pub fn mask_color_key(image: &mut RgbaImage) {
    for px in image.pixels_mut() {
        let [r, g, b, _] = px.0;
        if r <= COLOR_KEY_MAX && g <= COLOR_KEY_MAX && b <= COLOR_KEY_MAX {
            *px = Rgba([0, 0, 0, 0]);
        }
    }
}

/// Alpha-blend `src` onto `canvas` with its top-left corner at `(x, y)`.
pub fn draw_image_at(canvas: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    image::imageops::overlay(canvas, src, x, y);
}

/// Source-over blend of one color into the canvas, scaled by `coverage`.
///
/// Out-of-bounds coordinates are ignored.
pub(crate) fn blend_pixel(canvas: &mut RgbaImage, x: i32, y: i32, color: [u8; 4], coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
        return;
    }
    let src_a = (color[3] as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    let dst_a = dst.0[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    let mut out = [0u8; 4];
    for i in 0..3 {
        let s = color[i] as f32 / 255.0;
        let d = dst.0[i] as f32 / 255.0;
        let c = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
        out[i] = (c * 255.0).round() as u8;
    }
    out[3] = (out_a * 255.0).round() as u8;
    *dst = Rgba(out);
}
