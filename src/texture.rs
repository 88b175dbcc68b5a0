//! Image and texture sources: named image loading, sprite-sheet textures and
//! texture rasterization.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use serde::Deserialize;

use crate::render::{Bitmap, Size, draw_image_at};
use crate::{Error, Result};

/// A pre-loaded texture, shared with whatever cache handed it out.
///
/// Cloning is cheap and never copies pixels. Two textures compare equal only
/// when they share storage.
#[derive(Clone)]
pub struct Texture {
    image: Arc<RgbaImage>,
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture").field("size", &self.size()).finish()
    }
}

impl PartialEq for Texture {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
    }
}

impl Texture {
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image: Arc::new(image) }
    }

    /// Share the bitmap's pixels as a texture.
    pub fn from_bitmap(bitmap: &Bitmap) -> Self {
        Self { image: bitmap.shared() }
    }

    pub fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// View the texture as a displayable bitmap without copying.
    pub fn as_bitmap(&self) -> Bitmap {
        Bitmap::from_shared(Arc::clone(&self.image))
    }
}

/// Loader for named images.
pub trait AssetLoader {
    /// Fails with [`Error::AssetNotFound`] when no image has this name.
    fn load_image(&self, name: &str) -> Result<Bitmap>;
}

impl<T: AssetLoader + ?Sized> AssetLoader for Box<T> {
    fn load_image(&self, name: &str) -> Result<Bitmap> {
        (**self).load_image(name)
    }
}

/// Loads images from a directory and caches decoded bitmaps.
#[derive(Debug)]
pub struct DirectoryAssets {
    root: PathBuf,
    cache: RefCell<HashMap<String, Bitmap>>,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an image name to a file, trying the name as given and then
    /// with common image extensions appended.
    fn resolve_path(&self, name: &str) -> Option<PathBuf> {
        let exact = self.root.join(name);
        if exact.is_file() {
            return Some(exact);
        }
        for ext in ["png", "PNG", "jpg", "jpeg", "bmp"] {
            let file_path = self.root.join(format!("{name}.{ext}"));
            if file_path.is_file() {
                return Some(file_path);
            }
        }
        None
    }
}

impl AssetLoader for DirectoryAssets {
    fn load_image(&self, name: &str) -> Result<Bitmap> {
        let key = normalize_name(name);
        if let Some(bitmap) = self.cache.borrow().get(&key) {
            return Ok(bitmap.clone());
        }
        let path = self
            .resolve_path(&key)
            .ok_or_else(|| Error::AssetNotFound(name.to_string()))?;
        let bitmap = Bitmap::new(image::open(&path)?.to_rgba8());
        tracing::debug!(
            "Loaded image {} ({}x{})",
            path.display(),
            bitmap.width(),
            bitmap.height()
        );
        self.cache.borrow_mut().insert(key, bitmap.clone());
        Ok(bitmap)
    }
}

/// In-memory image registry.
#[derive(Debug, Default)]
pub struct MemoryAssets {
    images: HashMap<String, Bitmap>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bitmap: Bitmap) {
        self.images.insert(normalize_name(&name.into()), bitmap);
    }
}

impl AssetLoader for MemoryAssets {
    fn load_image(&self, name: &str) -> Result<Bitmap> {
        self.images
            .get(&normalize_name(name))
            .cloned()
            .ok_or_else(|| Error::AssetNotFound(name.to_string()))
    }
}

/// Normalize an asset name: backslashes become forward slashes.
fn normalize_name(name: &str) -> String {
    name.replace('\\', "/")
}

/// Host-side conversion of a texture into a plain bitmap.
pub trait TextureRasterizer {
    fn rasterize(&self, texture: &Texture) -> Result<Bitmap>;
}

/// Flattens a texture over an opaque black backdrop.
///
/// Reproduces the capture path of scene-graph hosts: transparency is lost and
/// transparent pixels come back black, which is why the resolver color-keys
/// near-black pixels afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareRasterizer;

impl TextureRasterizer for SoftwareRasterizer {
    fn rasterize(&self, texture: &Texture) -> Result<Bitmap> {
        let size = texture.size();
        let mut canvas = RgbaImage::from_pixel(size.width, size.height, Rgba([0, 0, 0, 255]));
        draw_image_at(&mut canvas, texture.image(), 0, 0);
        Ok(Bitmap::new(canvas))
    }
}

/// TexturePacker-style JSON manifest (hash format).
#[derive(Debug, Deserialize)]
struct AtlasManifest {
    frames: HashMap<String, AtlasFrame>,
    meta: AtlasMeta,
}

#[derive(Debug, Deserialize)]
struct AtlasFrame {
    frame: AtlasRect,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct AtlasRect {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

#[derive(Debug, Deserialize)]
struct AtlasMeta {
    image: String,
}

/// Named textures cut from a single sprite sheet.
///
/// Each region is extracted once at load time; lookups hand out shared
/// references to it.
#[derive(Debug, Default)]
pub struct TextureAtlas {
    textures: HashMap<String, Texture>,
}

impl TextureAtlas {
    /// Load a manifest and the sheet image it names (relative to the manifest).
    pub fn load(manifest_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(manifest_path)?;
        let manifest: AtlasManifest = serde_json::from_str(&contents)?;
        let sheet_path = manifest_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(&manifest.meta.image);
        if !sheet_path.is_file() {
            return Err(Error::AssetNotFound(sheet_path.display().to_string()));
        }
        let sheet = image::open(&sheet_path)?.to_rgba8();
        let atlas = Self::from_sheet(
            &sheet,
            manifest
                .frames
                .into_iter()
                .map(|(name, f)| (name, (f.frame.x, f.frame.y, f.frame.w, f.frame.h))),
        )?;
        tracing::debug!(
            "Loaded atlas {} with {} textures",
            manifest_path.display(),
            atlas.len()
        );
        Ok(atlas)
    }

    /// Cut named `(x, y, width, height)` regions out of `sheet`.
    pub fn from_sheet<I>(sheet: &RgbaImage, regions: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, (u32, u32, u32, u32))>,
    {
        let mut textures = HashMap::new();
        for (name, (x, y, width, height)) in regions {
            let region = extract_sub_region(sheet, x, y, width, height).ok_or_else(|| {
                Error::Other(format!(
                    "atlas region {name} ({x},{y} {width}x{height}) outside {}x{} sheet",
                    sheet.width(),
                    sheet.height()
                ))
            })?;
            textures.insert(strip_image_ext(&name).to_string(), Texture::from_image(region));
        }
        Ok(Self { textures })
    }

    /// Texture by sprite name, with or without its `.png` suffix.
    pub fn texture_named(&self, name: &str) -> Option<Texture> {
        self.textures.get(strip_image_ext(name)).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.textures.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

fn strip_image_ext(name: &str) -> &str {
    name.strip_suffix(".png")
        .or_else(|| name.strip_suffix(".PNG"))
        .unwrap_or(name)
}

/// Extract a sub-region from a sheet.
fn extract_sub_region(
    sheet: &RgbaImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Option<RgbaImage> {
    let right = x.checked_add(width)?;
    let bottom = y.checked_add(height)?;
    if right > sheet.width() || bottom > sheet.height() {
        return None;
    }
    Some(image::imageops::crop_imm(sheet, x, y, width, height).to_image())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> RgbaImage {
        RgbaImage::from_fn(4, 2, |x, _| {
            if x < 2 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        })
    }

    #[test]
    fn atlas_regions_are_shared() {
        let atlas = TextureAtlas::from_sheet(
            &checker(),
            [
                ("left.png".to_string(), (0, 0, 2, 2)),
                ("right".to_string(), (2, 0, 2, 2)),
            ],
        )
        .unwrap();
        let a = atlas.texture_named("left").unwrap();
        let b = atlas.texture_named("left.png").unwrap();
        assert_eq!(a, b, "lookups should share one texture");
        assert_eq!(a.image().get_pixel(1, 1).0, [255, 0, 0, 255]);
        assert_eq!(atlas.texture_named("right").unwrap().image().get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert!(atlas.texture_named("missing").is_none());
    }

    #[test]
    fn atlas_region_out_of_bounds_fails() {
        let result = TextureAtlas::from_sheet(&checker(), [("big".to_string(), (2, 0, 4, 2))]);
        assert!(result.is_err());

        for region in [(u32::MAX, 0, 2, 2), (0, u32::MAX - 1, 1, 4)] {
            let result = TextureAtlas::from_sheet(&checker(), [("wrap".to_string(), region)]);
            assert!(matches!(result, Err(Error::Other(_))), "{region:?}");
        }
    }

    #[test]
    fn rasterizer_flattens_transparency_to_black() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(1, 0, Rgba([200, 100, 50, 255]));
        let raster = SoftwareRasterizer.rasterize(&Texture::from_image(img)).unwrap();
        assert_eq!(raster.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(raster.pixel(1, 0), Some([200, 100, 50, 255]));
    }

    #[test]
    fn memory_assets_report_missing_names() {
        let mut assets = MemoryAssets::new();
        assets.insert("ui\\back.png", Bitmap::new(RgbaImage::new(1, 1)));
        assert!(assets.load_image("ui/back.png").is_ok());
        assert!(matches!(assets.load_image("nope"), Err(Error::AssetNotFound(n)) if n == "nope"));
    }

    #[test]
    fn texture_bitmap_shares_pixels() {
        let tex = Texture::from_image(checker());
        assert!(tex.as_bitmap().ptr_eq(&tex.as_bitmap()));
        assert_eq!(Texture::from_bitmap(&tex.as_bitmap()), tex);
    }
}
