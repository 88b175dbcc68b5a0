//! Per-state style descriptors and the Normal-state inheritance merge.

use crate::render::{Bitmap, Color, Size};
use crate::texture::Texture;
use crate::Result;

use super::ButtonState;
use super::resolver::Resolver;

/// Style inputs for one interaction state.
///
/// `image` and `texture` are mutually exclusive. A descriptor with neither
/// text nor a background source cannot be synthesized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleDescriptor {
    /// Named image resolved through the asset loader.
    pub image: Option<String>,
    /// Borrowed texture.
    pub texture: Option<Texture>,
    pub text: Option<String>,
    pub font_name: Option<String>,
    pub font_size: Option<f32>,
    pub text_color: Option<Color>,
    pub background: Option<Color>,
    /// Only applies to a synthesized solid background.
    pub corner_radius: Option<f32>,
    /// Explicit box size; overrides any derived size.
    pub size: Option<Size>,
}

impl StyleDescriptor {
    pub fn image(name: impl Into<String>) -> Self {
        Self {
            image: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn texture(texture: Texture) -> Self {
        Self {
            texture: Some(texture),
            ..Self::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn has_background_source(&self) -> bool {
        self.image.is_some() || self.texture.is_some()
    }
}

/// A descriptor together with its synthesized bitmap.
#[derive(Debug, Clone)]
pub struct StyleRecord {
    descriptor: StyleDescriptor,
    bitmap: Bitmap,
}

impl StyleRecord {
    /// Synthesize the descriptor's bitmap.
    pub fn resolve(descriptor: StyleDescriptor, resolver: &Resolver) -> Result<Self> {
        let bitmap = resolver.resolve(&descriptor)?;
        Ok(Self { descriptor, bitmap })
    }

    pub fn descriptor(&self) -> &StyleDescriptor {
        &self.descriptor
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }
}

/// Arguments of a per-state text update. Unset fields inherit from the
/// Normal state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStyle {
    pub text: String,
    pub font_name: Option<String>,
    pub font_size: Option<f32>,
    pub color: Option<Color>,
    pub background: Option<Color>,
    pub size: Option<Size>,
    pub corner_radius: Option<f32>,
}

impl TextStyle {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn font(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    pub fn corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = Some(radius);
        self
    }
}

/// Per-state overrides for a text button's Highlighted or Disabled look.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStateOverride {
    /// Label for this state; the Normal label when unset.
    pub text: Option<String>,
    pub color: Option<Color>,
    pub background: Option<Color>,
}

impl TextStateOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }
}

/// Everything a text button needs at construction.
///
/// Highlighted and Disabled get a look of their own unless cleared:
/// yellow text on green while pressed, black text on gray while disabled.
#[derive(Debug, Clone, PartialEq)]
pub struct TextButtonStyle {
    pub normal: TextStyle,
    pub highlighted: Option<TextStateOverride>,
    pub disabled: Option<TextStateOverride>,
}

impl Default for TextButtonStyle {
    fn default() -> Self {
        Self::new(TextStyle::default())
    }
}

impl TextButtonStyle {
    pub fn new(normal: TextStyle) -> Self {
        Self {
            normal,
            highlighted: Some(
                TextStateOverride::new()
                    .color(Color::YELLOW)
                    .background(Color::GREEN),
            ),
            disabled: Some(TextStateOverride::new().color(Color::BLACK).background(Color::GRAY)),
        }
    }

    /// Normal look only; pressing or disabling keeps the Normal bitmap.
    pub fn plain(normal: TextStyle) -> Self {
        Self {
            normal,
            highlighted: None,
            disabled: None,
        }
    }

    pub fn without_highlighted(mut self) -> Self {
        self.highlighted = None;
        self
    }

    pub fn without_disabled(mut self) -> Self {
        self.disabled = None;
        self
    }

    pub fn highlighted(mut self, style: TextStateOverride) -> Self {
        self.highlighted = Some(style);
        self
    }

    pub fn disabled(mut self, style: TextStateOverride) -> Self {
        self.disabled = Some(style);
        self
    }

    /// The text update that realizes `over` for a non-Normal state.
    pub(crate) fn override_update(&self, over: &TextStateOverride) -> TextStyle {
        TextStyle {
            text: over.text.clone().unwrap_or_else(|| self.normal.text.clone()),
            color: over.color,
            background: over.background,
            ..TextStyle::default()
        }
    }
}

/// Build the descriptor a text update produces for `state`.
///
/// Starts from the state's current descriptor; every field the update leaves
/// unset takes the Normal state's current value. Built-in defaults only
/// enter later, in the resolver, when Normal has no value either. A
/// non-Normal state with no background color of its own, no image and no
/// texture borrows Normal's image (preferred) or texture.
pub(crate) fn merge_text_update(
    state: ButtonState,
    update: TextStyle,
    current: Option<&StyleDescriptor>,
    normal: Option<&StyleDescriptor>,
) -> StyleDescriptor {
    let mut merged = current.cloned().unwrap_or_default();

    merged.text = Some(update.text);
    merged.font_name = update.font_name.or_else(|| normal.and_then(|n| n.font_name.clone()));
    merged.font_size = update.font_size.or_else(|| normal.and_then(|n| n.font_size));
    merged.text_color = update.color.or_else(|| normal.and_then(|n| n.text_color));
    merged.background = update.background.or_else(|| normal.and_then(|n| n.background));
    merged.size = update.size.or_else(|| normal.and_then(|n| n.size));
    merged.corner_radius = update.corner_radius.or_else(|| normal.and_then(|n| n.corner_radius));

    if update.background.is_none()
        && state != ButtonState::Normal
        && !merged.has_background_source()
        && let Some(normal) = normal
    {
        if normal.image.is_some() {
            merged.image = normal.image.clone();
        } else {
            merged.texture = normal.texture.clone();
        }
    }
    merged
}
