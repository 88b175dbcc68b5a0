//! Sprite Button
//!
//! A multi-state button for 2D scene graphs. Each interaction state (normal,
//! highlighted, disabled) carries a style built from a named image, a
//! texture or a text label, and the button synthesizes one bitmap per state
//! and swaps it onto its host node as pointer events arrive.

pub mod config;
pub mod error;
pub mod event;
pub mod render;
pub mod sound;
pub mod texture;
pub mod widget;

pub use config::StyleDefaults;
pub use error::{Error, Result};
pub use event::PointerEvent;
pub use render::{Bitmap, Color, Point, Size};
pub use texture::{AssetLoader, DirectoryAssets, MemoryAssets, Texture, TextureAtlas};
pub use widget::{
    BUTTON_NAME, Button, ButtonKind, ButtonSounds, ButtonState, HostNode, Resolver, SpriteNode,
    StyleDescriptor, TextButtonStyle, TextStateOverride, TextStyle,
};
