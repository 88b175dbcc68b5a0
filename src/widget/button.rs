//! The button state machine.
//!
//! Holds one optional [`StyleRecord`] per interaction state, pushes the active
//! state's bitmap to the host node on every transition, and turns pointer
//! events into transitions and tap callbacks.

use std::cell::RefCell;
use std::rc::Rc;

use crate::event::PointerEvent;
use crate::render::{Bitmap, Point};
use crate::sound::SoundPlayer;
use crate::texture::Texture;
use crate::Result;

use super::node::{HostNode, SpriteNode};
use super::resolver::Resolver;
use super::style::{StyleDescriptor, StyleRecord, TextButtonStyle, TextStyle, merge_text_update};

/// Debug name carried by every button.
pub const BUTTON_NAME: &str = "SpriteButton";

/// Interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonState {
    #[default]
    Normal,
    Highlighted,
    Disabled,
}

impl ButtonState {
    pub const ALL: [Self; 3] = [Self::Normal, Self::Highlighted, Self::Disabled];

    fn index(self) -> usize {
        match self {
            Self::Normal => 0,
            Self::Highlighted => 1,
            Self::Disabled => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Highlighted => "highlighted",
            Self::Disabled => "disabled",
        }
    }
}

/// Press semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonKind {
    /// Highlighted while held, Normal on release.
    #[default]
    Normal,
    /// Each press toggles between Normal and Highlighted.
    Flip,
}

/// Called when a press is released inside the button.
pub trait TapHandler<N: HostNode> {
    fn on_tap(&mut self, button: &mut Button<N>);
}

impl<N: HostNode, F: FnMut(&mut Button<N>)> TapHandler<N> for F {
    fn on_tap(&mut self, button: &mut Button<N>) {
        self(button)
    }
}

/// Sound names and the master switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSounds {
    pub enabled: bool,
    pub click: Option<String>,
    pub disable: Option<String>,
}

impl Default for ButtonSounds {
    fn default() -> Self {
        Self {
            enabled: true,
            click: None,
            disable: None,
        }
    }
}

/// A tappable multi-state button bound to a host node.
pub struct Button<N: HostNode = SpriteNode> {
    node: N,
    resolver: Resolver,
    records: [Option<StyleRecord>; 3],
    state: ButtonState,
    disabled: bool,
    kind: ButtonKind,
    /// Caller bookkeeping.
    pub tag: i64,
    pub sounds: ButtonSounds,
    player: Option<Rc<RefCell<dyn SoundPlayer>>>,
    on_tap: Option<Box<dyn TapHandler<N>>>,
}

impl<N: HostNode + std::fmt::Debug> std::fmt::Debug for Button<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Button")
            .field("tag", &self.tag)
            .field("state", &self.state)
            .field("disabled", &self.disabled)
            .field("kind", &self.kind)
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

impl<N: HostNode> Button<N> {
    /// Button drawn from named images, one per state.
    pub fn from_images(
        resolver: Resolver,
        node: N,
        normal: &str,
        highlighted: Option<&str>,
        disabled: Option<&str>,
    ) -> Result<Self> {
        let mut button = Self::with_normal(resolver, node, StyleDescriptor::image(normal))?;
        if let Some(name) = highlighted {
            button.install(ButtonState::Highlighted, StyleDescriptor::image(name))?;
        }
        if let Some(name) = disabled {
            button.install(ButtonState::Disabled, StyleDescriptor::image(name))?;
        }
        Ok(button)
    }

    /// Button drawn from pre-loaded textures, one per state.
    pub fn from_textures(
        resolver: Resolver,
        node: N,
        normal: Texture,
        highlighted: Option<Texture>,
        disabled: Option<Texture>,
    ) -> Result<Self> {
        let mut button = Self::with_normal(resolver, node, StyleDescriptor::texture(normal))?;
        if let Some(texture) = highlighted {
            button.install(ButtonState::Highlighted, StyleDescriptor::texture(texture))?;
        }
        if let Some(texture) = disabled {
            button.install(ButtonState::Disabled, StyleDescriptor::texture(texture))?;
        }
        Ok(button)
    }

    /// Button drawn from a text label over a synthesized background.
    ///
    /// Highlighted and Disabled overrides go through the same inheritance as
    /// [`Button::set_string`].
    pub fn from_text(resolver: Resolver, node: N, style: TextButtonStyle) -> Result<Self> {
        let normal = merge_text_update(ButtonState::Normal, style.normal.clone(), None, None);
        let mut button = Self::with_normal(resolver, node, normal)?;
        if let Some(over) = &style.highlighted {
            button.set_string(ButtonState::Highlighted, style.override_update(over))?;
        }
        if let Some(over) = &style.disabled {
            button.set_string(ButtonState::Disabled, style.override_update(over))?;
        }
        Ok(button)
    }

    /// Resolve the Normal state and show it. Fails if Normal cannot be drawn.
    fn with_normal(resolver: Resolver, mut node: N, normal: StyleDescriptor) -> Result<Self> {
        let record = StyleRecord::resolve(normal, &resolver)?;
        node.set_displayed_bitmap(record.bitmap());
        tracing::debug!(
            "Created {} ({}x{})",
            BUTTON_NAME,
            record.bitmap().width(),
            record.bitmap().height()
        );
        Ok(Self {
            node,
            resolver,
            records: [Some(record), None, None],
            state: ButtonState::Normal,
            disabled: false,
            kind: ButtonKind::Normal,
            tag: 0,
            sounds: ButtonSounds::default(),
            player: None,
            on_tap: None,
        })
    }

    pub fn with_kind(mut self, kind: ButtonKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_tag(mut self, tag: i64) -> Self {
        self.tag = tag;
        self
    }

    pub fn with_sounds(mut self, sounds: ButtonSounds) -> Self {
        self.sounds = sounds;
        self
    }

    pub fn with_sound_player(mut self, player: Rc<RefCell<dyn SoundPlayer>>) -> Self {
        self.player = Some(player);
        self
    }

    pub fn set_sound_player(&mut self, player: Rc<RefCell<dyn SoundPlayer>>) {
        self.player = Some(player);
    }

    pub fn with_tap_handler(mut self, handler: impl TapHandler<N> + 'static) -> Self {
        self.on_tap = Some(Box::new(handler));
        self
    }

    pub fn set_tap_handler(&mut self, handler: impl TapHandler<N> + 'static) {
        self.on_tap = Some(Box::new(handler));
    }

    pub fn clear_tap_handler(&mut self) {
        self.on_tap = None;
    }

    pub fn has_tap_handler(&self) -> bool {
        self.on_tap.is_some()
    }

    pub fn name(&self) -> &'static str {
        BUTTON_NAME
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn node_mut(&mut self) -> &mut N {
        &mut self.node
    }

    pub fn kind(&self) -> ButtonKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: ButtonKind) {
        self.kind = kind;
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Switch state and show that state's bitmap. Without a bitmap for
    /// `state`, the node keeps its current visual.
    pub fn set_state(&mut self, state: ButtonState) {
        if state != self.state {
            tracing::trace!("{} tag={}: {} -> {}", BUTTON_NAME, self.tag, self.state.as_str(), state.as_str());
        }
        self.state = state;
        self.show_current();
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Enabling returns to Normal. Disabling enters Disabled and plays the
    /// disable sound, unless the button was already disabled.
    pub fn set_disabled(&mut self, disabled: bool) {
        let was_disabled = self.disabled;
        self.disabled = disabled;
        if disabled {
            self.set_state(ButtonState::Disabled);
            if !was_disabled {
                self.play_sound(false);
            }
        } else {
            self.set_state(ButtonState::Normal);
        }
    }

    /// The synthesized bitmap for `state`, if that state has a style.
    pub fn bitmap(&self, state: ButtonState) -> Option<&Bitmap> {
        self.records[state.index()].as_ref().map(StyleRecord::bitmap)
    }

    pub fn style(&self, state: ButtonState) -> Option<&StyleDescriptor> {
        self.records[state.index()].as_ref().map(StyleRecord::descriptor)
    }

    /// Set a state's label. Unset fields inherit from Normal; see
    /// [`TextStyle`].
    pub fn set_string(&mut self, state: ButtonState, update: TextStyle) -> Result<()> {
        let descriptor = merge_text_update(
            state,
            update,
            self.style(state),
            self.style(ButtonState::Normal),
        );
        self.install(state, descriptor)
    }

    /// Set a state's background image, replacing any texture.
    pub fn set_image(&mut self, state: ButtonState, name: &str) -> Result<()> {
        let mut descriptor = self.style(state).cloned().unwrap_or_default();
        descriptor.image = Some(name.to_string());
        descriptor.texture = None;
        self.install(state, descriptor)
    }

    /// Set a state's background texture, replacing any image.
    pub fn set_texture(&mut self, state: ButtonState, texture: Texture) -> Result<()> {
        let mut descriptor = self.style(state).cloned().unwrap_or_default();
        descriptor.texture = Some(texture);
        descriptor.image = None;
        self.install(state, descriptor)
    }

    /// Resolve and store a state's descriptor. On failure the previous
    /// record is left untouched.
    fn install(&mut self, state: ButtonState, descriptor: StyleDescriptor) -> Result<()> {
        let record = StyleRecord::resolve(descriptor, &self.resolver)?;
        self.records[state.index()] = Some(record);
        if self.state == state {
            self.show_current();
        }
        Ok(())
    }

    fn show_current(&mut self) {
        match self.records[self.state.index()].as_ref() {
            Some(record) => self.node.set_displayed_bitmap(record.bitmap()),
            None => tracing::debug!(
                "{} tag={} has no {} bitmap, keeping current visual",
                BUTTON_NAME,
                self.tag,
                self.state.as_str()
            ),
        }
    }

    fn play_sound(&self, click: bool) {
        if !self.sounds.enabled {
            return;
        }
        let name = if click { &self.sounds.click } else { &self.sounds.disable };
        if let (Some(name), Some(player)) = (name, &self.player) {
            player.borrow_mut().play_sound(name);
        }
    }

    pub fn handle_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down(point) => self.pointer_down(point),
            PointerEvent::Up(point) => self.pointer_up(point),
            PointerEvent::Cancel => self.pointer_cancel(),
        }
    }

    pub fn pointer_down(&mut self, _point: Point) {
        if self.disabled {
            return;
        }
        let next = match (self.kind, self.state) {
            (ButtonKind::Flip, ButtonState::Normal) => ButtonState::Highlighted,
            (ButtonKind::Flip, _) => ButtonState::Normal,
            (ButtonKind::Normal, _) => ButtonState::Highlighted,
        };
        self.set_state(next);
    }

    /// Release: momentary buttons return to Normal, then the tap handler
    /// runs if the point is inside the node.
    pub fn pointer_up(&mut self, point: Point) {
        if self.disabled {
            return;
        }
        if self.kind == ButtonKind::Normal {
            self.set_state(ButtonState::Normal);
        }
        if self.on_tap.is_none() || !self.node.contains(point) {
            return;
        }
        self.play_sound(true);
        if let Some(mut handler) = self.on_tap.take() {
            handler.on_tap(self);
            // The handler may have installed a replacement.
            if self.on_tap.is_none() {
                self.on_tap = Some(handler);
            }
        }
    }

    pub fn pointer_cancel(&mut self) {
        if !self.disabled && self.kind == ButtonKind::Normal {
            self.set_state(ButtonState::Normal);
        }
    }
}
