//! The sprite button widget: per-state styles, bitmap synthesis and the
//! pointer-driven state machine.

mod button;
mod node;
mod resolver;
mod style;

pub use button::{BUTTON_NAME, Button, ButtonKind, ButtonSounds, ButtonState, TapHandler};
pub use node::{HostNode, SpriteNode};
pub use resolver::Resolver;
pub use style::{StyleDescriptor, StyleRecord, TextButtonStyle, TextStateOverride, TextStyle};
