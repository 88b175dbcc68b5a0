//! Pointer handling, state transitions, tap callbacks and sounds.

mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::RecordingPlayer;
use sprite_button::{
    BUTTON_NAME, Button, ButtonKind, ButtonSounds, ButtonState, Point, PointerEvent, SpriteNode,
    Texture,
};

fn image_button() -> Button {
    Button::from_images(
        common::block_resolver(),
        SpriteNode::at(100.0, 100.0),
        "back.png",
        Some("back_d.png"),
        None,
    )
    .unwrap()
}

fn shows(button: &Button, state: ButtonState) -> bool {
    match (button.node().displayed(), button.bitmap(state)) {
        (Some(shown), Some(expected)) => shown.ptr_eq(expected),
        _ => false,
    }
}

const INSIDE: Point = Point::new(100.0, 100.0);
const OUTSIDE: Point = Point::new(300.0, 300.0);

#[test]
fn tap_inside_fires_once_and_outside_never() {
    let taps = Rc::new(Cell::new(0));
    let counter = Rc::clone(&taps);
    let mut button = Button::from_images(
        common::block_resolver(),
        SpriteNode::at(100.0, 100.0),
        "back.png",
        None,
        None,
    )
    .unwrap()
    .with_tap_handler(move |_: &mut Button| counter.set(counter.get() + 1));

    button.handle_event(PointerEvent::Down(INSIDE));
    // No Highlighted bitmap: the Normal visual stays up.
    assert_eq!(button.state(), ButtonState::Highlighted);
    assert!(shows(&button, ButtonState::Normal));
    button.handle_event(PointerEvent::Up(INSIDE));
    assert_eq!(taps.get(), 1);
    assert_eq!(button.state(), ButtonState::Normal);

    button.handle_event(PointerEvent::Down(INSIDE));
    button.handle_event(PointerEvent::Up(OUTSIDE));
    assert_eq!(taps.get(), 1);
    assert_eq!(button.state(), ButtonState::Normal);
    assert!(shows(&button, ButtonState::Normal));
}

#[test]
fn press_shows_highlighted_bitmap() {
    let mut button = image_button();
    assert!(shows(&button, ButtonState::Normal));
    button.pointer_down(INSIDE);
    assert!(shows(&button, ButtonState::Highlighted));
    button.pointer_up(INSIDE);
    assert!(shows(&button, ButtonState::Normal));
}

#[test]
fn disable_then_enable_returns_to_normal() {
    let taps = Rc::new(Cell::new(0));
    let counter = Rc::clone(&taps);
    let mut button = image_button();
    button.set_tap_handler(move |_: &mut Button| counter.set(counter.get() + 1));

    button.pointer_down(INSIDE);
    button.set_disabled(true);
    assert!(button.is_disabled());
    assert_eq!(button.state(), ButtonState::Disabled);

    button.handle_event(PointerEvent::Down(INSIDE));
    button.handle_event(PointerEvent::Up(INSIDE));
    button.handle_event(PointerEvent::Cancel);
    assert_eq!(button.state(), ButtonState::Disabled);
    assert_eq!(taps.get(), 0);

    button.set_disabled(false);
    assert_eq!(button.state(), ButtonState::Normal);
    assert!(shows(&button, ButtonState::Normal));
}

#[test]
fn flip_toggles_between_normal_and_highlighted() {
    let mut button = image_button().with_kind(ButtonKind::Flip);
    let mut expected = ButtonState::Normal;
    for _ in 0..6 {
        button.pointer_down(INSIDE);
        expected = match expected {
            ButtonState::Normal => ButtonState::Highlighted,
            _ => ButtonState::Normal,
        };
        assert_eq!(button.state(), expected);
        assert!(shows(&button, expected));
        button.pointer_up(INSIDE);
        assert_eq!(button.state(), expected, "release keeps the flipped state");
    }
}

#[test]
fn set_state_pushes_bitmap() {
    let mut button = image_button();
    button.set_state(ButtonState::Highlighted);
    assert!(shows(&button, ButtonState::Highlighted));
    button.set_state(ButtonState::Normal);
    assert!(shows(&button, ButtonState::Normal));
}

#[test]
fn update_of_active_state_is_pushed() {
    let mut button = image_button();
    button.pointer_down(INSIDE);
    button.set_image(ButtonState::Highlighted, "bkbtn.png").unwrap();
    assert!(shows(&button, ButtonState::Highlighted));
    assert_eq!(button.node().displayed().unwrap().width(), 180);
    // Hit area is fixed by the first bitmap shown.
    assert_eq!(button.node().size(), Some((64.0, 32.0)));
}

#[test]
fn tap_handler_can_restyle_the_button() {
    let replacement = Texture::from_bitmap(&common::plate(10, 10, common::YELLOW));
    let swap = replacement.clone();
    let mut button = image_button().with_tag(22).with_tap_handler(move |b: &mut Button| {
        assert_eq!(b.tag, 22);
        b.set_texture(ButtonState::Normal, swap.clone()).unwrap();
    });

    button.handle_event(PointerEvent::Down(INSIDE));
    button.handle_event(PointerEvent::Up(INSIDE));

    let style = button.style(ButtonState::Normal).unwrap();
    assert_eq!(style.texture.as_ref(), Some(&replacement));
    assert_eq!(style.image, None);
    assert!(shows(&button, ButtonState::Normal));
    assert!(button.has_tap_handler());
}

#[test]
fn handler_may_replace_itself() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let first = Rc::clone(&log);
    let mut button = image_button();
    button.set_tap_handler(move |b: &mut Button| {
        first.borrow_mut().push("first");
        let second = Rc::clone(&first);
        b.set_tap_handler(move |_: &mut Button| second.borrow_mut().push("second"));
    });

    button.pointer_down(INSIDE);
    button.pointer_up(INSIDE);
    button.pointer_down(INSIDE);
    button.pointer_up(INSIDE);
    assert_eq!(*log.borrow(), vec!["first", "second"]);
}

#[test]
fn sounds_follow_the_switch() {
    let player = RecordingPlayer::default();
    let played = Rc::clone(&player.played);
    let mut button = image_button()
        .with_sounds(ButtonSounds {
            click: Some("click".into()),
            disable: Some("off".into()),
            ..ButtonSounds::default()
        })
        .with_sound_player(Rc::new(RefCell::new(player)))
        .with_tap_handler(|_: &mut Button| {});

    button.pointer_down(INSIDE);
    button.pointer_up(INSIDE);
    button.set_disabled(true);
    button.set_disabled(true);
    assert_eq!(*played.borrow(), vec!["click", "off"]);

    button.set_disabled(false);
    button.sounds.enabled = false;
    button.pointer_down(INSIDE);
    button.pointer_up(INSIDE);
    button.set_disabled(true);
    assert_eq!(played.borrow().len(), 2);
}

#[test]
fn no_click_sound_without_handler() {
    let player = RecordingPlayer::default();
    let played = Rc::clone(&player.played);
    let mut button = image_button()
        .with_sounds(ButtonSounds {
            click: Some("click".into()),
            ..ButtonSounds::default()
        })
        .with_sound_player(Rc::new(RefCell::new(player)));
    button.pointer_down(INSIDE);
    button.pointer_up(INSIDE);
    assert!(played.borrow().is_empty());
}

#[test]
fn widget_name_and_tag() {
    let button = image_button().with_tag(7);
    assert_eq!(button.name(), BUTTON_NAME);
    assert_eq!(button.tag, 7);
    assert_eq!(button.kind(), ButtonKind::Normal);
}
