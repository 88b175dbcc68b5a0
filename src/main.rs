use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::Parser;
use image::RgbaImage;
use tracing_subscriber::EnvFilter;

use sprite_button::render::{BlockTextEngine, CosmicTextEngine, draw_image_at, solid_background};
use sprite_button::sound::{SoundManager, SoundPlayer};
use sprite_button::texture::{AssetLoader, DirectoryAssets, MemoryAssets, TextureAtlas};
use sprite_button::{
    Bitmap, Button, ButtonKind, ButtonSounds, ButtonState, Color, PointerEvent, Resolver, Result,
    Size, SpriteNode, StyleDefaults, TextButtonStyle, TextStateOverride, TextStyle,
};

#[derive(Parser)]
#[command(name = "button-demo", about = "Build the demo buttons, tap them and dump every state bitmap")]
struct Args {
    /// Directory with back.png, back_d.png, back_x.png, bkbtn.png and buttons.json.
    /// Placeholder art is generated when omitted.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Output directory for the rendered PNGs.
    #[arg(long, default_value = "button-demo-out")]
    out: PathBuf,

    /// Style defaults JSON (defaults to the user config file).
    #[arg(long)]
    defaults: Option<PathBuf>,

    /// Use the deterministic block text engine instead of system fonts.
    #[arg(long)]
    block_text: bool,

    /// Extra font directory for the system text engine.
    #[arg(long)]
    fonts: Option<PathBuf>,

    /// Directory holding click and disable sounds.
    #[arg(long)]
    sounds: Option<PathBuf>,
}

const SPRITE_NAMES: [&str; 7] = [
    "back",
    "back_d",
    "back_x",
    "buy",
    "buy_d",
    "greenbutton",
    "yellowbutton",
];

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let defaults_path = args.defaults.clone().unwrap_or_else(StyleDefaults::default_path);
    let defaults = StyleDefaults::load_or_default(&defaults_path);

    let (resolver, atlas) = build_resolver(&args, defaults)?;
    let player = args.sounds.as_ref().and_then(|dir| {
        let manager = SoundManager::new(dir.clone());
        if manager.is_none() {
            tracing::warn!("No audio output, sounds disabled");
        }
        manager.map(|m| Rc::new(RefCell::new(m)) as Rc<RefCell<dyn SoundPlayer>>)
    });

    let mut buttons = build_buttons(&resolver, &atlas);
    std::fs::create_dir_all(&args.out)?;

    for button in &mut buttons {
        if let Some(player) = &player {
            button.sounds = ButtonSounds {
                click: Some("click".into()),
                disable: Some("disable".into()),
                ..ButtonSounds::default()
            };
            button.set_sound_player(Rc::clone(player));
        }
        tap(button);
        dump(button, &args.out)?;
    }

    println!("Wrote {} buttons to {}", buttons.len(), args.out.display());
    Ok(())
}

fn build_resolver(args: &Args, defaults: StyleDefaults) -> Result<(Resolver, TextureAtlas)> {
    let (assets, atlas): (Box<dyn AssetLoader>, TextureAtlas) = match &args.assets {
        Some(dir) => {
            let manifest = dir.join("buttons.json");
            let atlas = TextureAtlas::load(&manifest).unwrap_or_else(|e| {
                tracing::warn!("No sprite sheet at {}: {}", manifest.display(), e);
                TextureAtlas::default()
            });
            (Box::new(DirectoryAssets::new(dir)), atlas)
        }
        None => placeholder_assets()?,
    };
    let resolver = if args.block_text {
        Resolver::new(assets, BlockTextEngine::with_families(["Arial"]))
    } else {
        let mut text = CosmicTextEngine::new();
        if let Some(dir) = &args.fonts {
            text.load_fonts_dir(dir);
        }
        Resolver::new(assets, text)
    };
    Ok((resolver.with_defaults(defaults), atlas))
}

/// Rounded placeholder art in the colors of the demo sheet.
fn placeholder_assets() -> Result<(Box<dyn AssetLoader>, TextureAtlas)> {
    let plate = |w, h, color| solid_background(Size::new(w, h), color, Some(8.0));

    let mut assets = MemoryAssets::new();
    assets.insert("back.png", Bitmap::new(plate(64, 32, Color::BLUE)));
    assets.insert("back_d.png", Bitmap::new(plate(64, 32, Color::RED)));
    assets.insert("back_x.png", Bitmap::new(plate(64, 32, Color::GRAY)));
    assets.insert("bkbtn.png", Bitmap::new(plate(180, 48, Color::YELLOW)));

    let sprites = [
        plate(64, 32, Color::BLUE),
        plate(64, 32, Color::RED),
        plate(64, 32, Color::GRAY),
        plate(56, 28, Color::GREEN),
        plate(56, 28, Color::rgb(0.0, 0.5, 0.0)),
        plate(200, 48, Color::rgb(0.1, 0.7, 0.2)),
        plate(200, 48, Color::rgb(0.95, 0.8, 0.1)),
    ];
    let height: u32 = sprites.iter().map(RgbaImage::height).sum();
    let width = sprites.iter().map(RgbaImage::width).max().unwrap_or(0);
    let mut sheet = RgbaImage::new(width, height);
    let mut regions = Vec::new();
    let mut y = 0;
    for (name, sprite) in SPRITE_NAMES.iter().zip(&sprites) {
        draw_image_at(&mut sheet, sprite, 0, y as i64);
        regions.push((format!("{name}.png"), (0, y, sprite.width(), sprite.height())));
        y += sprite.height();
    }
    let atlas = TextureAtlas::from_sheet(&sheet, regions)?;
    Ok((Box::new(assets), atlas))
}

fn log_tap(button: &mut Button) {
    println!("tapped {} tag={}", button.name(), button.tag);
}

/// Build the demo set. Buttons whose styles cannot be resolved (missing
/// assets or fonts) are reported and skipped.
fn build_buttons(resolver: &Resolver, atlas: &TextureAtlas) -> Vec<Button> {
    let mut buttons = Vec::new();
    let texture = |name: &str| {
        atlas
            .texture_named(name)
            .ok_or_else(|| sprite_button::Error::AssetNotFound(name.to_string()))
    };
    let r = || resolver.clone();

    let attempts: Vec<(i64, Result<Button>)> = vec![
        (0, Button::from_images(r(), SpriteNode::at(100.0, 80.0), "back.png", None, None)),
        (
            10,
            Button::from_images(r(), SpriteNode::at(100.0, 160.0), "back.png", Some("back_d.png"), Some("back_x.png")),
        ),
        (
            11,
            Button::from_images(r(), SpriteNode::at(200.0, 160.0), "back.png", Some("back_d.png"), Some("back_x.png"))
                .map(|mut b| {
                    b.set_state(ButtonState::Highlighted);
                    b
                }),
        ),
        (
            13,
            Button::from_images(r(), SpriteNode::at(300.0, 160.0), "back.png", Some("back_d.png"), Some("back_x.png"))
                .map(|mut b| {
                    b.set_disabled(true);
                    b
                }),
        ),
        (
            20,
            texture("buy").and_then(|n| {
                Button::from_textures(r(), SpriteNode::at(100.0, 240.0), n, texture("buy_d").ok(), None)
            }),
        ),
        (
            21,
            texture("buy").and_then(|n| {
                Button::from_textures(r(), SpriteNode::at(200.0, 240.0), n, texture("back").ok(), None)
            }),
        ),
        (
            22,
            texture("buy").and_then(|n| {
                let sheet: Vec<_> = SPRITE_NAMES.iter().filter_map(|s| atlas.texture_named(s)).collect();
                let mut next = 0usize;
                Button::from_textures(r(), SpriteNode::at(300.0, 240.0), n, texture("back").ok(), None).map(|b| {
                    b.with_tap_handler(move |button: &mut Button| {
                        next = (next + 1) % sheet.len().max(1);
                        if let Some(tex) = sheet.get(next)
                            && let Err(e) = button.set_texture(ButtonState::Normal, tex.clone())
                        {
                            tracing::warn!("Texture swap failed: {e}");
                        }
                    })
                })
            }),
        ),
        (
            30,
            Button::from_text(r(), SpriteNode::at(100.0, 320.0), TextButtonStyle::new(TextStyle::new("Hello World!!!"))),
        ),
        (
            31,
            Button::from_text(
                r(),
                SpriteNode::at(300.0, 320.0),
                TextButtonStyle::new(
                    TextStyle::new("Tap me")
                        .color(Color::BLUE)
                        .font("Arial")
                        .font_size(25.0)
                        .background(Color::YELLOW)
                        .size(200, 40)
                        .corner_radius(10.0),
                )
                .highlighted(
                    TextStateOverride::new()
                        .text("Being tapped")
                        .color(Color::RED)
                        .background(Color::GREEN),
                ),
            ),
        ),
        (
            40,
            Button::from_images(r(), SpriteNode::at(100.0, 410.0), "bkbtn.png", None, None).and_then(|mut b| {
                b.set_string(ButtonState::Normal, TextStyle::new("REGISTER").color(Color::BLUE))?;
                b.set_string(ButtonState::Highlighted, TextStyle::new("REGISTER").color(Color::RED))?;
                Ok(b)
            }),
        ),
        (
            41,
            Button::from_images(r(), SpriteNode::at(300.0, 410.0), "bkbtn.png", None, None).and_then(|mut b| {
                b.set_string(ButtonState::Normal, TextStyle::new("Fun").color(Color::BLUE))?;
                b.set_string(ButtonState::Highlighted, TextStyle::new("Funniest").color(Color::RED))?;
                Ok(b)
            }),
        ),
        (
            42,
            Button::from_text(
                r(),
                SpriteNode::at(100.0, 470.0),
                TextButtonStyle::new(TextStyle::new("Flip").background(Color::GRAY))
                    .highlighted(TextStateOverride::new().text("Flop").background(Color::YELLOW)),
            )
            .map(|b| b.with_kind(ButtonKind::Flip)),
        ),
        (
            50,
            texture("greenbutton").and_then(|n| {
                let mut b = Button::from_textures(r(), SpriteNode::at(100.0, 500.0), n, texture("yellowbutton").ok(), None)?;
                b.set_string(
                    ButtonState::Normal,
                    TextStyle::new("Are you sure?").font_size(24.0).color(Color::WHITE),
                )?;
                b.set_string(ButtonState::Highlighted, TextStyle::new("LOL!!!").color(Color::BLUE))?;
                Ok(b)
            }),
        ),
    ];

    for (tag, attempt) in attempts {
        match attempt {
            Ok(mut button) => {
                button.tag = tag;
                if !button.has_tap_handler() {
                    button.set_tap_handler(log_tap);
                }
                buttons.push(button);
            }
            Err(e) => tracing::warn!("Skipping button tag={tag}: {e}"),
        }
    }
    buttons
}

/// Press and release at the button's position.
fn tap(button: &mut Button) {
    let at = button.node().position;
    button.handle_event(PointerEvent::Down(at));
    button.handle_event(PointerEvent::Up(at));
}

fn dump(button: &Button, out: &Path) -> Result<()> {
    for state in ButtonState::ALL {
        if let Some(bitmap) = button.bitmap(state) {
            let path = out.join(format!("{:02}_{}.png", button.tag, state.as_str()));
            bitmap.save_png(&path)?;
        }
    }
    if let Some(shown) = button.node().displayed() {
        shown.save_png(&out.join(format!("{:02}_shown.png", button.tag)))?;
    }
    Ok(())
}
