//! RGB colors and the brightness-to-alpha translation used at the display boundary.
//!
//! Colors are plain 8-bit triples. Brightness lives next to them in a
//! [`Cell`](crate::Cell) and is only folded into the color when a frame
//! leaves the engine (panel driver, HTML preview, JSON snapshot).
//!
//! ## Rust concepts
//! - `Display` and `FromStr` for round-tripping the `rgb(r, g, b)` notation
//! - `const` associated items (`Color::BLACK`)
//! - `Option` combinators for parsing without panics

use crate::error::ImagerError;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// An 8-bit RGB triple.
///
/// # Rust concept: derive macros
/// `Clone, Copy` make this cheaply copyable (it's just three u8s).
/// `PartialEq, Eq, Hash` let us compare colors and use them as map keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Literal black. During compositing this is the transparency sentinel:
    /// a layer pixel with exactly this color is never drawn.
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// A color with every channel drawn uniformly from 0-255.
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        Self::new(rng.r#gen(), rng.r#gen(), rng.r#gen())
    }

    /// Create a color from a hue value (0-360), with full saturation and brightness.
    /// Useful for rainbow effects.
    ///
    /// # Rust concept: match expressions
    /// Rust's `match` is exhaustive: the compiler ensures we handle all cases.
    pub fn from_hue(hue: u16) -> Self {
        let hue = hue % 360;
        let sector = hue / 60;
        let fraction = ((hue % 60) as f32) / 60.0;
        let rising = (fraction * 255.0) as u8;
        let falling = ((1.0 - fraction) * 255.0) as u8;

        match sector {
            0 => Self::new(255, rising, 0),  // Red → Yellow
            1 => Self::new(falling, 255, 0), // Yellow → Green
            2 => Self::new(0, 255, rising),  // Green → Cyan
            3 => Self::new(0, falling, 255), // Cyan → Blue
            4 => Self::new(rising, 0, 255),  // Blue → Magenta
            _ => Self::new(255, 0, falling), // Magenta → Red
        }
    }

    /// True when this color is the compositing transparency sentinel.
    pub fn is_transparent(self) -> bool {
        self == Self::BLACK
    }

    /// Parse the `rgb(r, g, b)` notation. Returns `None` for anything else,
    /// including channel values above 255.
    pub fn parse(input: &str) -> Option<Self> {
        let inner = input.trim().strip_prefix("rgb(")?.strip_suffix(')')?;
        let mut channels = inner.split(',').map(|part| part.trim().parse::<u8>());

        let r = channels.next()?.ok()?;
        let g = channels.next()?.ok()?;
        let b = channels.next()?.ok()?;
        if channels.next().is_some() {
            return None;
        }

        Some(Self::new(r, g, b))
    }

    /// Scale the channels by `brightness / 255`, i.e. alpha-blend this color
    /// over an unlit pixel. Used by the panel driver.
    pub fn apply_brightness(self, brightness: u8) -> Self {
        if brightness == u8::MAX {
            return self;
        }
        let scale = |channel: u8| ((channel as u16 * brightness as u16) / 255) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }

    /// The CSS color a browser preview paints for this color at `brightness`.
    pub fn css(self, brightness: u8) -> String {
        css_color(self, brightness)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ImagerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ImagerError::InvalidColor(s.to_string()))
    }
}

/// Shorthand used throughout the scenes.
pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::new(r, g, b)
}

/// Brightness as an alpha value in 0.0-1.0.
pub fn brightness_to_alpha(brightness: u8) -> f64 {
    brightness as f64 / 255.0
}

/// Translate a color and brightness into the string a DOM painter uses:
/// full brightness keeps `rgb(..)`, anything dimmer becomes `rgba(.., alpha)`.
pub fn css_color(color: Color, brightness: u8) -> String {
    if brightness == u8::MAX {
        return color.to_string();
    }
    format!(
        "rgba({}, {}, {}, {})",
        color.r,
        color.g,
        color.b,
        brightness_to_alpha(brightness)
    )
}

/// Convert our Color to the hardware crate's LedColor at the boundary.
#[cfg(feature = "hardware")]
impl From<Color> for rpi_led_matrix::LedColor {
    fn from(c: Color) -> Self {
        rpi_led_matrix::LedColor {
            red: c.r,
            green: c.g,
            blue: c.b,
        }
    }
}
