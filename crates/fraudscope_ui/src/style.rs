//! Inline styles and the report palette.
//!
//! Dark navy surfaces, indigo accent, soft slate text.

use std::fmt::Write as _;

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    pub a: f32,
}

impl Color {
    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from 8-bit channels and an alpha (0-1).
    #[must_use]
    pub fn rgb8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::rgba(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0, a)
    }

    /// Creates a color from hex value (0xRRGGBB), fully opaque.
    #[must_use]
    pub fn hex(hex: u32) -> Self {
        let [_, r, g, b] = hex.to_be_bytes();
        Self::rgb8(r, g, b, 1.0)
    }

    /// Returns a new color with different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Formats as a CSS `rgba(...)` (or `#rrggbb` when opaque).
    #[must_use]
    pub fn to_css(self) -> String {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b) = (channel(self.r), channel(self.g), channel(self.b));
        if self.a >= 1.0 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("rgba({r}, {g}, {b}, {})", (self.a * 100.0).round() / 100.0)
        }
    }
}

/// Complete palette for the report page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    /// Primary accent (indigo).
    pub accent: Color,
    /// Tooltip and card surface.
    pub surface: Color,
    /// Body text.
    pub text: Color,
}

impl Theme {
    /// The fraud report palette.
    #[must_use]
    pub fn report() -> Self {
        Self {
            accent: Color::hex(0x0066_7eea),
            surface: Color::rgb8(26, 29, 41, 0.95),
            text: Color::hex(0x00e2_e8f0),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::report()
    }
}

/// Inline style declarations of one element, in declaration order.
///
/// Property names are stored lowercase. Setting an existing property keeps
/// its position, like `element.style.foo = ...` does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    declarations: Vec<(String, String)>,
}

impl Style {
    /// Creates an empty style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a `cssText` block (`"a: b; c: d"`). Malformed declarations
    /// are dropped, as browsers do.
    #[must_use]
    pub fn parse(css: &str) -> Self {
        let mut style = Self::new();
        style.set_css_text(css);
        style
    }

    /// Returns a property value.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        let property = property.to_ascii_lowercase();
        self.declarations
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Sets a property. An empty value removes it.
    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        let property = property.trim().to_ascii_lowercase();
        let value = value.into().trim().to_string();
        if value.is_empty() {
            self.remove(&property);
            return;
        }
        match self.declarations.iter_mut().find(|(name, _)| *name == property) {
            Some((_, existing)) => *existing = value,
            None => self.declarations.push((property, value)),
        }
    }

    /// Removes a property, returning its old value.
    pub fn remove(&mut self, property: &str) -> Option<String> {
        let property = property.to_ascii_lowercase();
        let index = self.declarations.iter().position(|(name, _)| *name == property)?;
        Some(self.declarations.remove(index).1)
    }

    /// Replaces every declaration with the parsed `css` block.
    pub fn set_css_text(&mut self, css: &str) {
        self.declarations.clear();
        for declaration in css.split(';') {
            if let Some((name, value)) = declaration.split_once(':') {
                if !name.trim().is_empty() {
                    self.set(name, value);
                }
            }
        }
    }

    /// Serializes to `cssText` form.
    #[must_use]
    pub fn css_text(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.declarations {
            if !out.is_empty() {
                out.push(' ');
            }
            let _ = write!(out, "{name}: {value};");
        }
        out
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Returns true if no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Formats a pixel length the way CSS serializes it (`12px`, `0.5px`).
#[must_use]
pub fn px(value: f32) -> String {
    format!("{}px", trim_float(value))
}

/// Formats a number without a trailing `.0`.
#[must_use]
pub fn trim_float(value: f32) -> String {
    if value == value.trunc() && value.abs() < 1.0e9 {
        // -0.0 prints as "-0"
        format!("{}", value.trunc() + 0.0)
    } else {
        format!("{value}")
    }
}
