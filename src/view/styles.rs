//! Color pairs used by the terminal surface.

use crate::config::{ColorPair, ColorScheme, ConfigError};
use crate::model::LineStyle;
use ratatui::style::{Color, Style};
use std::str::FromStr;

/// Identifier of a color pair registered with the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorId {
    /// Static context lines.
    Normal,
    /// Typed region lines.
    Highlight,
    /// Window background and gutter.
    Background,
}

impl ColorId {
    /// All ids, in registration order.
    pub const ALL: [ColorId; 3] = [ColorId::Normal, ColorId::Highlight, ColorId::Background];

    /// Color pair a line is drawn with.
    pub fn for_line(style: LineStyle) -> Self {
        match style {
            LineStyle::Normal => ColorId::Normal,
            LineStyle::Highlight => ColorId::Highlight,
        }
    }
}

/// Resolved foreground/background colors for every [`ColorId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    normal: (Color, Color),
    highlight: (Color, Color),
    background: (Color, Color),
}

fn parse_color(slot: &str, value: &str) -> Result<Color, ConfigError> {
    Color::from_str(value).map_err(|_| ConfigError::InvalidColor {
        slot: slot.to_string(),
        value: value.to_string(),
    })
}

fn parse_pair(name: &str, pair: &ColorPair) -> Result<(Color, Color), ConfigError> {
    Ok((
        parse_color(&format!("{name}.fg"), &pair.fg)?,
        parse_color(&format!("{name}.bg"), &pair.bg)?,
    ))
}

impl Palette {
    /// Parse the configured color names.
    ///
    /// With `no_color` every pair resolves to the terminal's defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidColor` for names ratatui does not know.
    pub fn from_scheme(scheme: &ColorScheme, no_color: bool) -> Result<Self, ConfigError> {
        let palette = Self {
            normal: parse_pair("normal", &scheme.normal)?,
            highlight: parse_pair("highlight", &scheme.highlight)?,
            background: parse_pair("background", &scheme.background)?,
        };
        if no_color {
            return Ok(Self::monochrome());
        }
        Ok(palette)
    }

    /// Every pair uses the terminal's default colors.
    pub fn monochrome() -> Self {
        Self {
            normal: (Color::Reset, Color::Reset),
            highlight: (Color::Reset, Color::Reset),
            background: (Color::Reset, Color::Reset),
        }
    }

    /// Foreground and background for `id`.
    pub fn colors(&self, id: ColorId) -> (Color, Color) {
        match id {
            ColorId::Normal => self.normal,
            ColorId::Highlight => self.highlight,
            ColorId::Background => self.background,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            normal: (Color::Black, Color::White),
            highlight: (Color::Black, Color::Cyan),
            background: (Color::Black, Color::White),
        }
    }
}

/// Style table held by a surface; starts with terminal defaults until
/// `set_color` registers real pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleTable {
    normal: Style,
    highlight: Style,
    background: Style,
}

impl StyleTable {
    /// Register `foreground` on `background` under `id`.
    pub fn set(&mut self, id: ColorId, foreground: Color, background: Color) {
        let style = Style::default().fg(foreground).bg(background);
        match id {
            ColorId::Normal => self.normal = style,
            ColorId::Highlight => self.highlight = style,
            ColorId::Background => self.background = style,
        }
    }

    /// Style registered for `id`.
    pub fn get(&self, id: ColorId) -> Style {
        match id {
            ColorId::Normal => self.normal,
            ColorId::Highlight => self.highlight,
            ColorId::Background => self.background,
        }
    }
}
