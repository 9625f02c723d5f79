//! Broadcast theme for zaptv
//!
//! Dark navy backdrop with an amber focus ring, the way set-top box menus
//! look from across the room.

use ratatui::style::{Color, Modifier, Style};

/// Color palette and style helpers
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #0b1020 (deep navy)
    pub const BACKGROUND: Color = Color::Rgb(0x0b, 0x10, 0x20);

    /// Panel background: #141b30
    pub const PANEL: Color = Color::Rgb(0x14, 0x1b, 0x30);

    /// Primary: #4fc3f7 (sky blue)
    pub const PRIMARY: Color = Color::Rgb(0x4f, 0xc3, 0xf7);

    /// Focus ring: #ffb300 (amber)
    pub const FOCUS: Color = Color::Rgb(0xff, 0xb3, 0x00);

    /// Live badge: #e53935 (broadcast red)
    pub const LIVE: Color = Color::Rgb(0xe5, 0x39, 0x35);

    /// Text: #e8eaf6
    pub const TEXT: Color = Color::Rgb(0xe8, 0xea, 0xf6);

    /// Dim: #5c6480
    pub const DIM: Color = Color::Rgb(0x5c, 0x64, 0x80);

    /// Success: #66bb6a
    pub const SUCCESS: Color = Color::Rgb(0x66, 0xbb, 0x6a);

    /// Warning: #ffa726
    pub const WARNING: Color = Color::Rgb(0xff, 0xa7, 0x26);

    /// Error: #ff5252
    pub const ERROR: Color = Color::Rgb(0xff, 0x52, 0x52);

    /// Border: #2b3556
    pub const BORDER: Color = Color::Rgb(0x2b, 0x35, 0x56);

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    /// D-pad focus: dark text on the amber ring color
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::FOCUS)
            .add_modifier(Modifier::BOLD)
    }

    /// Pointer-mode selection: softer than the focus ring
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .bg(Self::BORDER)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR).add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Border of the region that owns focus
    pub fn border_focused() -> Style {
        Style::default().fg(Self::FOCUS)
    }

    pub fn live_badge() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .bg(Self::LIVE)
            .add_modifier(Modifier::BOLD)
    }

    pub fn channel_number() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    pub fn progress_bar() -> Style {
        Style::default().fg(Self::PRIMARY).bg(Self::PANEL)
    }

    pub fn keybind() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::PANEL)
    }

    pub fn overlay() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::PANEL)
    }

    pub fn loading() -> Style {
        Style::default()
            .fg(Self::WARNING)
            .add_modifier(Modifier::ITALIC)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CONTRAST
// ═══════════════════════════════════════════════════════════════════════════

/// WCAG 2.0 relative luminance of an sRGB triple
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    let linear = |c: u8| {
        let c = f64::from(c) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// Contrast between two colors, from 1:1 up to 21:1
pub fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let a = relative_luminance(fg.0, fg.1, fg.2);
    let b = relative_luminance(bg.0, bg.1, bg.2);
    (a.max(b) + 0.05) / (a.min(b) + 0.05)
}

pub fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    if let Color::Rgb(r, g, b) = color {
        Some((r, g, b))
    } else {
        None
    }
}
