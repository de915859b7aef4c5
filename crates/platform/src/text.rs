//! Fonts and text measurement
//!
//! Glyph rasterisation belongs to the font collaborator. The core only needs
//! two things from it: which font a string is drawn in, and how wide the
//! result is in pixels so dirty zones can be sized around it.

/// Fonts used by the node layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    /// 38pt monospace, clock and headline measurements
    Large,
    /// 24pt monospace, body text
    Default,
    /// 16pt monospace, min/max, statuses, staleness
    Small,
    /// 24pt battery glyph font (`'0'`, `'5'`..`'<'`)
    Battery,
    /// 48pt moon phase glyph font (`'0'`, `'A'`..`'Z'`)
    MoonPhase,
}

impl Font {
    /// Vertical distance between two baselines set in this font
    pub const fn line_spacing(self) -> u32 {
        match self {
            Font::Large => 50,
            Font::Default | Font::Battery => 32 + 2,
            Font::Small => 22 + 6,
            Font::MoonPhase => 48,
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Font::Large => "large",
            Font::Default => "default",
            Font::Small => "small",
            Font::Battery => "battery",
            Font::MoonPhase => "moon",
        }
    }
}

/// Pixel width of rendered text.
pub trait TextMetrics {
    /// Width in pixels of `text` set in `font`
    fn measure_width(&self, font: Font, text: &str) -> u32;
}
