//! Battery glyph levels
//!
//! The battery font has nine glyphs from empty to full. A 0–100 percentage
//! is bucketed linearly: `round(pct / 100 * 8)`, clamped to `0..=8`.

use serde::{Deserialize, Serialize};

/// Glyphs of the battery font, empty → full
const GLYPHS: [char; 9] = ['0', '5', '6', '7', '8', '9', ':', ';', '<'];

/// One of nine discrete battery levels
///
/// Wraps a `u8` with the invariant `0 <= level <= 8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BatteryLevel(u8);

impl BatteryLevel {
    /// Highest level (full battery)
    pub const MAX: u8 = 8;

    /// Bucket a battery percentage. Out-of-range input is clamped.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() {
            return Self(0);
        }
        let level = (pct / 100.0 * f64::from(Self::MAX)).round();
        // Clamped to [0, 8] before the cast.
        Self(level.clamp(0.0, f64::from(Self::MAX)) as u8)
    }

    /// Level as a number, `0..=8`
    pub fn get(self) -> u8 {
        self.0
    }

    /// Glyph to draw with the battery font
    pub fn glyph(self) -> char {
        GLYPHS.get(usize::from(self.0)).copied().unwrap_or('0')
    }
}

impl TryFrom<u8> for BatteryLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        if level > Self::MAX {
            Err(format!("battery level {level} out of range 0..=8"))
        } else {
            Ok(Self(level))
        }
    }
}

impl From<BatteryLevel> for u8 {
    fn from(level: BatteryLevel) -> u8 {
        level.0
    }
}
