//! Display zones
//!
//! The panel is split into four independently refreshable zones. Each zone
//! knows how to tell whether it changed between two models and where it
//! sits on the surface.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐ 0
//! │  Nodes: one column per node                  │
//! │                                              │
//! ├──────────────────────────────────────────────┤ h − 176
//! │  Sun:  07:41  12:29  17:16                   │
//! │  Moon: 14:02  19:11  01:20  <phase glyph>    │
//! ├──────────────┬────────────────┬──────────────┤ h − 60
//! │  20:00       │                │  Monday 3rd… │
//! └──────────────┴────────────────┴──────────────┘ h − 10 (baseline)
//! ```

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use model::{DisplayModel, TolerantEq};
use platform::{Font, TextMetrics};

/// Gap between the bottom baseline and the panel edge
pub const BOTTOM_MARGIN: u32 = 10;

/// Horizontal padding around clock and date text
pub const TEXT_PADDING: u32 = 20;

/// Height of the sun/moon band: two text lines plus the phase glyph
pub const SUN_MOON_HEIGHT: u32 = Font::Default.line_spacing() * 2 + Font::MoonPhase.line_spacing();

/// Surface dimensions every zone rectangle derives from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Surface width
    pub width: u32,
    /// Surface height
    pub height: u32,
}

impl Geometry {
    /// Dimensions of a `width` × `height` surface
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whole surface
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(self.width, self.height))
    }

    /// Baseline of the clock and date
    pub fn bottom_baseline(&self) -> i32 {
        px(self.height.saturating_sub(BOTTOM_MARGIN))
    }

    /// Top of the clock/date band
    pub fn clock_band_top(&self) -> i32 {
        px(self
            .height
            .saturating_sub(BOTTOM_MARGIN)
            .saturating_sub(Font::Large.line_spacing()))
    }

    /// Top of the sun/moon band
    pub fn sun_moon_top(&self) -> i32 {
        self.clock_band_top().saturating_sub(px(SUN_MOON_HEIGHT)).max(0)
    }

    /// Width of one node column
    pub fn column_width(&self, node_count: usize) -> u32 {
        let n = u32::try_from(node_count.max(1)).unwrap_or(u32::MAX);
        self.width / n
    }
}

/// Convert a pixel length to a coordinate, saturating
pub(crate) fn px(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Zone identifiers, in refresh priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneId {
    /// `HH:MM`, bottom left
    Clock,
    /// Calendar date, bottom right
    Date,
    /// Sun and moon lines
    SunMoon,
    /// Node grid
    Nodes,
}

impl ZoneId {
    /// Log name
    pub fn name(self) -> &'static str {
        match self {
            ZoneId::Clock => "clock",
            ZoneId::Date => "date",
            ZoneId::SunMoon => "sun_moon",
            ZoneId::Nodes => "nodes",
        }
    }
}

/// Did a zone's content change between the previous and current model?
pub type ChangedFn = fn(&DisplayModel, &DisplayModel) -> bool;

/// Where a zone sits, sized for the current model
pub type RectFn = fn(&Geometry, &DisplayModel, &dyn TextMetrics) -> Rectangle;

/// One row of the zone table
#[derive(Clone, Copy)]
pub struct Zone {
    /// Identifier
    pub id: ZoneId,
    /// Change predicate
    pub changed: ChangedFn,
    /// Rectangle on the surface
    pub rect: RectFn,
}

impl core::fmt::Debug for Zone {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Zone").field("id", &self.id).finish_non_exhaustive()
    }
}

/// All zones in the order they are checked and redrawn
pub const ZONES: [Zone; 4] = [
    Zone {
        id: ZoneId::Clock,
        changed: clock_changed,
        rect: clock_rect,
    },
    Zone {
        id: ZoneId::Date,
        changed: date_changed,
        rect: date_rect,
    },
    Zone {
        id: ZoneId::SunMoon,
        changed: sun_moon_changed,
        rect: sun_moon_rect,
    },
    Zone {
        id: ZoneId::Nodes,
        changed: nodes_changed,
        rect: nodes_rect,
    },
];

/// Table row for `id`
pub fn zone(id: ZoneId) -> Option<&'static Zone> {
    ZONES.iter().find(|z| z.id == id)
}

fn clock_changed(prev: &DisplayModel, cur: &DisplayModel) -> bool {
    prev.time_text != cur.time_text
}

fn date_changed(prev: &DisplayModel, cur: &DisplayModel) -> bool {
    prev.date_text != cur.date_text
}

// Everything the zone draws, phase name included.
fn sun_moon_changed(prev: &DisplayModel, cur: &DisplayModel) -> bool {
    prev.sun != cur.sun || prev.moon != cur.moon
}

// Coarse: any node difference redraws the whole grid.
fn nodes_changed(prev: &DisplayModel, cur: &DisplayModel) -> bool {
    !prev.nodes.tolerant_eq(&cur.nodes)
}

/// Clock text in the large font, padded on the right
pub fn clock_rect(geom: &Geometry, model: &DisplayModel, metrics: &dyn TextMetrics) -> Rectangle {
    let text_width = metrics.measure_width(Font::Large, &model.time_text);
    Rectangle::new(
        Point::new(0, geom.clock_band_top()),
        Size::new(text_width.saturating_add(TEXT_PADDING), Font::Large.line_spacing()),
    )
}

/// Date text right-aligned, padded on both sides
pub fn date_rect(geom: &Geometry, model: &DisplayModel, metrics: &dyn TextMetrics) -> Rectangle {
    let text_width = metrics.measure_width(Font::Default, &model.date_text);
    let x = date_x(geom, text_width);
    let height = Font::Default.line_spacing();
    Rectangle::new(
        Point::new(x.saturating_sub(px(TEXT_PADDING / 2)), geom.bottom_baseline().saturating_sub(px(height))),
        Size::new(text_width.saturating_add(TEXT_PADDING), height),
    )
}

/// Left edge of right-aligned date text
pub(crate) fn date_x(geom: &Geometry, text_width: u32) -> i32 {
    px(geom.width).saturating_sub(px(text_width))
}

/// Full-width band above the clock and date
pub fn sun_moon_rect(geom: &Geometry, _model: &DisplayModel, _metrics: &dyn TextMetrics) -> Rectangle {
    let top = geom.sun_moon_top();
    let bottom = geom.clock_band_top();
    Rectangle::new(
        Point::new(0, top),
        Size::new(geom.width, u32::try_from(bottom.saturating_sub(top)).unwrap_or(0)),
    )
}

/// Everything above the sun/moon band
pub fn nodes_rect(geom: &Geometry, _model: &DisplayModel, _metrics: &dyn TextMetrics) -> Rectangle {
    Rectangle::new(
        Point::zero(),
        Size::new(geom.width, u32::try_from(geom.sun_moon_top()).unwrap_or(0)),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use model::NodeRecord;
    use platform::mocks::FixedWidthText;

    fn geom() -> Geometry {
        Geometry::new(800, 480)
    }

    fn model(time: &str, date: &str) -> DisplayModel {
        DisplayModel {
            time_text: time.into(),
            date_text: date.into(),
            ..DisplayModel::default()
        }
    }

    #[test]
    fn zones_are_checked_in_priority_order() {
        let ids: Vec<ZoneId> = ZONES.iter().map(|z| z.id).collect();
        assert_eq!(ids, [ZoneId::Clock, ZoneId::Date, ZoneId::SunMoon, ZoneId::Nodes]);
    }

    #[test]
    fn clock_zone_hugs_the_text() {
        let r = clock_rect(&geom(), &model("20:00", ""), &FixedWidthText);
        assert_eq!(r.top_left, Point::new(0, 420));
        assert_eq!(r.size, Size::new(5 * 30 + 20, 50));
    }

    #[test]
    fn date_zone_is_right_aligned() {
        let m = model("", "Monday 3rd November 2025");
        let r = date_rect(&geom(), &m, &FixedWidthText);
        // 24 glyphs at 20 px
        assert_eq!(r.top_left, Point::new(800 - 480 - 10, 436));
        assert_eq!(r.size, Size::new(480 + 20, 34));
    }

    #[test]
    fn bands_stack_without_overlap() {
        let m = DisplayModel::default();
        let nodes = nodes_rect(&geom(), &m, &FixedWidthText);
        let sun_moon = sun_moon_rect(&geom(), &m, &FixedWidthText);
        let clock = clock_rect(&geom(), &m, &FixedWidthText);
        assert_eq!(nodes.size.height, 304);
        assert_eq!(sun_moon.top_left.y, 304);
        assert_eq!(sun_moon.size.height, SUN_MOON_HEIGHT);
        assert_eq!(sun_moon.top_left.y + 116, clock.top_left.y);
    }

    #[test]
    fn tiny_surface_saturates() {
        let g = Geometry::new(100, 40);
        let m = DisplayModel::default();
        assert_eq!(g.sun_moon_top(), 0);
        assert_eq!(nodes_rect(&g, &m, &FixedWidthText).size.height, 0);
    }

    #[test]
    fn predicates_only_see_their_fields() {
        let a = model("20:00", "Monday");
        let mut b = model("20:01", "Monday");
        assert!((zone(ZoneId::Clock).unwrap().changed)(&a, &b));
        assert!(!(zone(ZoneId::Date).unwrap().changed)(&a, &b));
        assert!(!(zone(ZoneId::SunMoon).unwrap().changed)(&a, &b));
        assert!(!(zone(ZoneId::Nodes).unwrap().changed)(&a, &b));

        b.moon.phase_letter = Some('C');
        assert!((zone(ZoneId::SunMoon).unwrap().changed)(&a, &b));
        b.moon = a.moon.clone();
        assert!(!(zone(ZoneId::SunMoon).unwrap().changed)(&a, &b));
        b.moon.phase_name = "Waxing Crescent".into();
        assert!((zone(ZoneId::SunMoon).unwrap().changed)(&a, &b));
        assert!(!(zone(ZoneId::Nodes).unwrap().changed)(&a, &b));
    }

    #[test]
    fn node_zone_ignores_jitter() {
        let mut a = DisplayModel::default();
        let mut node = NodeRecord::default();
        node.measurements.entry("bme680".into()).or_default().insert("temperature".into(), 22.5);
        a.nodes.insert("n".into(), node);
        let mut b = a.clone();
        b.nodes.get_mut("n").unwrap().measurements.get_mut("bme680").unwrap().insert("temperature".into(), 22.6);
        assert!(!nodes_changed(&a, &b));
        b.nodes.get_mut("n").unwrap().stale_state = "31ʼ old".into();
        assert!(nodes_changed(&a, &b));
    }
}
