//! Drawing the layout
//!
//! Every function here draws into the currently selected window using
//! surface coordinates; the panel discards whatever falls outside the window.
//! Full renders call all of them, partial renders only the dirty zone's.

use embedded_graphics::prelude::*;
use model::{DisplayModel, NodeRecord};
use platform::{EpdSurface, Font, LocalSensor, TextMetrics};

use crate::config::ViewConfig;
use crate::zone::{date_x, px, Geometry, ZoneId};

/// Devices shown per node, top to bottom
const DEVICES: [&str; 2] = ["bme680", "sht31d"];

/// Metrics shown per device, top to bottom
const METRICS: [&str; 3] = ["temperature", "humidity", "pressure"];

/// Label used when no local sensor was wired in
const DEFAULT_SENSOR_LABEL: &str = "BME680";

/// Characters of the node firmware version shown
const VERSION_CHARS: usize = 8;

/// Everything drawing needs besides the surface and the model
#[derive(Clone, Copy)]
pub struct Layout<'a> {
    /// Surface dimensions
    pub geom: Geometry,
    /// Font collaborator
    pub metrics: &'a dyn TextMetrics,
    /// Display options
    pub config: &'a ViewConfig,
}

/// Draw the whole panel for a valid model.
pub fn draw_full<D: EpdSurface + ?Sized>(surface: &mut D, layout: &Layout<'_>, model: &DisplayModel) {
    surface.clear();
    draw_nodes(surface, layout, model);
    draw_sun_moon(surface, layout, model);
    if layout.config.show_clock {
        draw_clock(surface, layout, model);
    }
    draw_date(surface, layout, model);
}

/// Draw one zone's content after blanking its window.
pub fn draw_zone<D: EpdSurface + ?Sized>(
    surface: &mut D,
    layout: &Layout<'_>,
    id: ZoneId,
    model: &DisplayModel,
) {
    surface.clear();
    match id {
        ZoneId::Clock => draw_clock(surface, layout, model),
        ZoneId::Date => draw_date(surface, layout, model),
        ZoneId::SunMoon => draw_sun_moon(surface, layout, model),
        ZoneId::Nodes => draw_nodes(surface, layout, model),
    }
}

/// Lines shown when telemetry is unusable
pub fn fallback_lines(sensor: Option<&mut (dyn LocalSensor + '_)>) -> Vec<String> {
    let mut lines = vec!["Failed to get data - local sensor only".to_owned()];
    match sensor {
        Some(sensor) if sensor.is_ok() => {
            let mut readings = sensor.read();
            readings.sort_by(|a, b| a.name.cmp(&b.name));
            lines.extend(
                readings
                    .iter()
                    .map(|r| format!("{}: {:.2} {}", r.name, r.value, r.unit)),
            );
        }
        Some(sensor) => lines.push(format!("Local sensor ({}) setup failed", sensor.label())),
        None => lines.push(format!("Local sensor ({DEFAULT_SENSOR_LABEL}) setup failed")),
    }
    lines
}

/// Draw the fallback screen, one line per row.
pub fn draw_fallback<D: EpdSurface + ?Sized>(surface: &mut D, lines: &[String]) {
    surface.clear();
    let mut cursor = Cursor::new(0, 0);
    for line in lines {
        cursor.advance(Font::Default);
        surface.draw_text(Font::Default, cursor.point(), line);
    }
}

/// Baseline position that walks down a column
struct Cursor {
    x: i32,
    y: i32,
}

impl Cursor {
    fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn advance(&mut self, font: Font) {
        self.advance_by(font.line_spacing());
    }

    fn advance_by(&mut self, pixels: u32) {
        self.y = self.y.saturating_add(px(pixels));
    }

    fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

fn draw_clock<D: EpdSurface + ?Sized>(surface: &mut D, layout: &Layout<'_>, model: &DisplayModel) {
    surface.draw_text(
        Font::Large,
        Point::new(0, layout.geom.bottom_baseline()),
        &model.time_text,
    );
}

fn draw_date<D: EpdSurface + ?Sized>(surface: &mut D, layout: &Layout<'_>, model: &DisplayModel) {
    let width = layout.metrics.measure_width(Font::Default, &model.date_text);
    surface.draw_text(
        Font::Default,
        Point::new(date_x(&layout.geom, width), layout.geom.bottom_baseline()),
        &model.date_text,
    );
}

fn draw_sun_moon<D: EpdSurface + ?Sized>(surface: &mut D, layout: &Layout<'_>, model: &DisplayModel) {
    let mut cursor = Cursor::new(0, layout.geom.sun_moon_top());

    cursor.advance(Font::Default);
    let sun = format!("Sun:  {}  {}  {}", model.sun.rise, model.sun.transit, model.sun.set);
    surface.draw_text(Font::Default, cursor.point(), &sun);

    cursor.advance(Font::Default);
    let moon = format!("Moon: {}  {}  {}  ", model.moon.rise, model.moon.transit, model.moon.set);
    surface.draw_text(Font::Default, cursor.point(), &moon);
    if let Some(letter) = model.moon.phase_letter {
        let x = px(layout.metrics.measure_width(Font::Default, &moon));
        surface.draw_text(Font::MoonPhase, Point::new(x, cursor.y), letter.encode_utf8(&mut [0; 4]));
    }

    if !model.moon.phase_name.is_empty() {
        cursor.advance(Font::Small);
        surface.draw_text(Font::Small, cursor.point(), &model.moon.phase_name);
    }
}

fn draw_nodes<D: EpdSurface + ?Sized>(surface: &mut D, layout: &Layout<'_>, model: &DisplayModel) {
    let column_width = px(layout.geom.column_width(model.node_count()));
    let mut x = 0i32;
    for node in model.nodes.values() {
        draw_node(surface, layout, node, x);
        x = x.saturating_add(column_width);
    }
}

fn draw_node<D: EpdSurface + ?Sized>(surface: &mut D, layout: &Layout<'_>, node: &NodeRecord, x: i32) {
    let mut cursor = Cursor::new(x, 0);

    // Header: name, then battery glyph on the same baseline.
    cursor.advance(Font::Default);
    let name = format!("{} ", node.display_name);
    surface.draw_text(Font::Default, cursor.point(), &name);
    if let Some(level) = node.battery_level {
        let glyph_x = x.saturating_add(px(layout.metrics.measure_width(Font::Default, &name)));
        surface.draw_text(
            Font::Battery,
            Point::new(glyph_x, cursor.y),
            level.glyph().encode_utf8(&mut [0; 4]),
        );
    }
    cursor.advance_by(Font::Default.line_spacing() / 2);

    for device in DEVICES {
        let Some(values) = node.measurements.get(device) else {
            continue;
        };
        for metric in METRICS {
            let Some(text) = values.get(metric).and_then(|v| metric_text(metric, *v)) else {
                continue;
            };
            let extrema = node
                .measurements_min_max
                .get(device)
                .and_then(|m| m.get(metric))
                .and_then(|mm| Some(format!("{} {}", metric_text(metric, mm.min)?, metric_text(metric, mm.max)?)));
            if let Some(extrema) = extrema {
                cursor.advance(Font::Small);
                surface.draw_text(Font::Small, cursor.point(), &extrema);
            }
            cursor.advance(Font::Large);
            surface.draw_text(Font::Large, cursor.point(), &text);
        }
    }

    for (subsystem, status) in &node.status {
        cursor.advance(Font::Small);
        surface.draw_text(Font::Small, cursor.point(), &format!("{subsystem}:{status}"));
    }

    cursor.advance(Font::Small);
    if !node.stale_state.is_empty() {
        surface.draw_text(Font::Small, cursor.point(), &node.stale_state);
    }

    if layout.config.show_node_versions {
        if let Some(version) = &node.version {
            cursor.advance(Font::Small);
            let short: String = version.chars().take(VERSION_CHARS).collect();
            surface.draw_text(Font::Small, cursor.point(), &format!("v:{short}"));
        }
    }
}

/// Displayed form of a metric; `None` for metrics the layout does not show
pub fn metric_text(metric: &str, value: f64) -> Option<String> {
    match metric {
        "temperature" => Some(format!("{value:.1}°C")),
        "humidity" => Some(format!("{value:.1}%")),
        "pressure" => Some(format!("{value:.0}hPa")),
        _ => None,
    }
}
