//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests and in the desktop simulator.

use std::collections::HashMap;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::display::{DisplayError, EpdSurface};
use crate::power::{PowerManager, SleepMode};
use crate::sensor::{LocalSensor, Reading};
use crate::storage::{Storage, StorageError};
use crate::text::{Font, TextMetrics};

/// In-memory storage with failure injection
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: HashMap<String, Vec<u8>>,
    unavailable: bool,
    fail_writes: bool,
    write_count: usize,
}

impl MemoryStorage {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose every operation fails as if the filesystem did not mount
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Make subsequent writes fail
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Pre-load `key` with raw bytes
    pub fn insert(&mut self, key: &str, bytes: impl Into<Vec<u8>>) {
        self.files.insert(key.to_owned(), bytes.into());
    }

    /// Raw bytes stored under `key`
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.files.get(key).map(Vec::as_slice)
    }

    /// Number of successful writes
    pub fn write_count(&self) -> usize {
        self.write_count
    }
}

impl Storage for MemoryStorage {
    type Error = StorageError;

    fn exists(&mut self, key: &str) -> Result<bool, Self::Error> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        Ok(self.files.contains_key(key))
    }

    fn read(&mut self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        Ok(self.files.get(key).cloned())
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        if self.fail_writes {
            return Err(StorageError::WriteFailed(key.to_owned()));
        }
        self.files.insert(key.to_owned(), bytes.to_vec());
        self.write_count = self.write_count.saturating_add(1);
        Ok(())
    }
}

/// Everything a [`RecordingSurface`] was asked to do, in order
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// `set_full_window`
    FullWindow,
    /// `set_partial_window`
    PartialWindow(Rectangle),
    /// `begin_page_loop`
    BeginPages,
    /// `clear`
    Clear,
    /// `draw_text`
    Text {
        /// Font used
        font: Font,
        /// Baseline origin
        origin: Point,
        /// Drawn text
        text: String,
    },
    /// A page was flushed by `advance_page`
    PageFlushed,
    /// `hibernate`
    Hibernate,
}

/// Headless e-paper surface that records every call
#[derive(Debug)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    pages: usize,
    current_page: usize,
    fail_flushes: usize,
    hibernated: bool,
    events: Vec<SurfaceEvent>,
}

impl RecordingSurface {
    /// Create a surface with a single page per loop
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pages: 1,
            current_page: 0,
            fail_flushes: 0,
            hibernated: false,
            events: Vec::new(),
        }
    }

    /// Number of pages each loop is split into
    pub fn with_pages(mut self, pages: usize) -> Self {
        self.pages = pages.max(1);
        self
    }

    /// Make the next `count` page flushes fail
    pub fn fail_next_flushes(&mut self, count: usize) {
        self.fail_flushes = count;
    }

    /// All recorded events
    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    /// Forget recorded events
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Rectangles passed to `set_partial_window`, in order
    pub fn partial_windows(&self) -> Vec<Rectangle> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::PartialWindow(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    /// Number of `set_full_window` calls
    pub fn full_window_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::FullWindow))
            .count()
    }

    /// Texts drawn, across all pages
    pub fn drawn_texts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether `hibernate` was called
    pub fn is_hibernated(&self) -> bool {
        self.hibernated
    }
}

impl EpdSurface for RecordingSurface {
    type Error = DisplayError;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_full_window(&mut self) {
        self.events.push(SurfaceEvent::FullWindow);
    }

    fn set_partial_window(&mut self, window: Rectangle) {
        self.events.push(SurfaceEvent::PartialWindow(window));
    }

    fn begin_page_loop(&mut self) {
        self.current_page = 0;
        self.events.push(SurfaceEvent::BeginPages);
    }

    fn advance_page(&mut self) -> Result<bool, Self::Error> {
        if self.hibernated {
            return Err(DisplayError::Hibernating);
        }
        if self.fail_flushes > 0 {
            self.fail_flushes -= 1;
            return Err(DisplayError::Communication);
        }
        self.events.push(SurfaceEvent::PageFlushed);
        self.current_page = self.current_page.saturating_add(1);
        Ok(self.current_page < self.pages)
    }

    fn clear(&mut self) {
        self.events.push(SurfaceEvent::Clear);
    }

    fn draw_text(&mut self, font: Font, origin: Point, text: &str) {
        self.events.push(SurfaceEvent::Text {
            font,
            origin,
            text: text.to_owned(),
        });
    }

    fn hibernate(&mut self) -> Result<(), Self::Error> {
        self.hibernated = true;
        self.events.push(SurfaceEvent::Hibernate);
        Ok(())
    }
}

/// Monospace metrics: every character is as wide as the font's advance
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedWidthText;

impl FixedWidthText {
    /// Advance width of one glyph in `font`
    pub const fn advance(font: Font) -> u32 {
        match font {
            Font::Large => 30,
            Font::Default | Font::Battery => 20,
            Font::Small => 13,
            Font::MoonPhase => 48,
        }
    }
}

impl TextMetrics for FixedWidthText {
    fn measure_width(&self, font: Font, text: &str) -> u32 {
        let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        chars.saturating_mul(Self::advance(font))
    }
}

/// Local sensor returning fixed readings
#[derive(Debug, Clone)]
pub struct MockSensor {
    ok: bool,
    readings: Vec<Reading>,
}

impl MockSensor {
    /// Healthy sensor with typical indoor readings
    pub fn healthy() -> Self {
        Self {
            ok: true,
            readings: vec![
                Reading::new("humidity", 60.0, "%"),
                Reading::new("pressure", 1013.0, "hPa"),
                Reading::new("temperature", 25.5, "°C"),
            ],
        }
    }

    /// Sensor whose setup failed
    pub fn failed() -> Self {
        Self {
            ok: false,
            readings: Vec::new(),
        }
    }
}

impl LocalSensor for MockSensor {
    fn label(&self) -> &str {
        "BME680"
    }

    fn is_ok(&self) -> bool {
        self.ok
    }

    fn read(&mut self) -> Vec<Reading> {
        self.readings.clone()
    }
}

/// Power manager that records requested sleeps
#[derive(Debug, Default)]
pub struct MockPower {
    free_heap: Option<usize>,
    sleeps: Vec<(SleepMode, u32)>,
}

impl MockPower {
    /// Report `bytes` of free heap
    pub fn with_free_heap(bytes: usize) -> Self {
        Self {
            free_heap: Some(bytes),
            sleeps: Vec::new(),
        }
    }

    /// Sleeps requested so far
    pub fn sleeps(&self) -> &[(SleepMode, u32)] {
        &self.sleeps
    }
}

impl PowerManager for MockPower {
    type Error = core::convert::Infallible;

    fn free_heap(&self) -> Option<usize> {
        self.free_heap
    }

    fn sleep(&mut self, mode: SleepMode, seconds: u32) -> Result<(), Self::Error> {
        self.sleeps.push((mode, seconds));
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trips_bytes() {
        let mut store = MemoryStorage::new();
        store.write("/a", b"hello").unwrap();
        assert!(store.exists("/a").unwrap());
        assert_eq!(store.read("/a").unwrap().unwrap(), b"hello");
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn unavailable_storage_fails_everything() {
        let mut store = MemoryStorage::unavailable();
        assert_eq!(store.exists("/a"), Err(StorageError::Unavailable));
        assert_eq!(store.read("/a"), Err(StorageError::Unavailable));
        assert_eq!(store.write("/a", b"x"), Err(StorageError::Unavailable));
    }

    #[test]
    fn recording_surface_pages() {
        let mut surface = RecordingSurface::new(800, 480).with_pages(3);
        surface.begin_page_loop();
        assert!(surface.advance_page().unwrap());
        assert!(surface.advance_page().unwrap());
        assert!(!surface.advance_page().unwrap());
    }

    #[test]
    fn recording_surface_injected_flush_failure() {
        let mut surface = RecordingSurface::new(800, 480);
        surface.fail_next_flushes(1);
        surface.begin_page_loop();
        assert_eq!(surface.advance_page(), Err(DisplayError::Communication));
        surface.begin_page_loop();
        assert_eq!(surface.advance_page(), Ok(false));
    }

    #[test]
    fn fixed_width_text_counts_chars_not_bytes() {
        let metrics = FixedWidthText;
        assert_eq!(metrics.measure_width(Font::Default, "22.5°C"), 6 * 20);
    }
}
