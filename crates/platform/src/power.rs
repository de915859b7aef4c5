//! Power management abstraction
//!
//! The node sleeps between wake cycles. Light sleep keeps RAM (and with it
//! the in-session partial-update baseline); deep sleep powers RAM down, so
//! the next wake starts with a full render.

/// Power management interface
pub trait PowerManager {
    /// Error type
    type Error: core::fmt::Debug;

    /// Free heap in bytes, if the platform can report it
    fn free_heap(&self) -> Option<usize> {
        None
    }

    /// Sleep for `seconds` in the given mode
    fn sleep(&mut self, mode: SleepMode, seconds: u32) -> Result<(), Self::Error>;
}

/// Sleep modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepMode {
    /// Light sleep (CPU halted, RAM retained, panel state kept)
    Light,
    /// Deep sleep (RAM lost, next wake is a cold start)
    Deep,
}

impl SleepMode {
    /// Whether RAM contents survive this sleep
    pub fn retains_ram(self) -> bool {
        self == SleepMode::Light
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            SleepMode::Light => "light",
            SleepMode::Deep => "deep",
        }
    }
}
