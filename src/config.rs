//! Game configuration parameters
//!
//! Every tunable of the controller lives here: session timing, target travel
//! limits and speed range, gear dwell, detector thresholds and the display /
//! strip settings.  None of these values is an invariant of the design; the
//! rig is re-tuned by loading a JSON file or sending
//! [`AppCommand::UpdateConfig`](crate::app::commands::AppCommand).

use serde::{Deserialize, Serialize};

use crate::drivers::servo::MAX_TICKS;
use crate::error::{Error, Result};

/// Core game configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // --- Session timing ---
    /// Length of one round (milliseconds)
    pub session_ms: u32,
    /// Countdown start value shown on the display (seconds)
    pub session_secs: u16,
    /// Round is abandoned after this long without a hit (milliseconds)
    pub inactivity_ms: u32,
    /// Countdown / scoring tick (milliseconds)
    pub second_tick_ms: u32,
    /// Time the result stays up before returning to the lobby (milliseconds)
    pub settle_ms: u32,

    // --- Target motion ---
    /// Slew update period (milliseconds)
    pub motion_period_ms: u32,
    /// Lowest target position; reaching it is a crash (servo ticks)
    pub floor_ticks: i32,
    /// Highest target position (servo ticks)
    pub ceiling_ticks: i32,
    /// Slew step at 1 % difficulty (ticks per motion period)
    pub min_step: i32,
    /// Slew step at 100 % difficulty (ticks per motion period)
    pub max_step: i32,
    /// Difficulty used until the slider first reports (percent)
    pub default_difficulty_pct: u8,
    /// Danger line sits at floor + travel / divisor
    pub danger_line_divisor: i32,

    // --- Gear dispenser ---
    /// Gear servo rest position (servo ticks)
    pub gear_rest_ticks: i32,
    /// Gear servo dispense position (servo ticks)
    pub gear_active_ticks: i32,
    /// Hold time at each gear position (milliseconds)
    pub gear_dwell_ms: u32,

    // --- Detectors ---
    /// Rise above baseline that registers a laser hit (ADC counts)
    pub hit_delta: u16,
    /// Level above baseline the sensor must fall under to release a hit (ADC counts)
    pub release_delta: u16,
    /// Slider movement ignored around the last reported reading (ADC counts)
    pub difficulty_dead_band: u16,
    /// Full-scale ADC reading
    pub adc_full_scale: u16,
    /// Scans averaged when capturing sensor baselines
    pub baseline_samples: u8,

    // --- Display / status strip ---
    /// Columns the frame buffer scrolls per glyph (glyph width + gap)
    pub glyph_scroll_cols: u8,
    /// Pixels on the status strip
    pub strip_len: u16,
    /// Global strip brightness (0-255)
    pub strip_brightness: u8,

    // --- Diagnostics ---
    /// Boot into the diagnostic test mode instead of the lobby
    pub start_in_test_mode: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Session timing
            session_ms: 60_000,
            session_secs: 60,
            inactivity_ms: 20_000,
            second_tick_ms: 1_000,
            settle_ms: 3_000,

            // Target motion
            motion_period_ms: 20, // 50 Hz, one servo frame
            floor_ticks: 100,
            ceiling_ticks: 1_000,
            min_step: 2,
            max_step: 20,
            default_difficulty_pct: 50,
            danger_line_divisor: 4,

            // Gear dispenser
            gear_rest_ticks: 0,
            gear_active_ticks: 1_000,
            gear_dwell_ms: 500,

            // Detectors
            hit_delta: 300,
            release_delta: 20,
            difficulty_dead_band: 100,
            adc_full_scale: 1_023, // 10-bit converter
            baseline_samples: 10,

            // Display / strip
            glyph_scroll_cols: 4, // 3-column glyph + 1 blank
            strip_len: 122,
            strip_brightness: 32,

            start_in_test_mode: cfg!(feature = "test-mode"),
        }
    }
}

impl GameConfig {
    /// Reject combinations that would break a component invariant.
    ///
    /// Returns the name of the first offending field.
    pub fn validate(&self) -> Result<()> {
        let on_scale = |ticks: i32| (0..=MAX_TICKS).contains(&ticks);
        if !on_scale(self.floor_ticks) || !on_scale(self.ceiling_ticks) {
            return Err(Error::Config("travel limits must be in 0..=MAX_TICKS"));
        }
        if self.floor_ticks >= self.ceiling_ticks {
            return Err(Error::Config("floor_ticks must be below ceiling_ticks"));
        }
        if self.min_step < 0 || self.min_step > self.max_step {
            return Err(Error::Config("min_step must be in 0..=max_step"));
        }
        if self.max_step > MAX_TICKS {
            return Err(Error::Config("max_step must not exceed MAX_TICKS"));
        }
        if !on_scale(self.gear_rest_ticks) || !on_scale(self.gear_active_ticks) {
            return Err(Error::Config("gear positions must be in 0..=MAX_TICKS"));
        }
        if self.danger_line_divisor <= 0 {
            return Err(Error::Config("danger_line_divisor must be positive"));
        }
        if self.release_delta >= self.hit_delta {
            return Err(Error::Config("release_delta must be below hit_delta"));
        }
        if self.adc_full_scale == 0 {
            return Err(Error::Config("adc_full_scale must be non-zero"));
        }
        if self.baseline_samples == 0 {
            return Err(Error::Config("baseline_samples must be non-zero"));
        }
        if self.session_secs == 0 {
            return Err(Error::Config("session_secs must be non-zero"));
        }
        if self.second_tick_ms == 0 || self.motion_period_ms == 0 {
            return Err(Error::Config("periodic timers must be non-zero"));
        }
        if self.glyph_scroll_cols == 0 {
            return Err(Error::Config("glyph_scroll_cols must be non-zero"));
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON document and validate the result.
    /// Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|_| Error::Config("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }
}
