//! Difficulty slider (potentiometer on the ADC).
//!
//! Reports only when the raw reading leaves a dead-band around the last
//! reported reading.  The first reading always reports.

#[derive(Debug)]
pub struct DifficultyDetector {
    last_reported: Option<u16>,
    dead_band: u16,
    full_scale: u16,
}

/// Raw reading to 0..=100 %.
pub fn raw_to_percent(raw: u16, full_scale: u16) -> u8 {
    let full = u32::from(full_scale.max(1));
    (u32::from(raw.min(full_scale)) * 100 / full) as u8
}

impl DifficultyDetector {
    pub fn new(dead_band: u16, full_scale: u16) -> Self {
        Self {
            last_reported: None,
            dead_band,
            full_scale,
        }
    }

    /// Returns the new percentage if the slider moved far enough.
    pub fn check(&mut self, raw: u16) -> Option<u8> {
        let moved = match self.last_reported {
            None => true,
            Some(last) => raw.abs_diff(last) > self.dead_band,
        };
        if !moved {
            return None;
        }
        self.last_reported = Some(raw);
        Some(raw_to_percent(raw, self.full_scale))
    }

    pub fn retune(&mut self, dead_band: u16, full_scale: u16) {
        self.dead_band = dead_band;
        self.full_scale = full_scale;
    }

    pub fn last_reported(&self) -> Option<u16> {
        self.last_reported
    }
}
