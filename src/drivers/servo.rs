//! Hobby servo on one PWM channel (50 Hz frame).
//!
//! Position is expressed on the 0–1000 tick scale used throughout the
//! controller and mapped linearly onto a 1000–2000 µs pulse.
//!
//! ## Dual-target design
//!
//! Generic over [`embedded_hal::pwm::SetDutyCycle`], so the same driver runs
//! against a real timer channel or a host test double.  Bus errors are
//! logged and counted; the last commanded position is kept either way.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

/// Servo frame period (µs).
pub const FRAME_US: u32 = 20_000;
/// Pulse width at tick 0 (µs).
pub const MIN_PULSE_US: u32 = 1_000;
/// Pulse width at [`MAX_TICKS`] (µs).
pub const MAX_PULSE_US: u32 = 2_000;
/// Top of the position scale.
pub const MAX_TICKS: i32 = 1_000;

/// Pulse width for a position, clamped to the servo's range.
pub fn ticks_to_pulse_us(ticks: i32) -> u32 {
    let t = ticks.clamp(0, MAX_TICKS) as u32;
    MIN_PULSE_US + t * (MAX_PULSE_US - MIN_PULSE_US) / MAX_TICKS as u32
}

pub struct ServoChannel<P> {
    pwm: P,
    position: Option<i32>,
    errors: u32,
}

impl<P: SetDutyCycle> ServoChannel<P> {
    pub fn new(pwm: P) -> Self {
        Self {
            pwm,
            position: None,
            errors: 0,
        }
    }

    pub fn set_position(&mut self, ticks: i32) {
        let pulse = ticks_to_pulse_us(ticks);
        if let Err(e) = self.pwm.set_duty_cycle_fraction(pulse_fraction(pulse), FRAME_US as u16) {
            self.errors = self.errors.saturating_add(1);
            warn!("servo: PWM write failed: {:?}", e);
        }
        self.position = Some(ticks.clamp(0, MAX_TICKS));
    }

    /// Last commanded position, `None` until the first write.
    pub fn position(&self) -> Option<i32> {
        self.position
    }

    pub fn errors(&self) -> u32 {
        self.errors
    }
}

/// Pulse width as a numerator over [`FRAME_US`].
fn pulse_fraction(pulse_us: u32) -> u16 {
    pulse_us.min(FRAME_US) as u16
}
