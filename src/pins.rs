//! Channel and converter-slot assignments for the LaserLift main board.
//!
//! Single source of truth: every service and adapter references this module
//! rather than hard-coding channel numbers.

use crate::events::AxisId;

// ---------------------------------------------------------------------------
// Analog scan (10-bit ADC, scan mode)
// ---------------------------------------------------------------------------

/// Number of converter slots filled by one scan.
/// Scan order is AN4, AN5, AN11, AN12.
pub const ADC_SLOTS: usize = 4;

/// Photo-sensor slot for each target: target 1 on AN12, target 2 on AN5,
/// target 3 on AN4.
pub const TARGET_ADC_SLOTS: [usize; AxisId::COUNT] = [3, 1, 0];

/// Difficulty slider potentiometer (AN11).
pub const SLIDER_ADC_SLOT: usize = 2;

// ---------------------------------------------------------------------------
// Servo outputs (50 Hz output-compare PWM)
// ---------------------------------------------------------------------------

/// Servo channel driving each target's lift.
pub const AXIS_SERVO_CHANNELS: [u8; AxisId::COUNT] = [0, 1, 2];

/// Servo channel driving the gear dispenser.
pub const GEAR_SERVO_CHANNEL: u8 = 3;

/// Total servo outputs on the board.
pub const SERVO_CHANNELS: usize = 4;

/// Servo channel for an axis.
pub const fn axis_channel(axis: AxisId) -> u8 {
    AXIS_SERVO_CHANNELS[axis.index()]
}

/// Converter slot for an axis' hit sensor.
pub const fn target_slot(axis: AxisId) -> usize {
    TARGET_ADC_SLOTS[axis.index()]
}
