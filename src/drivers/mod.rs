//! Peripheral drivers behind the port traits.

pub mod max7219;
pub mod servo;
