//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ GameService (domain)
//! ```
//!
//! Driven adapters (beam/ADC inputs, servos, LED matrix, light strip, event
//! sinks) implement these traits.  The
//! [`GameService`](super::service::GameService) consumes them via generics,
//! so the domain core never touches hardware directly.
//!
//! Hardware faults are not surfaced through the ports.  Drivers log and
//! count bus errors and carry on.

use crate::pins::ADC_SLOTS;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port polled by the event checker bank once per pass.
pub trait SensorPort {
    /// Level of the hand-wave beam receiver (`true` = high, beam clear).
    fn read_beam(&mut self) -> bool;

    /// One scan of every ADC slot; see [`crate::pins`] for the slot map.
    fn read_analog_multi(&mut self) -> [u16; ADC_SLOTS];

    /// Next keystroke from the test harness, if any.
    fn poll_key(&mut self) -> Option<u8>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → servos)
// ───────────────────────────────────────────────────────────────

pub trait ActuatorPort {
    /// Drive a servo channel to `ticks` on the 0–1000 position scale.
    fn set_actuator_position(&mut self, channel: u8, ticks: i32);
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → LED matrix)
// ───────────────────────────────────────────────────────────────

/// Cascaded MAX7219 chain.  Both calls are synchronous and short; the
/// render pipeline never issues more than one per dispatch.
pub trait DisplayPort {
    /// Broadcast a 16-bit register word to every module in the chain.
    fn send_command(&mut self, word: u16);

    /// Shift one 32-column row out to the chain.
    fn transfer_row(&mut self, row: u8, bitmap: u32);
}

// ───────────────────────────────────────────────────────────────
// Strip port (driven adapter: domain → status light strip)
// ───────────────────────────────────────────────────────────────

pub trait StripPort {
    fn set_pixel(&mut self, index: u16, r: u8, g: u8, b: u8);

    /// Latch the pixels written since the last call.
    fn show(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Umbrella
// ───────────────────────────────────────────────────────────────

/// Everything the game service drives in one pass.
pub trait Hardware: SensorPort + ActuatorPort + DisplayPort + StripPort {}

impl<T: SensorPort + ActuatorPort + DisplayPort + StripPort> Hardware for T {}
