//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the beam input, the analog scanner, the LED matrix, the servo
//! channels and the status strip, exposing them through [`SensorPort`],
//! [`ActuatorPort`], [`DisplayPort`] and [`StripPort`].  This is the only
//! module in the system that touches actual hardware; everything it holds is
//! an `embedded-hal` trait object or a port, so a board crate supplies the
//! concrete peripherals.

use embedded_hal::digital::InputPin;
use embedded_hal::pwm::SetDutyCycle;
use embedded_hal::spi::SpiDevice;
use heapless::Deque;
use log::warn;

use crate::app::ports::{ActuatorPort, DisplayPort, SensorPort, StripPort};
use crate::drivers::max7219::Max7219;
use crate::drivers::servo::ServoChannel;
use crate::pins::{ADC_SLOTS, SERVO_CHANNELS};

/// Keystrokes buffered for the test harness.
const KEY_BUFFER: usize = 16;

/// One scan of the converter in slot order (see [`crate::pins`]).
///
/// `embedded-hal` 1.0 has no ADC trait, so the board crate implements this
/// over its own ADC driver.
pub trait AnalogScan {
    fn scan(&mut self) -> [u16; ADC_SLOTS];
}

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<B, A, SPI, P, S> {
    beam: B,
    beam_level: bool,
    adc: A,
    matrix: Max7219<SPI>,
    servos: [ServoChannel<P>; SERVO_CHANNELS],
    strip: S,
    keys: Deque<u8, KEY_BUFFER>,
}

impl<B, A, SPI, P, S> HardwareAdapter<B, A, SPI, P, S>
where
    B: InputPin,
    A: AnalogScan,
    SPI: SpiDevice,
    P: SetDutyCycle,
    S: StripPort,
{
    pub fn new(
        beam: B,
        adc: A,
        matrix: Max7219<SPI>,
        servos: [ServoChannel<P>; SERVO_CHANNELS],
        strip: S,
    ) -> Self {
        Self {
            beam,
            beam_level: true,
            adc,
            matrix,
            servos,
            strip,
            keys: Deque::new(),
        }
    }

    /// Queue a keystroke from the bench console.  Returns `false` if the
    /// buffer is full.
    pub fn push_key(&mut self, key: u8) -> bool {
        self.keys.push_back(key).is_ok()
    }

    pub fn servo(&self, channel: u8) -> Option<&ServoChannel<P>> {
        self.servos.get(usize::from(channel))
    }

    pub fn matrix(&self) -> &Max7219<SPI> {
        &self.matrix
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<B, A, SPI, P, S> SensorPort for HardwareAdapter<B, A, SPI, P, S>
where
    B: InputPin,
    A: AnalogScan,
{
    fn read_beam(&mut self) -> bool {
        match self.beam.is_high() {
            Ok(level) => self.beam_level = level,
            // Hold the last level so a read glitch cannot fake a wave.
            Err(e) => warn!("beam read failed: {:?}", e),
        }
        self.beam_level
    }

    fn read_analog_multi(&mut self) -> [u16; ADC_SLOTS] {
        self.adc.scan()
    }

    fn poll_key(&mut self) -> Option<u8> {
        self.keys.pop_front()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<B, A, SPI, P, S> ActuatorPort for HardwareAdapter<B, A, SPI, P, S>
where
    P: SetDutyCycle,
{
    fn set_actuator_position(&mut self, channel: u8, ticks: i32) {
        match self.servos.get_mut(usize::from(channel)) {
            Some(servo) => servo.set_position(ticks),
            None => warn!("no servo on channel {}", channel),
        }
    }
}

// ── DisplayPort / StripPort implementation ────────────────────

impl<B, A, SPI, P, S> DisplayPort for HardwareAdapter<B, A, SPI, P, S>
where
    SPI: SpiDevice,
{
    fn send_command(&mut self, word: u16) {
        self.matrix.send_command(word);
    }

    fn transfer_row(&mut self, row: u8, bitmap: u32) {
        self.matrix.transfer_row(row, bitmap);
    }
}

impl<B, A, SPI, P, S> StripPort for HardwareAdapter<B, A, SPI, P, S>
where
    S: StripPort,
{
    fn set_pixel(&mut self, index: u16, r: u8, g: u8, b: u8) {
        self.strip.set_pixel(index, r, g, b);
    }

    fn show(&mut self) {
        self.strip.show();
    }
}
