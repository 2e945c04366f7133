//! MAX7219 LED matrix chain (four cascaded 8x8 modules, 8x32 panel).
//!
//! Every transfer shifts one 16-bit word per module through the chain
//! while chip-select is held, so a command is broadcast by repeating it
//! [`MODULES`] times.  A row is sent as four digit-register writes, one
//! column byte per module.
//!
//! The modules are mounted rotated: panel row `r` is digit register
//! `8 - r` and each column byte is bit-reversed.
//!
//! SPI errors are logged and counted, never propagated.

use embedded_hal::spi::SpiDevice;
use log::warn;

use crate::app::ports::DisplayPort;
use crate::display::frame::ROWS;

/// Modules in the chain.
pub const MODULES: usize = 4;

pub struct Max7219<S> {
    spi: S,
    errors: u32,
}

impl<S: SpiDevice> Max7219<S> {
    pub fn new(spi: S) -> Self {
        Self { spi, errors: 0 }
    }

    /// Same register word to every module.
    pub fn broadcast(&mut self, word: u16) {
        let [hi, lo] = word.to_be_bytes();
        let mut frame = [0u8; MODULES * 2];
        for pair in frame.chunks_exact_mut(2) {
            pair[0] = hi;
            pair[1] = lo;
        }
        self.write(&frame);
    }

    /// One panel row.  The most significant byte of `bitmap` is the
    /// left-most module, which sits at the far end of the chain.
    pub fn write_row(&mut self, row: u8, bitmap: u32) {
        let digit = digit_register(row);
        let mut frame = [0u8; MODULES * 2];
        for (pair, column) in frame.chunks_exact_mut(2).zip(bitmap.to_be_bytes()) {
            pair[0] = digit;
            pair[1] = column.reverse_bits();
        }
        self.write(&frame);
    }

    pub fn errors(&self) -> u32 {
        self.errors
    }

    /// Hand the bus back (used by tests and when re-purposing the SPI).
    pub fn release(self) -> S {
        self.spi
    }

    fn write(&mut self, frame: &[u8]) {
        if let Err(e) = self.spi.write(frame) {
            self.errors = self.errors.saturating_add(1);
            warn!("max7219: SPI write failed: {:?}", e);
        }
    }
}

/// Digit register (1..=8) for a panel row.
pub fn digit_register(row: u8) -> u8 {
    (ROWS as u8).saturating_sub(row.min(ROWS as u8 - 1))
}

impl<S: SpiDevice> DisplayPort for Max7219<S> {
    fn send_command(&mut self, word: u16) {
        self.broadcast(word);
    }

    fn transfer_row(&mut self, row: u8, bitmap: u32) {
        self.write_row(row, bitmap);
    }
}
