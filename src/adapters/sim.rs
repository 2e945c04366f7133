//! Host simulation of the cabinet.
//!
//! Implements every hardware port in memory so the full controller can run
//! on a desktop.  The matrix is mirrored into a shadow buffer and can be
//! drawn as ASCII; the player is scripted through [`SimHardware::wave`],
//! [`SimHardware::shine`] and friends.

use std::collections::VecDeque;
use std::fmt::Write as _;

use crate::app::ports::{ActuatorPort, DisplayPort, SensorPort, StripPort};
use crate::display::frame::{COLS, ROWS};
use crate::display::steps::command;
use crate::events::AxisId;
use crate::pins::{self, ADC_SLOTS, SERVO_CHANNELS};

/// Photo-sensor reading with no laser on it.
pub const AMBIENT_LEVEL: u16 = 180;
/// Photo-sensor reading while the laser is on target.
pub const LASER_LEVEL: u16 = 900;

pub struct SimHardware {
    beam_high: bool,
    scan: [u16; ADC_SLOTS],
    keys: VecDeque<u8>,
    servos: [Option<i32>; SERVO_CHANNELS],
    rows: [u32; ROWS],
    powered: bool,
    commands: Vec<u16>,
    pixels: Vec<(u8, u8, u8)>,
    strip_shows: u32,
}

impl SimHardware {
    pub fn new(strip_len: u16) -> Self {
        let mut scan = [AMBIENT_LEVEL; ADC_SLOTS];
        scan[pins::SLIDER_ADC_SLOT] = 512;
        Self {
            beam_high: true,
            scan,
            keys: VecDeque::new(),
            servos: [None; SERVO_CHANNELS],
            rows: [0; ROWS],
            powered: false,
            commands: Vec::new(),
            pixels: vec![(0, 0, 0); usize::from(strip_len)],
            strip_shows: 0,
        }
    }

    // ── Scripted player ───────────────────────────────────────

    /// Block (`true`) or clear the hand-wave beam.
    pub fn set_hand(&mut self, over_beam: bool) {
        self.beam_high = !over_beam;
    }

    /// Wave: block the beam.  Clear it again with `set_hand(false)`.
    pub fn wave(&mut self) {
        self.set_hand(true);
    }

    /// Put the laser on (`true`) or off a target.
    pub fn shine(&mut self, axis: AxisId, on: bool) {
        self.scan[pins::target_slot(axis)] = if on { LASER_LEVEL } else { AMBIENT_LEVEL };
    }

    pub fn set_slider(&mut self, raw: u16) {
        self.scan[pins::SLIDER_ADC_SLOT] = raw;
    }

    pub fn press(&mut self, key: u8) {
        self.keys.push_back(key);
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn servo(&self, channel: u8) -> Option<i32> {
        self.servos.get(usize::from(channel)).copied().flatten()
    }

    /// Display is out of shutdown.
    pub fn is_powered(&self) -> bool {
        self.powered
    }

    pub fn commands(&self) -> &[u16] {
        &self.commands
    }

    pub fn pixel(&self, index: usize) -> Option<(u8, u8, u8)> {
        self.pixels.get(index).copied()
    }

    pub fn strip_shows(&self) -> u32 {
        self.strip_shows
    }

    /// The panel as `#`/`.` art, one line per row.
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(ROWS * (COLS + 1));
        for row in self.rows {
            for col in (0..COLS).rev() {
                out.push(if row & (1 << col) != 0 { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }

    /// Target heights as a one-line gauge, e.g. `T1 1000 | T2  640 | T3   20`.
    pub fn gauge(&self) -> String {
        let mut out = String::new();
        for axis in AxisId::ALL {
            let pos = self.servo(pins::axis_channel(axis)).unwrap_or(0);
            if !out.is_empty() {
                out.push_str(" | ");
            }
            let _ = write!(out, "T{} {:>4}", axis.index() + 1, pos);
        }
        out
    }
}

impl SensorPort for SimHardware {
    fn read_beam(&mut self) -> bool {
        self.beam_high
    }

    fn read_analog_multi(&mut self) -> [u16; ADC_SLOTS] {
        self.scan
    }

    fn poll_key(&mut self) -> Option<u8> {
        self.keys.pop_front()
    }
}

impl ActuatorPort for SimHardware {
    fn set_actuator_position(&mut self, channel: u8, ticks: i32) {
        if let Some(slot) = self.servos.get_mut(usize::from(channel)) {
            *slot = Some(ticks);
        }
    }
}

impl DisplayPort for SimHardware {
    fn send_command(&mut self, word: u16) {
        match word {
            command::SHUTDOWN => self.powered = false,
            command::NORMAL_OPERATION => self.powered = true,
            _ => {}
        }
        self.commands.push(word);
    }

    fn transfer_row(&mut self, row: u8, bitmap: u32) {
        if let Some(r) = self.rows.get_mut(usize::from(row)) {
            *r = bitmap;
        }
    }
}

impl StripPort for SimHardware {
    fn set_pixel(&mut self, index: u16, r: u8, g: u8, b: u8) {
        if let Some(px) = self.pixels.get_mut(usize::from(index)) {
            *px = (r, g, b);
        }
    }

    fn show(&mut self) {
        self.strip_shows += 1;
    }
}
