//! Mock hardware adapter for integration tests.
//!
//! Records every output call so tests can assert on the full command
//! history without touching real SPI/PWM peripherals.  Inputs (beam,
//! analog scan, keys) are plain fields the test script sets.

use std::collections::VecDeque;

use laserlift::app::events::AppEvent;
use laserlift::app::ports::{ActuatorPort, DisplayPort, EventSink, SensorPort, StripPort};
use laserlift::app::service::GameService;
use laserlift::config::GameConfig;
use laserlift::events::AxisId;
use laserlift::fsm::GameMode;
use laserlift::pins::{self, ADC_SLOTS};

pub const AMBIENT: u16 = 200;
pub const LASER: u16 = 900;

// ── Output call record ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    Servo { channel: u8, ticks: i32 },
    Command(u16),
    Row { row: u8, bitmap: u32 },
    StripShow,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<HwCall>,
    pub beam: bool,
    pub scan: [u16; ADC_SLOTS],
    pub keys: VecDeque<u8>,
    pub pixels_written: usize,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        let mut scan = [AMBIENT; ADC_SLOTS];
        scan[pins::SLIDER_ADC_SLOT] = 512;
        Self {
            calls: Vec::new(),
            beam: true,
            scan,
            keys: VecDeque::new(),
            pixels_written: 0,
        }
    }

    pub fn shine(&mut self, axis: AxisId, on: bool) {
        self.scan[pins::target_slot(axis)] = if on { LASER } else { AMBIENT };
    }

    pub fn set_slider(&mut self, raw: u16) {
        self.scan[pins::SLIDER_ADC_SLOT] = raw;
    }

    /// Last position written to a servo channel.
    pub fn servo(&self, channel: u8) -> Option<i32> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::Servo { channel: ch, ticks } if *ch == channel => Some(*ticks),
            _ => None,
        })
    }

    pub fn commands(&self) -> Vec<u16> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Command(w) => Some(*w),
                _ => None,
            })
            .collect()
    }

    pub fn rows_sent(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HwCall::Row { .. }))
            .count()
    }

    pub fn strip_shows(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HwCall::StripShow))
            .count()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_beam(&mut self) -> bool {
        self.beam
    }

    fn read_analog_multi(&mut self) -> [u16; ADC_SLOTS] {
        self.scan
    }

    fn poll_key(&mut self) -> Option<u8> {
        self.keys.pop_front()
    }
}

impl ActuatorPort for MockHardware {
    fn set_actuator_position(&mut self, channel: u8, ticks: i32) {
        self.calls.push(HwCall::Servo { channel, ticks });
    }
}

impl DisplayPort for MockHardware {
    fn send_command(&mut self, word: u16) {
        self.calls.push(HwCall::Command(word));
    }

    fn transfer_row(&mut self, row: u8, bitmap: u32) {
        self.calls.push(HwCall::Row { row, bitmap });
    }
}

impl StripPort for MockHardware {
    fn set_pixel(&mut self, _index: u16, _r: u8, _g: u8, _b: u8) {
        self.pixels_written += 1;
    }

    fn show(&mut self) {
        self.calls.push(HwCall::StripShow);
    }
}

// ── LogSink ──────────────────────────────────────────────────

pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn log(&self) -> Vec<String> {
        self.events.iter().map(|e| format!("{:?}", e)).collect()
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Cabinet: service + mocks, driven by simulated time ───────

/// Simulated wall time per dispatch pass.
pub const PASS_MS: u32 = 5;

pub struct Cabinet {
    pub svc: GameService,
    pub hw: MockHardware,
    pub sink: LogSink,
    pub now_ms: u32,
}

#[allow(dead_code)]
impl Cabinet {
    /// Start the service and run until boot has settled (display up,
    /// queues drained).
    pub fn boot(config: GameConfig) -> Self {
        let mut cab = Self {
            svc: GameService::new(config).expect("valid config"),
            hw: MockHardware::new(),
            sink: LogSink::new(),
            now_ms: 0,
        };
        cab.svc.start(&mut cab.sink).expect("start");
        for _ in 0..200 {
            cab.pass();
            if cab.svc.display().is_ready() && cab.svc.is_idle() {
                break;
            }
        }
        cab
    }

    pub fn pass(&mut self) {
        self.svc.run_pass(&mut self.hw, PASS_MS, &mut self.sink);
        self.now_ms += PASS_MS;
    }

    pub fn run_ms(&mut self, ms: u32) {
        for _ in 0..ms.div_ceil(PASS_MS) {
            self.pass();
        }
    }

    /// Run until `done` holds or `limit_ms` of simulated time has passed.
    /// Returns `true` if the condition was met.
    pub fn run_until(&mut self, limit_ms: u32, done: impl Fn(&Self) -> bool) -> bool {
        let end = self.now_ms + limit_ms;
        while self.now_ms < end {
            if done(self) {
                return true;
            }
            self.pass();
        }
        done(self)
    }

    pub fn mode(&self) -> GameMode {
        self.svc.query_mode()
    }

    /// Break and restore the hand-wave beam.
    pub fn wave(&mut self) {
        self.hw.beam = false;
        self.run_ms(20);
        self.hw.beam = true;
        self.run_ms(20);
    }

    pub fn press(&mut self, key: u8) {
        self.hw.keys.push_back(key);
        self.run_ms(20);
    }
}
