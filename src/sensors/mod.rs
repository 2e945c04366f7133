//! Event checker bank: turns raw sensor state into discrete events.
//!
//! Polled once per dispatch pass.  Every checker only reports transitions,
//! so a steady input produces no events at all.  Everything found is posted
//! to the game service.  The hit checkers stay quiet until baselines have
//! been captured.
//!
//! | Checker            | Input                 | Event                        |
//! |--------------------|-----------------------|------------------------------|
//! | [`WaveDetector`]   | beam receiver (GPIO)  | `WaveDetected`               |
//! | [`HitDetector`] x3 | target photo-sensors  | `Hit(n)` / `NoHit(n)`        |
//! | [`DifficultyDetector`] | slider pot        | `DifficultyChanged(pct)`     |
//! | keystroke          | test harness          | `NewInput(key)`              |

pub mod beam;
pub mod hit;
pub mod slider;

use log::info;

use crate::app::ports::SensorPort;
use crate::config::GameConfig;
use crate::events::{AxisId, Event, EventKind};
use crate::framework::{Effects, ServiceId};
use crate::pins;
use beam::WaveDetector;
use hit::{HitDetector, HitState};
use slider::DifficultyDetector;

pub struct EventCheckers {
    wave: WaveDetector,
    hits: [HitDetector; AxisId::COUNT],
    difficulty: DifficultyDetector,
    baseline_samples: u8,
    calibrated: bool,
}

impl EventCheckers {
    /// Baselines start at zero until [`capture_baselines`](Self::capture_baselines) runs.
    pub fn new(config: &GameConfig) -> Self {
        let hit = HitDetector::new(0, config.hit_delta, config.release_delta);
        Self {
            wave: WaveDetector::new(),
            hits: [hit; AxisId::COUNT],
            difficulty: DifficultyDetector::new(
                config.difficulty_dead_band,
                config.adc_full_scale,
            ),
            baseline_samples: config.baseline_samples,
            calibrated: false,
        }
    }

    /// Average `baseline_samples` scans into per-target resting levels.
    /// Also used for an explicit recalibration.
    pub fn capture_baselines(&mut self, sensors: &mut impl SensorPort) -> [u16; AxisId::COUNT] {
        let samples = u32::from(self.baseline_samples.max(1));
        let mut sums = [0u32; AxisId::COUNT];
        for _ in 0..samples {
            let scan = sensors.read_analog_multi();
            for axis in AxisId::ALL {
                sums[axis.index()] += u32::from(scan[pins::target_slot(axis)]);
            }
        }
        let mut baselines = [0u16; AxisId::COUNT];
        for axis in AxisId::ALL {
            let avg = (sums[axis.index()] / samples) as u16;
            self.hits[axis.index()].set_baseline(avg);
            baselines[axis.index()] = avg;
        }
        self.calibrated = true;
        info!("baselines captured: {:?}", baselines);
        baselines
    }

    /// Run every checker once.  Returns the number of events raised.
    pub fn poll(&mut self, sensors: &mut impl SensorPort, fx: &mut Effects) -> usize {
        let mut raised = 0;
        let mut raise = |fx: &mut Effects, ev: Event| {
            fx.post(ServiceId::Game, ev);
            raised += 1;
        };

        if self.wave.check(sensors.read_beam()) {
            raise(fx, Event::bare(EventKind::WaveDetected));
        }

        let scan = sensors.read_analog_multi();
        if self.calibrated {
            for axis in AxisId::ALL {
                match self.hits[axis.index()].check(scan[pins::target_slot(axis)]) {
                    Some(HitState::Hit) => raise(fx, Event::bare(EventKind::Hit(axis))),
                    Some(HitState::Clear) => raise(fx, Event::bare(EventKind::NoHit(axis))),
                    None => {}
                }
            }
        }

        if let Some(pct) = self.difficulty.check(scan[pins::SLIDER_ADC_SLOT]) {
            raise(fx, Event::new(EventKind::DifficultyChanged, u16::from(pct)));
        }

        if let Some(key) = sensors.poll_key() {
            raise(fx, Event::new(EventKind::NewInput, u16::from(key)));
        }

        raised
    }

    pub fn reconfigure(&mut self, config: &GameConfig) {
        for hit in &mut self.hits {
            hit.set_thresholds(config.hit_delta, config.release_delta);
        }
        self.difficulty
            .retune(config.difficulty_dead_band, config.adc_full_scale);
        self.baseline_samples = config.baseline_samples;
    }

    pub fn baselines(&self) -> [u16; AxisId::COUNT] {
        [
            self.hits[0].baseline(),
            self.hits[1].baseline(),
            self.hits[2].baseline(),
        ]
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    pub fn hit_state(&self, axis: AxisId) -> HitState {
        self.hits[axis.index()].state()
    }
}
