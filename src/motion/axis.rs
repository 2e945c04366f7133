//! A single rate-limited target axis.
//!
//! Positions are servo ticks.  After every mutation
//! `floor <= position <= ceiling` holds and `max_step >= 0`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axis {
    position: i32,
    target: i32,
    max_step: i32,
    floor: i32,
    ceiling: i32,
}

impl Axis {
    /// New axis parked at its ceiling.
    pub fn new(floor: i32, ceiling: i32, max_step: i32) -> Self {
        let (floor, ceiling) = (floor.min(ceiling), floor.max(ceiling));
        Self {
            position: ceiling,
            target: ceiling,
            max_step: max_step.max(0),
            floor,
            ceiling,
        }
    }

    /// Move one slew step toward the target.  Returns the new position.
    pub fn step(&mut self) -> i32 {
        let delta = self
            .target
            .saturating_sub(self.position)
            .clamp(-self.max_step, self.max_step);
        self.position = self
            .position
            .saturating_add(delta)
            .clamp(self.floor, self.ceiling);
        self.position
    }

    pub fn command_rise(&mut self) {
        self.target = self.ceiling;
    }

    pub fn command_fall(&mut self) {
        self.target = self.floor;
    }

    /// Set the target, clamped to travel.
    pub fn set_target(&mut self, target: i32) {
        self.target = target.clamp(self.floor, self.ceiling);
    }

    /// Place the axis at `position` immediately, without slewing.
    pub fn jog_to(&mut self, position: i32) {
        let p = position.clamp(self.floor, self.ceiling);
        self.position = p;
        self.target = p;
    }

    pub fn park_at_ceiling(&mut self) {
        self.jog_to(self.ceiling);
    }

    pub fn set_max_step(&mut self, max_step: i32) {
        self.max_step = max_step.max(0);
    }

    /// Change travel limits, pulling position and target inside them.
    pub fn set_limits(&mut self, floor: i32, ceiling: i32) {
        self.floor = floor.min(ceiling);
        self.ceiling = floor.max(ceiling);
        self.position = self.position.clamp(self.floor, self.ceiling);
        self.target = self.target.clamp(self.floor, self.ceiling);
    }

    pub fn is_at_floor(&self) -> bool {
        self.position == self.floor
    }

    /// At or above `floor + travel / divisor`.
    pub fn is_elevated(&self, danger_divisor: i32) -> bool {
        let (floor, ceiling) = (i64::from(self.floor), i64::from(self.ceiling));
        let line = floor + (ceiling - floor) / i64::from(danger_divisor.max(1));
        i64::from(self.position) >= line
    }

    /// Upper bound on steps needed to reach the current target.
    pub fn ticks_to_target(&self) -> u32 {
        let gap = self.target.abs_diff(self.position);
        if gap == 0 {
            0
        } else if self.max_step == 0 {
            u32::MAX
        } else {
            gap.div_ceil(self.max_step as u32)
        }
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn target(&self) -> i32 {
        self.target
    }

    pub fn max_step(&self) -> i32 {
        self.max_step
    }

    pub fn floor(&self) -> i32 {
        self.floor
    }

    pub fn ceiling(&self) -> i32 {
        self.ceiling
    }
}
