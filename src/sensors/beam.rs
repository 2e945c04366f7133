//! Hand-wave beam: a break-beam receiver that idles high.  A hand over the
//! receiver pulls it low; the falling edge starts a round.

#[derive(Debug)]
pub struct WaveDetector {
    last_high: bool,
}

impl WaveDetector {
    pub fn new() -> Self {
        Self { last_high: true }
    }

    /// `true` exactly once per high-to-low transition.
    pub fn check(&mut self, level_high: bool) -> bool {
        let fell = self.last_high && !level_high;
        self.last_high = level_high;
        fell
    }
}

impl Default for WaveDetector {
    fn default() -> Self {
        Self::new()
    }
}
