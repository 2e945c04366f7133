//! Difficulty status strip.
//!
//! The slider percentage is bucketed in 15 % steps (`min(pct / 15, 6)`);
//! each bucket has one colour, from dim green (easy) to red.  Refreshing the
//! strip is slow, so the whole strip is only repainted when the bucket
//! changes.

use log::debug;

use crate::app::ports::StripPort;

pub const BUCKETS: usize = 7;

/// Bucket colours before brightness scaling (r, g, b).
pub const BUCKET_COLORS: [(u8, u8, u8); BUCKETS] = [
    (0x00, 0x40, 0x00), // 0-14 %: dim green
    (0x10, 0x60, 0x00),
    (0x30, 0x60, 0x00), // yellow-green
    (0x50, 0x50, 0x00), // yellow
    (0x70, 0x30, 0x00), // orange
    (0x90, 0x10, 0x00),
    (0xA0, 0x00, 0x00), // 90-100 %: red
];

pub fn bucket_for(pct: u8) -> u8 {
    (pct / 15).min(BUCKETS as u8 - 1)
}

/// `channel * brightness / 255`.
pub fn scale(channel: u8, brightness: u8) -> u8 {
    (u16::from(channel) * u16::from(brightness) / 255) as u8
}

pub struct StatusLightController {
    last_bucket: Option<u8>,
    strip_len: u16,
    brightness: u8,
}

impl StatusLightController {
    pub fn new(strip_len: u16, brightness: u8) -> Self {
        Self {
            last_bucket: None,
            strip_len,
            brightness,
        }
    }

    /// Repaint if `pct` falls in a new bucket.  Returns `true` if the strip
    /// was refreshed.
    pub fn update(&mut self, pct: u8, strip: &mut impl StripPort) -> bool {
        let bucket = bucket_for(pct);
        if self.last_bucket == Some(bucket) {
            return false;
        }
        self.last_bucket = Some(bucket);

        let (r, g, b) = self.color(bucket);
        for i in 0..self.strip_len {
            strip.set_pixel(i, r, g, b);
        }
        strip.show();
        debug!("status strip: bucket {} ({},{},{})", bucket, r, g, b);
        true
    }

    /// Brightness-scaled colour of a bucket.
    pub fn color(&self, bucket: u8) -> (u8, u8, u8) {
        let (r, g, b) = BUCKET_COLORS[(bucket as usize).min(BUCKETS - 1)];
        (
            scale(r, self.brightness),
            scale(g, self.brightness),
            scale(b, self.brightness),
        )
    }

    /// New length or brightness takes effect on the next update.
    pub fn retune(&mut self, strip_len: u16, brightness: u8) {
        if strip_len != self.strip_len || brightness != self.brightness {
            self.last_bucket = None;
        }
        self.strip_len = strip_len;
        self.brightness = brightness;
    }

    pub fn last_bucket(&self) -> Option<u8> {
        self.last_bucket
    }
}
