use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::RouletteError;

/// Presentation parameters of the reel animation.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct SpinSettings {
    pub cell_width: f64,
    pub track_width: f64,
    /// Full reel lengths scrolled past before the landing cell.
    pub pre_roll_laps: u32,
    pub duration: Duration,
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self {
            cell_width: DEFAULT_CELL_WIDTH,
            track_width: DEFAULT_TRACK_WIDTH,
            pre_roll_laps: DEFAULT_PRE_ROLL_LAPS,
            duration: DEFAULT_SPIN_DURATION,
        }
    }
}

impl SpinSettings {
    pub fn validate(&self) -> Result<(), RouletteError> {
        if !(self.cell_width.is_finite() && self.cell_width > 0.0) {
            return Err(RouletteError::InvalidSettings(format!(
                "cell width must be positive, got {}",
                self.cell_width
            )));
        }
        if !(self.track_width.is_finite() && self.track_width > 0.0) {
            return Err(RouletteError::InvalidSettings(format!(
                "track width must be positive, got {}",
                self.track_width
            )));
        }
        if self.pre_roll_laps == 0 {
            return Err(RouletteError::InvalidSettings(
                "at least one pre-roll lap is required".to_string(),
            ));
        }
        if self.duration.is_zero() {
            return Err(RouletteError::InvalidSettings(
                "spin duration must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where the reel has to stop and how long it takes to get there.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    pub landing_index: usize,
    pub reel_len: usize,
    pub cell_width: f64,
    pub track_width: f64,
    pub target_offset: f64,
    pub duration: Duration,
}

impl SpinPlan {
    /// Offset is `laps*N*w + i*w - W/2 + w/2`: the pre-roll laps, then the
    /// landing cell centred under the pointer. Duration does not depend on
    /// distance.
    pub fn compute(
        landing_index: usize,
        reel_len: usize,
        settings: &SpinSettings,
    ) -> Result<Self, RouletteError> {
        settings.validate()?;
        if landing_index >= reel_len {
            return Err(RouletteError::NoLandingCellFound);
        }
        let w = settings.cell_width;
        let pre_roll = f64::from(settings.pre_roll_laps) * reel_len as f64 * w;
        let target_offset =
            pre_roll + landing_index as f64 * w - settings.track_width / 2.0 + w / 2.0;

        Ok(Self {
            landing_index,
            reel_len,
            cell_width: w,
            track_width: settings.track_width,
            target_offset,
            duration: settings.duration,
        })
    }

    /// Eased offset of the reel `elapsed` into the spin.
    pub fn offset_at(&self, elapsed: Duration) -> f64 {
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };
        self.target_offset * ease_out_quart(progress)
    }

    /// Reel index under the centre pointer when scrolled to `offset`.
    pub fn cell_under_pointer(&self, offset: f64) -> usize {
        let position = ((offset + self.track_width / 2.0) / self.cell_width).floor() as i64;
        position.rem_euclid(self.reel_len as i64) as usize
    }
}

/// Fast start, long deceleration.
pub fn ease_out_quart(t: f64) -> f64 {
    1.0 - (1.0 - t.clamp(0.0, 1.0)).powi(4)
}

/// Deferred reveal of a spin outcome, driven by explicit time steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealTimer {
    duration: Duration,
    elapsed: Duration,
}

impl RevealTimer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Moves the timer forward; returns true once the deadline is reached.
    pub fn advance(&mut self, step: Duration) -> bool {
        self.elapsed = (self.elapsed + step).min(self.duration);
        self.is_elapsed()
    }

    pub fn is_elapsed(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }
}
