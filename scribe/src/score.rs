//! # Score Module - Keystroke counters and derived speed
//!
//! Two monotonic counters plus a start instant are all a session needs to score a player.
//! Speed and accuracy are computed on demand; once the session ends the speed is frozen so the
//! result screen shows the same number no matter when it is read.

use std::fmt;

use web_time::Instant;

use crate::AVERAGE_WORD_LENGTH;
use crate::config::SpeedUnit;

/// A typing speed in a particular unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speed {
    pub value: f64,
    pub unit: SpeedUnit,
}

impl Speed {
    pub const fn zero(unit: SpeedUnit) -> Self {
        Self { value: 0.0, unit }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            SpeedUnit::Wpm => write!(f, "{:>5.1}wpm", self.value),
            SpeedUnit::Cps => write!(f, "{:>5.2}cps", self.value),
        }
    }
}

/// Snapshot of a session's score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub speed: Speed,
    /// Percentage in `0.0..=100.0`
    pub accuracy: f64,
    pub errors: u64,
}

impl Score {
    /// Accuracy formatted as a right aligned percentage
    pub fn accuracy_label(&self) -> String {
        format!("{:>3.0}%", self.accuracy)
    }

    /// Error count formatted right aligned
    pub fn errors_label(&self) -> String {
        format!("{:>3}", self.errors)
    }
}

/// Handles keystroke counting and timing
#[derive(Debug, Clone)]
pub struct ScoreTracker {
    total: u64,
    erroneous: u64,
    unit: SpeedUnit,
    started_at: Option<Instant>,
    frozen: Option<Speed>,
}

impl ScoreTracker {
    pub const fn new(unit: SpeedUnit) -> Self {
        Self {
            total: 0,
            erroneous: 0,
            unit,
            started_at: None,
            frozen: None,
        }
    }

    /// Record the start instant. Only the first call has an effect.
    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    pub const fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub const fn count_keystroke(&mut self) {
        self.total += 1;
    }

    pub const fn count_error(&mut self) {
        self.erroneous += 1;
    }

    pub const fn total(&self) -> u64 {
        self.total
    }

    pub const fn errors(&self) -> u64 {
        self.erroneous
    }

    /// Current speed, or the frozen one once [`freeze`](Self::freeze) was called
    pub fn speed(&self) -> Speed {
        if let Some(frozen) = self.frozen {
            return frozen;
        }

        let Some(started_at) = self.started_at else {
            return Speed::zero(self.unit);
        };

        let seconds = started_at.elapsed().as_secs_f64();
        if seconds <= 0.0 {
            return Speed::zero(self.unit);
        }

        let cps = (self.total - self.erroneous) as f64 / seconds;
        let value = match self.unit {
            SpeedUnit::Wpm => cps / AVERAGE_WORD_LENGTH * 60.0,
            SpeedUnit::Cps => cps,
        };

        Speed {
            value,
            unit: self.unit,
        }
    }

    /// Accuracy in percent, exactly 0 before any keystroke
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.total - self.erroneous) as f64 / self.total as f64 * 100.0
    }

    /// Freeze the speed. Later calls return the first frozen value.
    pub fn freeze(&mut self) -> Speed {
        let speed = self.speed();
        *self.frozen.get_or_insert(speed)
    }

    pub const fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    pub fn score(&self) -> Score {
        Score {
            speed: self.speed(),
            accuracy: self.accuracy(),
            errors: self.erroneous,
        }
    }
}
