//! Fixed-rate tick clock
//!
//! The AI core runs exactly one `tick()` per simulation step. The clock turns
//! raw frame deltas into a whole number of steps to run this frame.

use serde::{Deserialize, Serialize};

/// Errors that can occur when configuring the clock
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClockError {
    #[error("Tick rate must be positive, got {0}")]
    InvalidTickRate(u32),

    #[error("Max delta time must be positive, got {0}")]
    InvalidMaxDelta(f32),
}

/// Configuration for the tick clock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickConfig {
    /// Simulation steps per second
    pub tick_rate: u32,
    /// Maximum delta time to prevent spiral of death
    pub max_delta_time: f32,
    /// How many simulated seconds pass per real second
    pub time_scale: f32,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 20,
            max_delta_time: 0.25,
            time_scale: 1.0,
        }
    }
}

impl TickConfig {
    /// Duration of one tick in seconds
    pub fn tick_duration(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }
}

/// Simulation tick tracking
#[derive(Debug, Clone)]
pub struct TickClock {
    /// Configuration
    pub config: TickConfig,
    /// Ticks issued since start
    pub tick_count: u64,
    /// Whether the simulation is paused
    pub paused: bool,
    /// Accumulated time not yet converted into ticks
    accumulator: f32,
}

impl TickClock {
    /// Create a clock, rejecting a zero tick rate
    pub fn new(config: TickConfig) -> Result<Self, ClockError> {
        if config.tick_rate == 0 {
            return Err(ClockError::InvalidTickRate(config.tick_rate));
        }
        if config.max_delta_time <= 0.0 {
            return Err(ClockError::InvalidMaxDelta(config.max_delta_time));
        }
        Ok(Self {
            config,
            tick_count: 0,
            paused: false,
            accumulator: 0.0,
        })
    }

    /// Feed a raw frame delta; returns how many ticks to run now
    pub fn advance(&mut self, raw_delta: f32) -> u32 {
        if self.paused {
            return 0;
        }

        let delta = raw_delta.clamp(0.0, self.config.max_delta_time) * self.config.time_scale;
        self.accumulator += delta;

        let step = self.config.tick_duration();
        let mut steps = 0;
        while self.accumulator >= step {
            self.accumulator -= step;
            steps += 1;
        }
        self.tick_count += steps as u64;
        steps
    }

    /// Issue exactly one tick regardless of elapsed time (headless stepping)
    pub fn step(&mut self) -> u64 {
        self.tick_count += 1;
        self.tick_count
    }

    /// Fraction of the next tick already accumulated
    pub fn interpolation(&self) -> f32 {
        self.accumulator / self.config.tick_duration()
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Set the time scale (0.0 = frozen, 1.0 = normal, 2.0 = double speed)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.config.time_scale = scale.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_tick_rate_rejected() {
        let config = TickConfig {
            tick_rate: 0,
            ..Default::default()
        };
        assert!(matches!(TickClock::new(config), Err(ClockError::InvalidTickRate(0))));
    }

    #[test]
    fn test_advance_accumulates_whole_ticks() {
        let mut clock = TickClock::new(TickConfig::default()).unwrap();
        // 20 TPS: 0.05s per tick
        assert_eq!(clock.advance(0.03), 0);
        assert_eq!(clock.advance(0.03), 1);
        assert_eq!(clock.advance(0.1), 2);
        assert_eq!(clock.tick_count, 3);
    }

    #[test]
    fn test_advance_clamps_huge_delta() {
        let config = TickConfig {
            max_delta_time: 0.26,
            ..Default::default()
        };
        let mut clock = TickClock::new(config).unwrap();
        // Clamped to 0.26s = 5 whole ticks
        assert_eq!(clock.advance(10.0), 5);
    }

    #[test]
    fn test_paused_clock_issues_nothing() {
        let mut clock = TickClock::new(TickConfig::default()).unwrap();
        clock.pause();
        assert_eq!(clock.advance(1.0), 0);
        clock.resume();
        assert!(clock.advance(0.1) >= 1);
    }
}
