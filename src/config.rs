//! Game tuning constants.
//!
//! Everything is fixed at build time; `GameConfig::default()` is the only
//! configuration the binary uses. Tests build variants to probe edge cases.

use std::time::Duration;
use thiserror::Error;

pub const CANVAS_WIDTH: f64 = 800.0;
pub const CANVAS_HEIGHT: f64 = 600.0;

pub const GRAVITY: f64 = 0.5;
pub const SPEED: f64 = 5.0;
pub const BIRD_SIZE: [f64; 2] = [51.0, 36.0];
pub const JUMP_FORCE: f64 = -11.5;
pub const PIPE_WIDTH: f64 = 78.0;
pub const PIPE_GAP: f64 = 270.0;

/// Steps between scroll speed increments.
pub const DIFFICULTY_INCREASE_INTERVAL: u64 = 1000;
pub const SPEED_INCREMENT: f64 = 0.1;

pub const POWERUP_SPAWN_CHANCE: f64 = 0.1;
pub const POWERUP_SIZE: f64 = 30.0;
pub const SHIELD_DURATION: Duration = Duration::from_millis(5000);
pub const SLOW_TIME_DURATION: Duration = Duration::from_millis(3000);
pub const SLOW_TIME_FACTOR: f64 = 0.5;

/// One simulation step (~60 steps per second).
pub const TICK: Duration = Duration::from_millis(16);

/// Longest frame delta fed to the accumulator, so a stall doesn't
/// fast-forward the bird into a pipe.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("canvas must have a finite positive size, got {width}x{height}")]
    EmptyCanvas { width: f64, height: f64 },
    #[error(
        "canvas height {height} leaves no room for a {gap} gap between two {margin} margins"
    )]
    CanvasTooShort { height: f64, gap: f64, margin: f64 },
    #[error("power-up spawn chance {0} is outside 0..=1")]
    SpawnChance(f64),
    #[error("simulation tick must be non-zero")]
    ZeroTick,
    #[error("difficulty interval must be at least one step")]
    ZeroDifficultyInterval,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub gravity: f64,
    pub speed: f64,
    pub bird_width: f64,
    pub bird_height: f64,
    pub jump_force: f64,
    pub pipe_width: f64,
    pub pipe_gap: f64,
    pub difficulty_interval: u64,
    pub speed_increment: f64,
    pub powerup_spawn_chance: f64,
    pub powerup_size: f64,
    pub shield_duration: Duration,
    pub slow_time_duration: Duration,
    pub slow_time_factor: f64,
    pub tick: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            gravity: GRAVITY,
            speed: SPEED,
            bird_width: BIRD_SIZE[0],
            bird_height: BIRD_SIZE[1],
            jump_force: JUMP_FORCE,
            pipe_width: PIPE_WIDTH,
            pipe_gap: PIPE_GAP,
            difficulty_interval: DIFFICULTY_INCREASE_INTERVAL,
            speed_increment: SPEED_INCREMENT,
            powerup_spawn_chance: POWERUP_SPAWN_CHANCE,
            powerup_size: POWERUP_SIZE,
            shield_duration: SHIELD_DURATION,
            slow_time_duration: SLOW_TIME_DURATION,
            slow_time_factor: SLOW_TIME_FACTOR,
            tick: TICK,
        }
    }
}

impl GameConfig {
    /// Same constants on a different canvas.
    pub fn with_canvas(width: f64, height: f64) -> Self {
        Self {
            canvas_width: width,
            canvas_height: height,
            ..Self::default()
        }
    }

    /// Reject configurations the simulation cannot run with.
    ///
    /// The gap generator draws from the half-open range
    /// `[pipe_width, canvas_height - pipe_gap - pipe_width)`, so that range
    /// must be non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if !usable(self.canvas_width) || !usable(self.canvas_height) {
            return Err(ConfigError::EmptyCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        let (lo, hi) = (self.gap_top_min(), self.gap_top_max());
        // Written so NaN and infinite bounds fail too.
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(ConfigError::CanvasTooShort {
                height: self.canvas_height,
                gap: self.pipe_gap,
                margin: self.pipe_width,
            });
        }
        if !(0.0..=1.0).contains(&self.powerup_spawn_chance) {
            return Err(ConfigError::SpawnChance(self.powerup_spawn_chance));
        }
        if self.tick.is_zero() {
            return Err(ConfigError::ZeroTick);
        }
        if self.difficulty_interval == 0 {
            return Err(ConfigError::ZeroDifficultyInterval);
        }
        Ok(())
    }

    pub fn gap_top_min(&self) -> f64 {
        self.pipe_width
    }

    /// Exclusive upper bound for a generated gap top.
    pub fn gap_top_max(&self) -> f64 {
        self.canvas_height - self.pipe_gap - self.pipe_width
    }

    /// Horizontal distance between consecutive obstacles.
    pub fn obstacle_spacing(&self) -> f64 {
        self.pipe_gap + self.pipe_width
    }

    /// Number of simulation steps covering `duration`, rounded up.
    pub fn steps_for(&self, duration: Duration) -> u64 {
        let tick = self.tick.as_millis().max(1);
        duration.as_millis().div_ceil(tick) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_gap_range_for_default_canvas() {
        let c = GameConfig::default();
        assert!((c.gap_top_min() - 78.0).abs() < f64::EPSILON);
        assert!((c.gap_top_max() - 252.0).abs() < f64::EPSILON);
        assert!((c.obstacle_spacing() - 348.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_short_canvas_rejected() {
        // 270 + 2 * 78 = 426, range is empty at exactly that height
        let c = GameConfig::with_canvas(800.0, 426.0);
        assert!(matches!(
            c.validate(),
            Err(ConfigError::CanvasTooShort { .. })
        ));
        assert!(GameConfig::with_canvas(800.0, 427.0).validate().is_ok());
    }

    #[test]
    fn test_empty_canvas_rejected() {
        let c = GameConfig::with_canvas(0.0, 600.0);
        assert!(matches!(c.validate(), Err(ConfigError::EmptyCanvas { .. })));
    }

    #[test]
    fn test_non_finite_sizes_rejected() {
        for (w, h) in [(800.0, f64::NAN), (f64::NAN, 600.0), (800.0, f64::INFINITY)] {
            let c = GameConfig::with_canvas(w, h);
            assert!(matches!(c.validate(), Err(ConfigError::EmptyCanvas { .. })));
        }
        let c = GameConfig {
            pipe_gap: f64::NAN,
            ..GameConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::CanvasTooShort { .. })
        ));
        let c = GameConfig {
            pipe_width: f64::NEG_INFINITY,
            ..GameConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::CanvasTooShort { .. })
        ));
    }

    #[test]
    fn test_bad_spawn_chance_rejected() {
        let c = GameConfig {
            powerup_spawn_chance: 1.5,
            ..GameConfig::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::SpawnChance(1.5)));
    }

    #[test]
    fn test_steps_for_rounds_up() {
        let c = GameConfig::default();
        assert_eq!(c.steps_for(Duration::from_millis(16)), 1);
        assert_eq!(c.steps_for(Duration::from_millis(17)), 2);
        assert_eq!(c.steps_for(SHIELD_DURATION), 313);
        assert_eq!(c.steps_for(SLOW_TIME_DURATION), 188);
    }
}
