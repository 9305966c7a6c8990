//! Collectible power-ups and the timed effects they grant.

use rand::Rng;
use tracing::debug;

use crate::bird::Bird;
use crate::config::GameConfig;
use crate::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerupKind {
    /// Pipes can't hurt the bird while it lasts.
    Shield,
    /// Scrolling runs at a fraction of the current speed.
    SlowTime,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 2] = [PowerupKind::Shield, PowerupKind::SlowTime];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Shield => "shield",
            Self::SlowTime => "slow-time",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Powerup {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub kind: PowerupKind,
}

impl Powerup {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.size, self.size)
    }
}

/// The power-ups currently scrolling across the screen.
#[derive(Debug, Clone)]
pub struct PowerupManager {
    pub active: Vec<Powerup>,
    spawn_chance: f64,
    size: f64,
    half_gap: f64,
}

impl PowerupManager {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            active: Vec::new(),
            spawn_chance: config.powerup_spawn_chance,
            size: config.powerup_size,
            half_gap: config.pipe_gap / 2.0,
        }
    }

    /// Maybe drop a power-up into the gap of the obstacle at `obstacle_x`.
    pub fn try_spawn<R: Rng>(&mut self, obstacle_x: f64, gap_top: f64, rng: &mut R) -> bool {
        if !rng.gen_bool(self.spawn_chance) {
            return false;
        }
        let kind = PowerupKind::ALL[rng.gen_range(0..PowerupKind::ALL.len())];
        debug!(kind = kind.name(), x = obstacle_x, "power-up spawned");
        self.active.push(Powerup {
            x: obstacle_x,
            y: gap_top + self.half_gap,
            size: self.size,
            kind,
        });
        true
    }

    /// Scroll everything left and forget what left the screen.
    pub fn update(&mut self, scroll_speed: f64) {
        for p in &mut self.active {
            p.x -= scroll_speed;
        }
        self.active.retain(|p| p.x > -p.size);
    }

    /// Remove every power-up touching the bird and return their kinds.
    pub fn check_collection(&mut self, bird: &Bird) -> Vec<PowerupKind> {
        let bird_box = bird.bounds();
        let mut collected = Vec::new();
        self.active.retain(|p| {
            if bird_box.overlaps(&p.bounds()) {
                collected.push(p.kind);
                false
            } else {
                true
            }
        });
        collected
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// Timed effects, each expiring on a step number.
///
/// Deadlines are compared against the session's step counter, so expiry
/// happens inside the simulation step and a new round can't be touched by a
/// timer from the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveEffects {
    shield_until: Option<u64>,
    slow_until: Option<u64>,
    shield_steps: u64,
    slow_steps: u64,
    slow_factor: f64,
}

impl ActiveEffects {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            shield_until: None,
            slow_until: None,
            shield_steps: config.steps_for(config.shield_duration),
            slow_steps: config.steps_for(config.slow_time_duration),
            slow_factor: config.slow_time_factor,
        }
    }

    /// Start `kind` at step `now`. Picking up an effect that is already
    /// running restarts its full duration.
    pub fn activate(&mut self, kind: PowerupKind, now: u64, bird: &mut Bird) {
        match kind {
            PowerupKind::Shield => {
                bird.has_shield = true;
                self.shield_until = Some(now + self.shield_steps);
            }
            PowerupKind::SlowTime => {
                self.slow_until = Some(now + self.slow_steps);
            }
        }
    }

    /// End effects whose deadline is at or before `now`.
    pub fn expire(&mut self, now: u64, bird: &mut Bird) -> Vec<PowerupKind> {
        let mut expired = Vec::new();
        if self.shield_until.is_some_and(|t| t <= now) {
            self.shield_until = None;
            bird.has_shield = false;
            expired.push(PowerupKind::Shield);
        }
        if self.slow_until.is_some_and(|t| t <= now) {
            self.slow_until = None;
            expired.push(PowerupKind::SlowTime);
        }
        expired
    }

    /// Speed after effects, given the ramped base speed.
    pub fn scroll_speed(&self, base: f64) -> f64 {
        if self.slow_until.is_some() {
            base * self.slow_factor
        } else {
            base
        }
    }

    pub fn is_active(&self, kind: PowerupKind) -> bool {
        match kind {
            PowerupKind::Shield => self.shield_until.is_some(),
            PowerupKind::SlowTime => self.slow_until.is_some(),
        }
    }

    /// Steps left on `kind`, if it's running.
    pub fn remaining(&self, kind: PowerupKind, now: u64) -> Option<u64> {
        let until = match kind {
            PowerupKind::Shield => self.shield_until,
            PowerupKind::SlowTime => self.slow_until,
        };
        until.map(|t| t.saturating_sub(now))
    }

    pub fn clear(&mut self) {
        self.shield_until = None;
        self.slow_until = None;
    }
}
