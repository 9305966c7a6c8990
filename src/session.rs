//! One game session: the bird, the pipes, the power-ups and the rules that
//! tie them together each step.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::bird::Bird;
use crate::collision::player_hits_obstacle;
use crate::config::{ConfigError, GameConfig, MAX_FRAME_DELTA};
use crate::obstacle::{Obstacle, ObstacleStream};
use crate::powerup::{ActiveEffects, PowerupKind, PowerupManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Before the first flap.
    Idle,
    Playing,
    Paused,
    /// Bird hit a pipe. The next flap starts a fresh round.
    GameOver,
}

/// Things that happened during a step, for sound, persistence and logs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Scored { score: u32 },
    NewBest { best: u32 },
    PowerupCollected(PowerupKind),
    PowerupExpired(PowerupKind),
    Crashed { score: u32 },
}

#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    stream: ObstacleStream,
    pub bird: Bird,
    /// Exactly `WINDOW_LEN` pipes, ordered left to right.
    pub obstacles: Vec<Obstacle>,
    pub powerups: PowerupManager,
    pub effects: ActiveEffects,
    pub score: u32,
    pub best_score: u32,
    /// Scroll speed before power-up effects; ramps up with difficulty.
    base_speed: f64,
    /// Steps taken this round.
    pub frame: u64,
    mode: Mode,
    accumulated: Duration,
}

impl GameSession {
    /// Build an idle session. `best_score` comes from storage.
    pub fn new<R: Rng>(
        config: GameConfig,
        best_score: u32,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let stream = ObstacleStream::new(&config);
        Ok(Self {
            bird: Bird::new(&config),
            obstacles: stream.initial_window(rng),
            powerups: PowerupManager::new(&config),
            effects: ActiveEffects::new(&config),
            stream,
            score: 0,
            best_score,
            base_speed: config.speed,
            frame: 0,
            mode: Mode::Idle,
            accumulated: Duration::ZERO,
            config,
        })
    }

    /// Put every per-round field back to its starting value. Best score
    /// survives.
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        self.bird.reset();
        self.obstacles = self.stream.initial_window(rng);
        self.powerups.clear();
        self.effects.clear();
        self.score = 0;
        self.base_speed = self.config.speed;
        self.frame = 0;
        self.accumulated = Duration::ZERO;
    }

    pub fn start<R: Rng>(&mut self, rng: &mut R) {
        self.reset(rng);
        self.mode = Mode::Playing;
        info!(best = self.best_score, "round started");
    }

    /// Flap input. Starts a round from `Idle` or `GameOver`; ignored while
    /// paused. Returns whether the bird jumped.
    pub fn flap<R: Rng>(&mut self, rng: &mut R) -> bool {
        match self.mode {
            Mode::Idle | Mode::GameOver => {
                self.start(rng);
                self.bird.jump();
                true
            }
            Mode::Playing => {
                self.bird.jump();
                true
            }
            Mode::Paused => false,
        }
    }

    /// Pause input. Only `Playing` and `Paused` respond.
    pub fn toggle_pause(&mut self) -> bool {
        match self.mode {
            Mode::Playing => {
                self.mode = Mode::Paused;
                info!(score = self.score, frame = self.frame, "paused");
                true
            }
            Mode::Paused => {
                self.mode = Mode::Playing;
                // Time spent paused must not turn into a burst of steps.
                self.accumulated = Duration::ZERO;
                info!("resumed");
                true
            }
            Mode::Idle | Mode::GameOver => false,
        }
    }

    /// Feed wall-clock time since the last frame and run as many whole
    /// simulation steps as it covers.
    pub fn advance<R: Rng>(&mut self, dt: Duration, rng: &mut R) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.mode != Mode::Playing {
            return events;
        }
        self.accumulated += dt.min(MAX_FRAME_DELTA);
        while self.accumulated >= self.config.tick {
            self.accumulated -= self.config.tick;
            events.extend(self.step(rng));
            if self.mode != Mode::Playing {
                self.accumulated = Duration::ZERO;
                break;
            }
        }
        events
    }

    /// Advance the simulation by exactly one step. Does nothing outside
    /// `Playing`.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.mode != Mode::Playing {
            return events;
        }

        // 1. Clock, effect expiry, difficulty ramp
        self.frame += 1;
        for kind in self.effects.expire(self.frame, &mut self.bird) {
            debug!(kind = kind.name(), frame = self.frame, "power-up expired");
            events.push(GameEvent::PowerupExpired(kind));
        }
        if self.frame % self.config.difficulty_interval == 0 {
            self.base_speed += self.config.speed_increment;
            debug!(speed = self.base_speed, frame = self.frame, "speed up");
        }
        let speed = self.scroll_speed();

        // 2. Bird
        self.bird.apply_gravity();

        // 3. Pipes: scroll, recycle the head once it has left the screen
        for o in &mut self.obstacles {
            o.x -= speed;
        }
        while self
            .obstacles
            .first()
            .is_some_and(|o| o.is_offscreen(&self.config))
        {
            self.obstacles.remove(0);
            self.score += 1;
            events.push(GameEvent::Scored { score: self.score });
            if self.score > self.best_score {
                self.best_score = self.score;
                events.push(GameEvent::NewBest {
                    best: self.best_score,
                });
            }

            let next = match self.obstacles.last() {
                Some(tail) => self.stream.next_after(tail, rng),
                None => Obstacle {
                    x: self.config.canvas_width,
                    gap_top: self.stream.next_gap_height(rng),
                },
            };
            self.powerups.try_spawn(next.x, next.gap_top, rng);
            self.obstacles.push(next);
        }

        // 4. Power-ups drift with the pipes
        self.powerups.update(speed);

        // 5. Pipe collision ends the round
        if player_hits_obstacle(&self.bird, &self.obstacles, &self.config) {
            self.mode = Mode::GameOver;
            info!(score = self.score, best = self.best_score, frame = self.frame, "game over");
            events.push(GameEvent::Crashed { score: self.score });
            return events;
        }

        // 6. Pick-ups
        for kind in self.powerups.check_collection(&self.bird) {
            self.effects.activate(kind, self.frame, &mut self.bird);
            debug!(kind = kind.name(), frame = self.frame, "power-up collected");
            events.push(GameEvent::PowerupCollected(kind));
        }

        events
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Ramped speed without slow-time applied.
    pub fn base_speed(&self) -> f64 {
        self.base_speed
    }

    /// Horizontal distance pipes and power-ups move this step.
    pub fn scroll_speed(&self) -> f64 {
        self.effects.scroll_speed(self.base_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn session(rng: &mut StdRng) -> GameSession {
        GameSession::new(GameConfig::default(), 0, rng).unwrap()
    }

    #[test]
    fn test_new_session_is_idle() {
        let mut rng = rng();
        let s = session(&mut rng);
        assert_eq!(s.mode(), Mode::Idle);
        assert_eq!(s.obstacles.len(), 3);
        assert_eq!(s.score, 0);
        assert!((s.scroll_speed() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_degenerate_canvas_rejected() {
        let mut rng = rng();
        let err = GameSession::new(GameConfig::with_canvas(800.0, 300.0), 0, &mut rng);
        assert!(matches!(err, Err(ConfigError::CanvasTooShort { .. })));
    }

    #[test]
    fn test_step_does_nothing_when_idle() {
        let mut rng = rng();
        let mut s = session(&mut rng);
        let before = s.bird.clone();
        assert!(s.step(&mut rng).is_empty());
        assert_eq!(s.bird, before);
        assert_eq!(s.frame, 0);
    }

    #[test]
    fn test_flap_starts_round() {
        let mut rng = rng();
        let mut s = session(&mut rng);
        assert!(s.flap(&mut rng));
        assert_eq!(s.mode(), Mode::Playing);
        assert!((s.bird.velocity - (-11.5)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut rng = rng();
        let mut s = session(&mut rng);
        s.start(&mut rng);
        s.step(&mut rng);
        assert!(s.toggle_pause());
        assert_eq!(s.mode(), Mode::Paused);
        let frame = s.frame;
        let y = s.bird.y;
        s.step(&mut rng);
        s.advance(Duration::from_millis(80), &mut rng);
        assert_eq!(s.frame, frame);
        assert!((s.bird.y - y).abs() < f64::EPSILON);
    }

    #[test]
    fn test_flap_ignored_while_paused() {
        let mut rng = rng();
        let mut s = session(&mut rng);
        s.start(&mut rng);
        for _ in 0..5 {
            s.step(&mut rng);
        }
        s.toggle_pause();
        let v = s.bird.velocity;
        assert!(!s.flap(&mut rng));
        assert_eq!(s.mode(), Mode::Paused);
        assert!((s.bird.velocity - v).abs() < f64::EPSILON);
        assert_eq!(s.frame, 5);
    }

    #[test]
    fn test_pause_ignored_when_idle_or_over() {
        let mut rng = rng();
        let mut s = session(&mut rng);
        assert!(!s.toggle_pause());
        assert_eq!(s.mode(), Mode::Idle);
    }

    #[test]
    fn test_difficulty_ramp() {
        let mut rng = rng();
        let mut s = session(&mut rng);
        s.start(&mut rng);
        s.bird.has_shield = true;
        for _ in 0..999 {
            s.step(&mut rng);
        }
        assert!((s.base_speed() - 5.0).abs() < f64::EPSILON);
        s.step(&mut rng);
        assert!((s.base_speed() - 5.1).abs() < 1e-9);
    }

    #[test]
    fn test_advance_runs_whole_ticks() {
        let mut rng = rng();
        let mut s = session(&mut rng);
        s.start(&mut rng);
        s.bird.has_shield = true;
        s.advance(Duration::from_millis(50), &mut rng);
        assert_eq!(s.frame, 3);
        s.advance(Duration::from_millis(10), &mut rng);
        assert_eq!(s.frame, 3);
        s.advance(Duration::from_millis(10), &mut rng);
        assert_eq!(s.frame, 4);
    }

    #[test]
    fn test_resume_drops_leftover_time() {
        let mut rng = rng();
        let mut s = session(&mut rng);
        s.start(&mut rng);
        s.bird.has_shield = true;
        // 90 ms: five steps with 10 ms left over
        s.advance(Duration::from_millis(90), &mut rng);
        assert_eq!(s.frame, 5);
        assert!(s.toggle_pause());
        assert!(s.toggle_pause());
        s.advance(Duration::from_millis(10), &mut rng);
        assert_eq!(s.frame, 5);
        s.advance(Duration::from_millis(6), &mut rng);
        assert_eq!(s.frame, 6);
    }

    #[test]
    fn test_advance_clamps_long_frames() {
        let mut rng = rng();
        let mut s = session(&mut rng);
        s.start(&mut rng);
        s.bird.has_shield = true;
        s.advance(Duration::from_secs(5), &mut rng);
        assert_eq!(s.frame, 6);
    }

    #[test]
    fn test_shield_collected_in_step() {
        let mut rng = rng();
        let mut s = session(&mut rng);
        s.start(&mut rng);
        let bird = s.bird.bounds();
        s.powerups.active.push(crate::powerup::Powerup {
            x: bird.x + s.scroll_speed(),
            y: bird.y,
            size: 30.0,
            kind: PowerupKind::Shield,
        });
        let events = s.step(&mut rng);
        assert!(events.contains(&GameEvent::PowerupCollected(PowerupKind::Shield)));
        assert!(s.bird.has_shield);
        assert!(s.powerups.is_empty());
        s.step(&mut rng);
        assert!(s.bird.has_shield);
    }
}
