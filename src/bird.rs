//! The player-controlled bird.

use crate::config::GameConfig;
use crate::geometry::Rect;

/// Frames in the wing animation cycle.
const WING_FRAMES: u64 = 3;
/// Render ticks each wing frame stays on screen.
const WING_FRAME_TICKS: u64 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    /// Fixed horizontal position (left edge).
    pub x: f64,
    /// Top edge. Grows downward; may go negative when flying off the top.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Vertical velocity in units per step (positive = downward).
    pub velocity: f64,
    pub has_shield: bool,
    gravity: f64,
    jump_force: f64,
    canvas_height: f64,
}

impl Bird {
    pub fn new(config: &GameConfig) -> Self {
        let mut bird = Self {
            x: config.canvas_width / 10.0,
            y: 0.0,
            width: config.bird_width,
            height: config.bird_height,
            velocity: 0.0,
            has_shield: false,
            gravity: config.gravity,
            jump_force: config.jump_force,
            canvas_height: config.canvas_height,
        };
        bird.reset();
        bird
    }

    /// Start-of-round state: vertically centred, moving with the jump
    /// velocity, no shield.
    pub fn reset(&mut self) {
        self.velocity = self.jump_force;
        self.y = self.canvas_height / 2.0 - self.height / 2.0;
        self.has_shield = false;
    }

    /// One step of gravity. The floor stops the bird; nothing stops it at
    /// the top.
    pub fn apply_gravity(&mut self) {
        self.velocity += self.gravity;
        self.y = (self.y + self.velocity).min(self.floor());
    }

    pub fn jump(&mut self) {
        self.velocity = self.jump_force;
    }

    /// Largest y the bird can reach.
    pub fn floor(&self) -> f64 {
        self.canvas_height - self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Wing sprite for a given render tick: 0, 1 or 2.
    pub fn sprite_frame(index: u64) -> usize {
        ((index % (WING_FRAMES * WING_FRAME_TICKS)) / WING_FRAME_TICKS) as usize
    }
}
