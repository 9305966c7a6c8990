//! Pipe pairs and the generator that keeps them coming.

use rand::Rng;

use crate::config::GameConfig;
use crate::geometry::Rect;

/// Obstacles alive at once. The window slides: the head is evicted once it
/// leaves the screen and a new one is appended behind the tail.
pub const WINDOW_LEN: usize = 3;

/// A top + bottom pipe pair with a fixed-height gap between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Left edge (float for smooth scrolling).
    pub x: f64,
    /// Where the passable gap starts; the gap spans `gap_top..gap_top + pipe_gap`.
    pub gap_top: f64,
}

impl Obstacle {
    pub fn gap_bottom(&self, config: &GameConfig) -> f64 {
        self.gap_top + config.pipe_gap
    }

    /// Whole column occupied by the pair, gap included.
    pub fn column(&self, config: &GameConfig) -> Rect {
        Rect::new(self.x, 0.0, config.pipe_width, config.canvas_height)
    }

    pub fn top_pipe(&self, config: &GameConfig) -> Rect {
        Rect::new(self.x, 0.0, config.pipe_width, self.gap_top)
    }

    pub fn bottom_pipe(&self, config: &GameConfig) -> Rect {
        let top = self.gap_bottom(config);
        Rect::new(
            self.x,
            top,
            config.pipe_width,
            (config.canvas_height - top).max(0.0),
        )
    }

    /// Fully past the left edge of the screen.
    pub fn is_offscreen(&self, config: &GameConfig) -> bool {
        self.x <= -config.pipe_width
    }
}

/// Procedural source of obstacle positions.
#[derive(Debug, Clone)]
pub struct ObstacleStream {
    gap_min: f64,
    gap_max: f64,
    spacing: f64,
    spawn_x: f64,
}

impl ObstacleStream {
    /// Expects a validated config; an empty gap range would make
    /// `next_gap_height` panic.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            gap_min: config.gap_top_min(),
            gap_max: config.gap_top_max(),
            spacing: config.obstacle_spacing(),
            spawn_x: config.canvas_width,
        }
    }

    /// Uniform in `[pipe_width, canvas_height - pipe_gap - pipe_width)`.
    pub fn next_gap_height<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.gen_range(self.gap_min..self.gap_max)
    }

    /// Starting obstacles, lined up from the right edge of the canvas.
    pub fn initial_window<R: Rng>(&self, rng: &mut R) -> Vec<Obstacle> {
        (0..WINDOW_LEN)
            .map(|i| Obstacle {
                x: self.spawn_x + i as f64 * self.spacing,
                gap_top: self.next_gap_height(rng),
            })
            .collect()
    }

    /// The obstacle that follows `tail`.
    pub fn next_after<R: Rng>(&self, tail: &Obstacle, rng: &mut R) -> Obstacle {
        Obstacle {
            x: tail.x + self.spacing,
            gap_top: self.next_gap_height(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_gap_heights_stay_in_range() {
        let config = GameConfig::default();
        let stream = ObstacleStream::new(&config);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let h = stream.next_gap_height(&mut rng);
            assert!(h >= 78.0, "gap top {h} below minimum");
            assert!(h < 252.0, "gap top {h} at or above maximum");
        }
    }

    #[test]
    fn test_gap_fits_on_screen() {
        let config = GameConfig::with_canvas(431.0, 768.0);
        let stream = ObstacleStream::new(&config);
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..1000 {
            let o = Obstacle {
                x: 0.0,
                gap_top: stream.next_gap_height(&mut rng),
            };
            assert!(o.gap_bottom(&config) + config.pipe_width <= config.canvas_height);
        }
    }

    #[test]
    fn test_initial_window_layout() {
        let config = GameConfig::default();
        let stream = ObstacleStream::new(&config);
        let mut rng = StdRng::seed_from_u64(1);
        let window = stream.initial_window(&mut rng);
        assert_eq!(window.len(), WINDOW_LEN);
        let xs: Vec<f64> = window.iter().map(|o| o.x).collect();
        assert_eq!(xs, vec![800.0, 1148.0, 1496.0]);
    }

    #[test]
    fn test_next_after_spacing() {
        let config = GameConfig::default();
        let stream = ObstacleStream::new(&config);
        let mut rng = StdRng::seed_from_u64(3);
        let tail = Obstacle {
            x: 420.0,
            gap_top: 100.0,
        };
        let next = stream.next_after(&tail, &mut rng);
        assert!((next.x - 768.0).abs() < f64::EPSILON);
        assert!(next.gap_top >= config.gap_top_min() && next.gap_top < config.gap_top_max());
    }

    #[test]
    fn test_offscreen_threshold() {
        let config = GameConfig::default();
        let mut o = Obstacle {
            x: -77.9,
            gap_top: 100.0,
        };
        assert!(!o.is_offscreen(&config));
        o.x = -78.0;
        assert!(o.is_offscreen(&config));
    }

    #[test]
    fn test_pipe_rects_surround_gap() {
        let config = GameConfig::default();
        let o = Obstacle {
            x: 10.0,
            gap_top: 100.0,
        };
        assert!((o.top_pipe(&config).bottom() - 100.0).abs() < f64::EPSILON);
        assert!((o.bottom_pipe(&config).top() - 370.0).abs() < f64::EPSILON);
        assert!((o.bottom_pipe(&config).bottom() - 600.0).abs() < f64::EPSILON);
    }
}
