use crate::bird::Bird;
use crate::config::GameConfig;
use crate::obstacle::Obstacle;

/// Does the bird touch any pipe?
///
/// A shielded bird never collides. Otherwise the bird collides with an
/// obstacle when the two overlap horizontally and some part of the bird is
/// outside the gap, above or below.
pub fn player_hits_obstacle(bird: &Bird, obstacles: &[Obstacle], config: &GameConfig) -> bool {
    if bird.has_shield {
        return false;
    }
    let b = bird.bounds();
    obstacles.iter().any(|o| {
        b.overlaps_x(&o.column(config))
            && (b.top() < o.gap_top || b.bottom() > o.gap_bottom(config))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (GameConfig, Bird) {
        let config = GameConfig::default();
        let bird = Bird::new(&config);
        (config, bird)
    }

    #[test]
    fn test_inside_gap_is_safe() {
        let (config, mut bird) = setup();
        bird.y = 400.0;
        let o = [Obstacle {
            x: bird.x,
            gap_top: 300.0,
        }];
        assert!(!player_hits_obstacle(&bird, &o, &config));
    }

    #[test]
    fn test_gap_edges_are_safe() {
        let (config, mut bird) = setup();
        let o = [Obstacle {
            x: bird.x,
            gap_top: 300.0,
        }];
        bird.y = 300.0;
        assert!(!player_hits_obstacle(&bird, &o, &config));
        bird.y = 570.0 - bird.height;
        assert!(!player_hits_obstacle(&bird, &o, &config));
    }

    #[test]
    fn test_poking_above_gap_hits() {
        // Centred bird spans 282..318 and pokes 18 units above a gap at 300.
        let (config, bird) = setup();
        let o = [Obstacle {
            x: bird.x,
            gap_top: 300.0,
        }];
        assert!(player_hits_obstacle(&bird, &o, &config));
    }

    #[test]
    fn test_poking_below_gap_hits() {
        let (config, mut bird) = setup();
        bird.y = 560.0;
        let o = [Obstacle {
            x: bird.x - 20.0,
            gap_top: 300.0,
        }];
        assert!(player_hits_obstacle(&bird, &o, &config));
    }

    #[test]
    fn test_no_horizontal_overlap_is_safe() {
        let (config, mut bird) = setup();
        bird.y = 0.0;
        let right = Obstacle {
            x: bird.x + bird.width,
            gap_top: 300.0,
        };
        let left = Obstacle {
            x: bird.x - config.pipe_width,
            gap_top: 300.0,
        };
        assert!(!player_hits_obstacle(&bird, &[left, right], &config));
    }

    #[test]
    fn test_off_top_of_screen_hits() {
        let (config, mut bird) = setup();
        bird.y = -200.0;
        let o = [Obstacle {
            x: bird.x,
            gap_top: 100.0,
        }];
        assert!(player_hits_obstacle(&bird, &o, &config));
    }

    #[test]
    fn test_shield_ignores_geometry() {
        let (config, mut bird) = setup();
        bird.has_shield = true;
        for y in [-300.0, 0.0, 150.0, 282.0, 564.0] {
            bird.y = y;
            let o = [Obstacle {
                x: bird.x,
                gap_top: 200.0,
            }];
            assert!(!player_hits_obstacle(&bird, &o, &config));
        }
    }

    #[test]
    fn test_empty_window() {
        let (config, bird) = setup();
        assert!(!player_hits_obstacle(&bird, &[], &config));
    }
}
