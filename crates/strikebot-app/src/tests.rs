#[cfg(test)]
mod tests {
    use strikebot_core::constants::{BACK_WALL, CEILING, SIDE_WALL};

    use crate::match_sim::{Match, SelfPlayConfig};

    // ---- Determinism ----

    #[test]
    fn test_determinism_same_seed() {
        let config = SelfPlayConfig {
            seed: 12345,
            ..Default::default()
        };
        let mut match_a = Match::new(&config);
        let mut match_b = Match::new(&config);

        for _ in 0..300 {
            let frame_a = match_a.tick();
            let frame_b = match_b.tick();

            let json_a = serde_json::to_string(&frame_a).unwrap();
            let json_b = serde_json::to_string(&frame_b).unwrap();
            assert_eq!(json_a, json_b, "frames diverged with same seed");
        }
    }

    // ---- World sanity ----

    #[test]
    fn test_ball_and_cars_stay_in_bounds() {
        let mut game = Match::new(&SelfPlayConfig {
            seed: 7,
            ..Default::default()
        });

        for _ in 0..600 {
            let frame = game.tick();
            let ball = frame.ball.position;
            assert!(ball.x.abs() <= SIDE_WALL && ball.y.abs() <= BACK_WALL);
            assert!(ball.z >= 0.0 && ball.z <= CEILING);
            for car in [frame.blue.position, frame.orange.position] {
                assert!(car.x.abs() < SIDE_WALL && car.y.abs() < BACK_WALL);
            }
        }
    }

    #[test]
    fn test_outputs_stay_normalized() {
        let mut game = Match::new(&SelfPlayConfig {
            seed: 99,
            ..Default::default()
        });

        for _ in 0..300 {
            let frame = game.tick();
            for output in [frame.blue_output, frame.orange_output] {
                assert!(output.steer.abs() <= 1.0);
                assert!(output.pitch.abs() <= 1.0);
                assert!((0.0..=1.0).contains(&output.throttle));
                assert!((0.0..=1.0).contains(&output.reverse_throttle));
            }
        }
    }

    #[test]
    fn test_score_is_monotonic() {
        let mut game = Match::new(&SelfPlayConfig {
            seed: 3,
            ..Default::default()
        });

        let mut last = (0, 0);
        for _ in 0..1200 {
            let frame = game.tick();
            let now = (frame.score.blue, frame.score.orange);
            assert!(now.0 >= last.0 && now.1 >= last.1);
            last = now;
        }
    }

    #[test]
    fn test_time_advances_at_tick_rate() {
        let mut game = Match::new(&SelfPlayConfig::default());
        let first = game.tick();
        let second = game.tick();
        assert_eq!(second.tick, first.tick + 1);
        assert!((second.time_secs - first.time_secs - 1.0 / 60.0).abs() < 1e-12);
    }
}
