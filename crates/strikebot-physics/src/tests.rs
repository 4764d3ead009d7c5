#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::DVec3;

    use strikebot_core::constants::*;
    use strikebot_core::enums::Team;
    use strikebot_core::snapshot::{CarOrientation, CarState};
    use strikebot_core::types::{GameTime, Plane, SpaceTime};

    use crate::acceleration::{simulate_acceleration, StrikeProfile};
    use crate::arena::ArenaModel;
    use crate::ball_path::{BallPath, PathError};

    fn t(secs: f64) -> GameTime {
        GameTime::from_secs(secs)
    }

    fn stationary_car(boost: f64) -> CarState {
        CarState {
            position: DVec3::new(0.0, 0.0, 0.17),
            velocity: DVec3::ZERO,
            orientation: CarOrientation::level(DVec3::Y),
            boost,
            supersonic: false,
            team: Team::Blue,
            time: t(0.0),
        }
    }

    // ---- Trajectory predictor ----

    #[test]
    fn test_resting_ball_stays_on_floor() {
        let arena = ArenaModel::new();
        let path = arena.predict_ball_path(
            DVec3::new(0.0, 0.0, BALL_RADIUS),
            DVec3::ZERO,
            t(0.0),
            3.0,
        );

        for slice in path.slices() {
            assert!(
                (slice.space.z - BALL_RADIUS).abs() < 0.5,
                "resting ball should bobble at most slightly, got z={}",
                slice.space.z
            );
        }
    }

    #[test]
    fn test_bounds_respect_ball_radius() {
        let arena = ArenaModel::new();
        assert!(arena.is_in_bounds(DVec3::new(0.0, 0.0, BALL_RADIUS)));
        assert!(arena.is_in_bounds(DVec3::new(SIDE_WALL - 2.0, BACK_WALL - 2.0, BALL_RADIUS)));
        // A center closer than one radius to a wall is already touching it.
        assert!(!arena.is_in_bounds(DVec3::new(SIDE_WALL - 1.0, 0.0, BALL_RADIUS)));
        assert!(!arena.is_in_bounds(DVec3::new(0.0, BACK_WALL, BALL_RADIUS)));
    }

    #[test]
    fn test_path_samples_at_macro_cadence() {
        let arena = ArenaModel::new();
        let path = arena.predict_ball_path(DVec3::new(0.0, 0.0, 20.0), DVec3::ZERO, t(1.0), 2.0);

        // Seed sample plus one per macro step.
        assert_eq!(path.slices().len(), 21);
        assert_eq!(path.start_point().time, t(1.0));
        assert_relative_eq!(path.endpoint().time.secs(), 3.0, epsilon = 1e-9);
        assert!(path.can_extend());

        for pair in path.slices().windows(2) {
            assert!(pair[1].time > pair[0].time, "timestamps must ascend");
            assert_relative_eq!(
                pair[0].time.seconds_until(pair[1].time),
                BALL_SIMULATION_STEP_SECS,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_free_fall_matches_kinematics() {
        let arena = ArenaModel::new();
        // High enough that nothing is hit within half a second.
        let drop = DVec3::new(0.0, 0.0, 30.0);
        let path = arena.predict_ball_path(drop, DVec3::ZERO, t(0.0), 0.5);

        let motion = path.motion_at(t(0.5)).unwrap();
        let expected_z = 30.0 - 0.5 * GRAVITY * 0.5 * 0.5;
        assert_relative_eq!(motion.space().z, expected_z, epsilon = 0.05);
        assert_relative_eq!(motion.velocity.z, -GRAVITY * 0.5, epsilon = 0.2);
    }

    #[test]
    fn test_motion_at_reproduces_linear_interpolation() {
        // Hand-built path so the interpolation arithmetic is exactly known.
        let mut path = BallPath::new(SpaceTime::new(DVec3::new(0.0, 0.0, 10.0), t(0.0)));
        path.push_slice(SpaceTime::new(DVec3::new(2.0, 4.0, 10.0), t(1.0)));
        path.push_slice(SpaceTime::new(DVec3::new(2.0, 8.0, 10.0), t(2.0)));

        let motion = path.motion_at(t(0.25)).unwrap();
        assert_relative_eq!(motion.space().x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(motion.space().y, 1.0, epsilon = 1e-12);
        // Secant velocity of the bracketing pair.
        assert_relative_eq!(motion.velocity.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(motion.velocity.y, 4.0, epsilon = 1e-12);

        assert!(path.motion_at(t(-0.1)).is_none());
        assert!(path.motion_at(t(2.1)).is_none());
    }

    #[test]
    fn test_motion_at_is_pure() {
        let arena = ArenaModel::new();
        let path = arena.predict_ball_path(
            DVec3::new(5.0, 5.0, 10.0),
            DVec3::new(3.0, -2.0, 4.0),
            t(0.0),
            3.0,
        );

        let first = path.motion_at(t(1.234));
        for _ in 0..10 {
            assert_eq!(path.motion_at(t(1.234)), first);
        }
    }

    #[test]
    fn test_single_wall_bounce_counted_once() {
        let arena = ArenaModel::new();
        // Roll hard at the positive side wall; one bounce inside the horizon.
        let start = DVec3::new(SIDE_WALL - 20.0, 0.0, BALL_RADIUS);
        let path = arena.predict_ball_path(start, DVec3::new(30.0, 0.0, 0.0), t(0.0), 2.0);

        let after_bounce = path
            .motion_after_bounce(1)
            .expect("one wall bounce expected");
        assert!(
            after_bounce.velocity.x < 0.0,
            "x velocity should have reversed off the wall"
        );
        assert!(path.motion_after_bounce(2).is_none());
    }

    #[test]
    fn test_plane_break_detects_wall_crossing() {
        let arena = ArenaModel::new();
        let start = DVec3::new(0.0, 0.0, BALL_RADIUS);
        let path = arena.predict_ball_path(start, DVec3::new(0.0, 40.0, 0.0), t(0.0), 4.0);

        // A virtual plane short of the back wall, facing the ball.
        let plane = Plane::new(-DVec3::Y, DVec3::new(0.0, 60.0, 0.0));
        let along = path
            .plane_break(t(0.0), &plane, true)
            .expect("path should cross y=60");
        assert_relative_eq!(along.space().y, 60.0, epsilon = 1e-6);
        assert!(along.time().secs() > 1.0 && along.time().secs() < 2.0);

        // Directional filter: a plane the ball only crosses along its
        // normal direction yields nothing.
        let away = Plane::new(DVec3::Y, DVec3::new(0.0, 60.0, 0.0));
        assert!(path.plane_break(t(0.0), &away, true).is_none());

        // Purity: identical arguments, identical answers.
        assert_eq!(
            path.plane_break(t(0.0), &plane, true),
            path.plane_break(t(0.0), &plane, true)
        );
    }

    #[test]
    fn test_landing_found_after_drop() {
        let arena = ArenaModel::new();
        let path = arena.predict_ball_path(DVec3::new(10.0, 10.0, 20.0), DVec3::ZERO, t(0.0), 4.0);

        let landing = path.landing(t(0.0)).expect("dropped ball should land");
        assert_relative_eq!(landing.space().z, BALL_RADIUS, epsilon = 1e-9);
        // Fall time for ~18 units under gravity 13 is ~1.7s.
        assert!(landing.time().secs() > 1.0 && landing.time().secs() < 2.5);
    }

    #[test]
    fn test_extension_continues_from_endpoint() {
        let arena = ArenaModel::new();
        let seed_pos = DVec3::new(0.0, 0.0, 15.0);
        let seed_vel = DVec3::new(4.0, 7.0, 2.0);

        let mut extended = arena.predict_ball_path(seed_pos, seed_vel, t(0.0), 2.0);
        arena.extend_ball_path(&mut extended, 2.0).unwrap();

        let whole = arena.predict_ball_path(seed_pos, seed_vel, t(0.0), 4.0);
        assert_eq!(extended.slices().len(), whole.slices().len());
        let end_a = extended.endpoint();
        let end_b = whole.endpoint();
        assert_relative_eq!((end_a.space - end_b.space).length(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_truncated_path_refuses_extension() {
        let arena = ArenaModel::new();
        let mut path = BallPath::new(SpaceTime::new(DVec3::new(0.0, 0.0, 10.0), t(0.0)));
        path.push_slice(SpaceTime::new(DVec3::new(0.0, 1.0, 10.0), t(0.1)));
        // Final velocity recorded for an earlier moment than the endpoint:
        // the path was truncated mid-step.
        path.set_final_velocity(DVec3::new(0.0, 10.0, 0.0), t(0.05));

        assert!(!path.can_extend());
        assert_eq!(
            arena.extend_ball_path(&mut path, 1.0),
            Err(PathError::NotExtendable)
        );
    }

    // ---- Capability model ----

    #[test]
    fn test_distance_monotonic_in_time() {
        let plot = simulate_acceleration(&stationary_car(50.0), 5.0, 50.0, f64::MAX);
        for pair in plot.slices().windows(2) {
            assert!(pair[1].distance >= pair[0].distance);
            assert!(pair[1].time >= pair[0].time);
            assert!(pair[1].speed <= SUPERSONIC_SPEED + 1e-9);
        }
    }

    #[test]
    fn test_distance_monotonic_in_boost_budget() {
        // Flip injection disabled via the cutoff so the comparison isolates
        // the boost budget; a mid-flip interpolated sample can briefly beat
        // a still-boosting car.
        let car = stationary_car(100.0);
        let budgets = [0.0, 20.0, 40.0, 60.0, 80.0, 100.0];
        let plots: Vec<_> = budgets
            .iter()
            .map(|b| simulate_acceleration(&car, 4.0, *b, 0.0))
            .collect();

        for sample_time in [0.5, 1.0, 2.0, 3.0] {
            let mut previous = 0.0;
            for plot in &plots {
                let dts = plot.motion_at_time(t(sample_time)).unwrap();
                assert!(
                    dts.distance + 1e-9 >= previous,
                    "distance({sample_time}) must be non-decreasing in boost budget"
                );
                previous = dts.distance;
            }
        }
    }

    #[test]
    fn test_supersonic_short_circuit_bounds_samples() {
        let mut car = stationary_car(100.0);
        car.velocity = DVec3::new(0.0, SUPERSONIC_SPEED, 0.0);
        let plot = simulate_acceleration(&car, 10.0, 100.0, f64::MAX);

        // One start sample plus a single extrapolated cap sample.
        assert_eq!(plot.slices().len(), 2);
        let end = plot.end();
        assert_relative_eq!(end.distance, SUPERSONIC_SPEED * 10.0, epsilon = 1e-9);
        assert_relative_eq!(end.speed, SUPERSONIC_SPEED, epsilon = 1e-9);
    }

    #[test]
    fn test_flip_injected_when_boost_dry() {
        let plot = simulate_acceleration(&stationary_car(0.0), 6.0, 0.0, f64::MAX);

        // A flip consumes its full duration in one slice: find a pair of
        // consecutive samples separated by FRONT_FLIP_SECONDS.
        let flip_pair = plot.slices().windows(2).find(|pair| {
            (pair[0].time.seconds_until(pair[1].time) - FRONT_FLIP_SECONDS).abs() < 1e-9
        });
        let pair = flip_pair.expect("boost-dry run should include a flip");
        assert_relative_eq!(
            pair[1].speed - pair[0].speed,
            FRONT_FLIP_SPEED_BOOST,
            epsilon = 1e-9
        );

        // With a tight cutoff, no flip is ever injected.
        let no_flip = simulate_acceleration(&stationary_car(0.0), 6.0, 0.0, 1.0);
        assert!(no_flip.slices().windows(2).all(|pair| {
            (pair[0].time.seconds_until(pair[1].time) - FRONT_FLIP_SECONDS).abs() > 1e-9
        }));
    }

    #[test]
    fn test_plot_lookups_agree() {
        let plot = simulate_acceleration(&stationary_car(30.0), 4.0, 30.0, f64::MAX);

        let by_time = plot.motion_at_time(t(2.0)).unwrap();
        let by_distance = plot.motion_at_distance(by_time.distance).unwrap();
        assert_relative_eq!(by_distance.time.secs(), 2.0, epsilon = 1e-6);
        assert_relative_eq!(by_distance.speed, by_time.speed, epsilon = 1e-6);

        let travel = plot.travel_time(by_time.distance).unwrap();
        assert_relative_eq!(travel, 2.0, epsilon = 1e-6);

        // Beyond the horizon the plot never reaches: no solution.
        assert!(plot.motion_at_distance(1e6).is_none());
        assert!(plot.travel_time(1e6).is_none());
    }

    #[test]
    fn test_strike_adjustment_extends_distance() {
        let plot = simulate_acceleration(&stationary_car(0.0), 4.0, 0.0, 1.0);
        let strike = StrikeProfile::front_flip();

        let plain = plot.motion_at_time(t(3.0)).unwrap();
        let struck = plot.motion_after_strike(t(3.0), strike).unwrap();
        assert!(
            struck.distance > plain.distance,
            "terminal burst should add reach"
        );

        // Burst window longer than the simulated time degrades gracefully.
        let partial = plot.motion_after_strike(t(0.5), strike).unwrap();
        assert!(partial.distance > 0.0);
        assert!(partial.distance < struck.distance);
    }
}
