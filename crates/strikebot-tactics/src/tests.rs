#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::DVec3;

    use strikebot_core::constants::BALL_RADIUS;
    use strikebot_core::control::ControlOutput;
    use strikebot_core::enums::{Posture, Team};
    use strikebot_core::snapshot::{
        BallState, CarOrientation, CarState, ScoreLine, WorldSnapshot,
    };
    use strikebot_core::types::GameTime;
    use strikebot_physics::acceleration::simulate_acceleration;
    use strikebot_physics::ArenaModel;

    use crate::advisor::{assess, make_plan, Bot};
    use crate::intercept::soonest_intercept;
    use crate::plan::{Plan, PlanError, TickContext};

    fn t(secs: f64) -> GameTime {
        GameTime::from_secs(secs)
    }

    fn car_at(position: DVec3, team: Team, time: GameTime) -> CarState {
        CarState {
            position,
            velocity: DVec3::ZERO,
            orientation: CarOrientation::level(DVec3::Y),
            boost: 100.0,
            supersonic: false,
            team,
            time,
        }
    }

    fn snapshot_at(
        time: GameTime,
        ball_position: DVec3,
        blue_position: DVec3,
        orange_position: DVec3,
    ) -> WorldSnapshot {
        WorldSnapshot {
            time,
            ball: BallState {
                position: ball_position,
                velocity: DVec3::ZERO,
            },
            blue_car: car_at(blue_position, Team::Blue, time),
            orange_car: car_at(orange_position, Team::Orange, time),
            score: ScoreLine::default(),
        }
    }

    fn steer_only(steer: f64) -> ControlOutput {
        ControlOutput::neutral().with_steer(steer)
    }

    // ---- Plan lifecycle ----

    #[test]
    fn test_plan_visits_every_step_once_in_order() {
        let arena = ArenaModel::new();
        let mut plan = Plan::new(Posture::Neutral)
            .with_timed(steer_only(0.1), 0.1)
            .with_timed(steer_only(0.2), 0.1)
            .with_timed(steer_only(0.3), 0.1)
            .begin();

        let mut seen = Vec::new();
        for secs in [0.0, 0.05, 0.1, 0.2, 0.25] {
            let snapshot = snapshot_at(
                t(secs),
                DVec3::new(0.0, 50.0, BALL_RADIUS),
                DVec3::new(0.0, -40.0, 0.17),
                DVec3::new(0.0, 40.0, 0.17),
            );
            let ctx = TickContext::new(&snapshot, Team::Blue, &arena);
            let output = plan.tick(&ctx).unwrap().expect("still mid-plan");
            seen.push(output.steer);
        }
        assert_eq!(seen, vec![0.1, 0.1, 0.2, 0.3, 0.3]);

        // Past the last deadline the cursor exhausts: completion, not error.
        let snapshot = snapshot_at(
            t(0.3),
            DVec3::new(0.0, 50.0, BALL_RADIUS),
            DVec3::new(0.0, -40.0, 0.17),
            DVec3::new(0.0, 40.0, 0.17),
        );
        let ctx = TickContext::new(&snapshot, Team::Blue, &arena);
        assert_eq!(plan.tick(&ctx), Ok(None));
        assert!(plan.is_complete());
    }

    #[test]
    fn test_plan_lifecycle_errors_are_a_distinct_channel() {
        let arena = ArenaModel::new();
        let snapshot = snapshot_at(
            t(0.0),
            DVec3::new(0.0, 50.0, BALL_RADIUS),
            DVec3::new(0.0, -40.0, 0.17),
            DVec3::new(0.0, 40.0, 0.17),
        );
        let ctx = TickContext::new(&snapshot, Team::Blue, &arena);

        // Ticking before begin() is misuse, not "no output".
        let mut unbegun = Plan::new(Posture::Neutral).with_timed(steer_only(0.5), 0.1);
        assert_eq!(unbegun.tick(&ctx), Err(PlanError::NotBegun));

        // An empty begun plan completes normally, then refuses further ticks.
        let mut empty = Plan::new(Posture::Neutral).begin();
        assert_eq!(empty.tick(&ctx), Ok(None));
        assert_eq!(empty.tick(&ctx), Err(PlanError::AlreadyComplete));
    }

    #[test]
    fn test_timed_step_boundary() {
        // Scenario: a 500 ms step is incomplete strictly before
        // activation+500ms and complete at or after it.
        let arena = ArenaModel::new();
        let mut plan = Plan::new(Posture::Neutral)
            .with_timed(steer_only(1.0), 0.5)
            .begin();

        let tick_at = |plan: &mut Plan, secs: f64| {
            let snapshot = snapshot_at(
                t(secs),
                DVec3::new(0.0, 50.0, BALL_RADIUS),
                DVec3::new(0.0, -40.0, 0.17),
                DVec3::new(0.0, 40.0, 0.17),
            );
            let ctx = TickContext::new(&snapshot, Team::Blue, &arena);
            plan.tick(&ctx)
        };

        // Activation happens at the first tick, t=1.0.
        assert!(tick_at(&mut plan, 1.0).unwrap().is_some());
        assert!(tick_at(&mut plan, 1.25).unwrap().is_some());
        assert!(tick_at(&mut plan, 1.4999).unwrap().is_some());
        assert_eq!(tick_at(&mut plan, 1.5), Ok(None));
        assert!(plan.is_complete());
    }

    #[test]
    fn test_timed_steps_refuse_interruption() {
        let plan = Plan::new(Posture::Neutral)
            .with_timed(steer_only(0.0), 0.5)
            .begin();
        assert!(!plan.can_interrupt());
        assert!(!plan.can_interrupt_for(Posture::Save));
    }

    #[test]
    fn test_posture_arbitration_requires_strictly_greater_urgency() {
        use crate::maneuvers::{ChaseBall, Maneuver};

        let plan = Plan::new(Posture::Defensive)
            .with_maneuver(Maneuver::ChaseBall(ChaseBall::new()))
            .begin();

        assert!(plan.can_interrupt());
        assert!(!plan.can_interrupt_for(Posture::Neutral));
        assert!(!plan.can_interrupt_for(Posture::Defensive));
        assert!(plan.can_interrupt_for(Posture::Save));
        assert!(plan.can_interrupt_for(Posture::Kickoff));
    }

    // ---- Intercept solver ----

    #[test]
    fn test_intercept_at_origin_is_immediate() {
        // Scenario: ball at rest at the origin, car already there with full
        // boost; a trivial predicate yields a candidate at time ~0.
        let arena = ArenaModel::new();
        let car = car_at(DVec3::new(0.0, 0.0, 0.17), Team::Blue, t(0.0));
        let path = arena.predict_ball_path(
            DVec3::new(0.0, 0.0, BALL_RADIUS),
            DVec3::ZERO,
            t(0.0),
            3.0,
        );
        let plot = simulate_acceleration(&car, 3.0, car.boost, f64::MAX);

        let candidate = soonest_intercept(&car, &path, &plot, DVec3::ZERO, |_, _| true)
            .expect("trivial intercept must exist");
        assert_relative_eq!(candidate.time.secs(), 0.0, epsilon = 1e-9);
        assert!(candidate.space.truncate().length() < 0.5);
    }

    #[test]
    fn test_intercept_respects_predicate() {
        let arena = ArenaModel::new();
        let car = car_at(DVec3::new(0.0, 0.0, 0.17), Team::Blue, t(0.0));
        let path = arena.predict_ball_path(
            DVec3::new(0.0, 0.0, BALL_RADIUS),
            DVec3::ZERO,
            t(0.0),
            3.0,
        );
        let plot = simulate_acceleration(&car, 3.0, car.boost, f64::MAX);

        assert!(soonest_intercept(&car, &path, &plot, DVec3::ZERO, |_, _| false).is_none());
    }

    #[test]
    fn test_scan_orders_disagree_on_purpose() {
        use crate::intercept::{solve_intercept, ScanOrder};

        // Against a resting ball, slack keeps growing as the car keeps
        // accelerating, so most-slack picks a later sample than
        // first-feasible.
        let arena = ArenaModel::new();
        let car = car_at(DVec3::new(0.0, 0.0, 0.17), Team::Blue, t(0.0));
        let path = arena.predict_ball_path(
            DVec3::new(0.0, 20.0, BALL_RADIUS),
            DVec3::ZERO,
            t(0.0),
            3.0,
        );
        let plot = simulate_acceleration(&car, 3.0, car.boost, f64::MAX);

        let first = solve_intercept(
            &car,
            &path,
            &plot,
            DVec3::ZERO,
            None,
            ScanOrder::FirstFeasible,
            |_, _| true,
        )
        .expect("feasible");
        let slackest = solve_intercept(
            &car,
            &path,
            &plot,
            DVec3::ZERO,
            None,
            ScanOrder::MostSlack,
            |_, _| true,
        )
        .expect("feasible");

        assert!(slackest.time > first.time);
        assert_eq!(first.space, slackest.space);
    }

    #[test]
    fn test_lead_target_degenerate_cases() {
        use glam::DVec2;

        use crate::intercept::lead_target;

        // Target receding faster than the chaser can run: no solution.
        assert!(lead_target(
            DVec2::ZERO,
            DVec2::new(10.0, 0.0),
            DVec2::new(30.0, 0.0),
            20.0,
        )
        .is_none());

        // Head-on closure has a clean positive root.
        let (point, time) = lead_target(
            DVec2::ZERO,
            DVec2::new(10.0, 0.0),
            DVec2::new(-5.0, 0.0),
            15.0,
        )
        .expect("closing target must be catchable");
        assert!(time > 0.0);
        assert_relative_eq!(point.x, 10.0 - 5.0 * time, epsilon = 1e-9);
    }

    // ---- Race analysis ----

    #[test]
    fn test_clear_lead_selects_plenty_of_time_family() {
        // Scenario: our intercept is about 3 seconds earlier than the
        // opponent's, so the cascade must choose a discretionary behavior,
        // never a contested or defensive one.
        let arena = ArenaModel::new();
        let snapshot = snapshot_at(
            t(0.0),
            DVec3::new(0.0, 14.0, BALL_RADIUS),
            DVec3::new(0.0, 8.0, 0.17),
            DVec3::new(0.0, 95.0, 0.17),
        );
        let path = arena.predict_ball_path(
            snapshot.ball.position,
            snapshot.ball.velocity,
            snapshot.time,
            5.0,
        );

        let situation = assess(&snapshot, Team::Blue, &path);
        let lead = situation.lead_seconds.expect("both sides should solve");
        assert!(lead > 2.0, "expected a comfortable lead, got {lead:.2}s");

        let plan = make_plan(&snapshot, Team::Blue, &situation);
        assert!(
            plan.posture() <= Posture::Offensive,
            "plenty-of-time plans stay discretionary, got {:?}",
            plan.posture()
        );
    }

    #[test]
    fn test_losing_race_with_dangerous_enemy_selects_defense() {
        // Mirror image: the opponent is on the ball and shooting at our net,
        // we are across the field.
        let arena = ArenaModel::new();
        let snapshot = snapshot_at(
            t(0.0),
            DVec3::new(0.0, -14.0, BALL_RADIUS),
            DVec3::new(0.0, 80.0, 0.17),
            DVec3::new(0.0, -8.0, 0.17),
        );
        let path = arena.predict_ball_path(
            snapshot.ball.position,
            snapshot.ball.velocity,
            snapshot.time,
            5.0,
        );

        let situation = assess(&snapshot, Team::Blue, &path);
        let lead = situation.lead_seconds.expect("both sides should solve");
        assert!(lead < -0.5, "expected to lose the race, got {lead:.2}s");
        assert!(situation.enemy_approach_error < std::f64::consts::PI / 3.0);

        let plan = make_plan(&snapshot, Team::Blue, &situation);
        assert_eq!(plan.posture(), Posture::Defensive);
    }

    #[test]
    fn test_situation_exports_as_json() {
        // The telemetry side-channel is plain data a host can serialize.
        let arena = ArenaModel::new();
        let snapshot = snapshot_at(
            t(0.0),
            DVec3::new(0.0, 14.0, BALL_RADIUS),
            DVec3::new(0.0, 8.0, 0.17),
            DVec3::new(0.0, 95.0, 0.17),
        );
        let path = arena.predict_ball_path(
            snapshot.ball.position,
            snapshot.ball.velocity,
            snapshot.time,
            5.0,
        );

        let situation = assess(&snapshot, Team::Blue, &path);
        let json = serde_json::to_string(&situation).expect("situation serializes");
        let back: crate::advisor::TacticalSituation =
            serde_json::from_str(&json).expect("situation deserializes");
        assert_eq!(situation.lead_seconds, back.lead_seconds);
        assert_eq!(situation.wrong_sided, back.wrong_sided);
    }

    // ---- Bot tick boundary ----

    #[test]
    fn test_kickoff_override_preempts_everything() {
        let mut bot = Bot::new(Team::Blue);
        let snapshot = snapshot_at(
            t(0.0),
            DVec3::new(0.0, 0.0, BALL_RADIUS),
            DVec3::new(0.0, -40.0, 0.17),
            DVec3::new(0.0, 40.0, 0.17),
        );

        let output = bot.tick(&snapshot);
        // Kickoff rush: flat out at the centered ball.
        assert!(output.throttle > 0.0 || output.boost);
        assert_relative_eq!(output.steer, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_bot_always_emits_and_publishes_telemetry() {
        let mut bot = Bot::new(Team::Orange);
        let mut time = 0.0;
        for _ in 0..30 {
            let snapshot = snapshot_at(
                t(time),
                DVec3::new(5.0, 10.0, BALL_RADIUS),
                DVec3::new(-20.0, -40.0, 0.17),
                DVec3::new(20.0, 40.0, 0.17),
            );
            let output = bot.tick(&snapshot);
            assert!(output.steer.abs() <= 1.0);
            assert!((0.0..=1.0).contains(&output.throttle));
            time += 1.0 / 60.0;
        }
        assert!(bot.context.last_ball_path.is_some());
    }

    #[test]
    fn test_bots_are_independent() {
        // Two controllers over the same snapshot share nothing; ticking one
        // never perturbs the other.
        let mut blue = Bot::new(Team::Blue);
        let mut orange = Bot::new(Team::Orange);
        let snapshot = snapshot_at(
            t(1.0),
            DVec3::new(0.0, 20.0, BALL_RADIUS),
            DVec3::new(0.0, -40.0, 0.17),
            DVec3::new(0.0, 40.0, 0.17),
        );

        let blue_alone = Bot::new(Team::Blue).tick(&snapshot);
        let _ = orange.tick(&snapshot);
        let blue_after = blue.tick(&snapshot);
        assert_eq!(blue_alone, blue_after);
    }
}
