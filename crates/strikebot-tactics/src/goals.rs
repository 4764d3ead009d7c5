//! Goal geometry and scoring-event prediction.

use glam::DVec3;

use strikebot_core::constants::{BALL_RADIUS, GOAL_DISTANCE, GOAL_EXTENT, GOAL_HEIGHT};
use strikebot_core::enums::Team;
use strikebot_core::types::{GameTime, Plane, SpaceTimeVelocity};
use strikebot_physics::BallPath;

/// How far in front of the goal mouth the defensive box extends.
const BOX_DEPTH: f64 = 20.0;

/// Half-width of the defensive box.
const BOX_EXTENT: f64 = 30.0;

/// One team's goal: the opening on their back wall.
#[derive(Debug, Clone, Copy)]
pub struct Goal {
    pub team: Team,
    /// Center of the goal mouth at ground level.
    pub center: DVec3,
    /// Crossing this plane toward the wall scores against `team`.
    pub score_plane: Plane,
    /// A plane slightly field-side of the mouth, used for early warning.
    pub threat_plane: Plane,
}

impl Goal {
    pub fn for_team(team: Team) -> Self {
        let side = team.goal_side();
        let center = DVec3::new(0.0, side * GOAL_DISTANCE, 0.0);
        // Normals face into the field, so a scoring ball approaches
        // against them. The score plane sits one ball radius field-side of
        // the mouth: the predictor reflects the ball at that clearance, so
        // a mouth-height crossing there is a ball in the net.
        let inward = DVec3::new(0.0, -side, 0.0);
        Self {
            team,
            center,
            score_plane: Plane::new(inward, center + inward * BALL_RADIUS),
            threat_plane: Plane::new(inward, center + inward * BOX_DEPTH),
        }
    }

    /// The point on the goal mouth nearest to `ball`, inset by `padding`
    /// from the posts and crossbar.
    pub fn nearest_entrance(&self, ball: DVec3, padding: f64) -> DVec3 {
        let x = ball.x.clamp(-(GOAL_EXTENT - padding), GOAL_EXTENT - padding);
        let z = ball
            .z
            .clamp(BALL_RADIUS, (GOAL_HEIGHT - padding).max(BALL_RADIUS));
        DVec3::new(x, self.center.y, z)
    }

    /// Whether a flat position sits inside this goal's defensive box.
    pub fn is_in_box(&self, position: DVec3) -> bool {
        let side = self.team.goal_side();
        position.x.abs() < BOX_EXTENT && position.y * side > GOAL_DISTANCE - BOX_DEPTH
    }
}

/// The moment the ball crosses the score plane into the goal mouth, if the
/// path predicts one. Only mouth-height, between-the-posts crossings count.
pub fn predict_goal_event(goal: &Goal, path: &BallPath) -> Option<SpaceTimeVelocity> {
    let crossing = path.plane_break(path.start_point().time, &goal.score_plane, true)?;
    let space = crossing.space();
    if space.x.abs() < GOAL_EXTENT && space.z < GOAL_HEIGHT {
        Some(crossing)
    } else {
        None
    }
}

/// Whether the predicted path carries the ball into the goal's defensive
/// box at or after `after`.
pub fn ball_enters_box(goal: &Goal, path: &BallPath, after: GameTime) -> bool {
    if let Some(crossing) = path.plane_break(after, &goal.threat_plane, true) {
        return crossing.space().x.abs() < BOX_EXTENT;
    }
    path.slices()
        .iter()
        .any(|slice| slice.time >= after && goal.is_in_box(slice.space))
}
