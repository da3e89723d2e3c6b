//! Straight legs and multi-leg routes shared by the continuity kinds.

use crate::compass::snap;
use crate::coordinate::StepCoordinate;
use crate::movement::{MoveCommand, MoveStyle};

use super::{beats_for_steps, Compiled};

/// Steps needed to cover a displacement, counting a diagonal step as one
/// step on each axis.
pub(crate) fn leg_steps(from: &StepCoordinate, to: &StepCoordinate) -> f64 {
    let (dx, dy) = from.delta_to(to);
    snap(dx.abs().max(dy.abs()))
}

/// One straight leg from `from` toward `to`, cut short when `budget` beats
/// are not enough to get there. `None` when there is nothing to march.
pub(crate) fn march_leg(
    from: StepCoordinate,
    to: StepCoordinate,
    facing: Option<f64>,
    budget: u32,
    beats_per_step: u32,
    style: MoveStyle,
) -> Option<MoveCommand> {
    let steps = leg_steps(&from, &to);
    if steps == 0.0 || budget == 0 {
        return None;
    }
    let natural = beats_for_steps(steps, beats_per_step);
    let duration = natural.min(budget);
    let end = if duration < natural {
        from.lerp(&to, duration as f64 / natural as f64)
    } else {
        to
    };
    Some(MoveCommand::new(
        from,
        end,
        facing,
        duration,
        beats_per_step,
        style,
    ))
}

/// March `waypoints` in order from the current context position until they
/// run out or the beat budget does.
pub(crate) fn walk_route<'w>(
    compiled: &mut Compiled,
    waypoints: impl IntoIterator<Item = &'w StepCoordinate>,
    facing: Option<f64>,
    beats_per_step: u32,
    mut budget: u32,
) {
    for waypoint in waypoints {
        if budget == 0 {
            break;
        }
        let from = compiled.context.position;
        if let Some(leg) = march_leg(
            from,
            *waypoint,
            facing,
            budget.min(compiled.context.remaining),
            beats_per_step,
            MoveStyle::March,
        ) {
            budget = budget.saturating_sub(leg.duration());
            compiled.push(leg);
        }
    }
}
