//! Movement commands: the compiled, immutable building blocks of a dot's
//! motion within one sheet.
//!
//! A command covers `duration` beats starting at its own beat 0. Sampling is
//! inclusive at both ends so the state at `duration` is the final state.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::compass::{
    direction_angle, orientation_label, snap, unit_vector, wrap_degrees, CompoundDirection,
};
use crate::coordinate::StepCoordinate;
use crate::state::AnimationState;

/// Beats this close past a command's end still sample as the end state.
pub const BEAT_TOLERANCE: f64 = 1e-9;

/// Clamp a relative beat into `[0, duration]`, or `None` when out of range.
fn local_beat(beat: f64, duration: u32) -> Option<f64> {
    let d = duration as f64;
    if beat.is_nan() || beat < 0.0 || beat > d + BEAT_TOLERANCE {
        None
    } else {
        Some(beat.min(d))
    }
}

fn steps_for(duration: u32, beats_per_step: u32) -> f64 {
    duration as f64 / beats_per_step.max(1) as f64
}

/// How a straight move is described in continuity text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveStyle {
    #[default]
    March,
    Even,
}

/// Straight-line travel from `start` to `end`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCommand {
    start: StepCoordinate,
    end: StepCoordinate,
    direction: f64,
    orientation: f64,
    duration: u32,
    beats_per_step: u32,
    #[serde(default)]
    style: MoveStyle,
}

impl MoveCommand {
    /// `orientation` defaults to the direction of travel.
    pub fn new(
        start: StepCoordinate,
        end: StepCoordinate,
        orientation: Option<f64>,
        duration: u32,
        beats_per_step: u32,
        style: MoveStyle,
    ) -> Self {
        let (dx, dy) = start.delta_to(&end);
        let direction = direction_angle(dx, dy);
        Self {
            start,
            end: end.snapped(),
            direction,
            orientation: wrap_degrees(orientation.unwrap_or(direction)),
            duration,
            beats_per_step: beats_per_step.max(1),
            style,
        }
    }

    pub fn start(&self) -> StepCoordinate {
        self.start
    }

    pub fn end(&self) -> StepCoordinate {
        self.end
    }

    /// Travel angle.
    pub fn direction(&self) -> f64 {
        self.direction
    }

    pub fn orientation(&self) -> f64 {
        self.orientation
    }

    pub fn style(&self) -> MoveStyle {
        self.style
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn beats_per_step(&self) -> u32 {
        self.beats_per_step
    }

    pub fn sample(&self, beat: f64) -> Option<AnimationState> {
        let b = local_beat(beat, self.duration)?;
        let position = if self.duration == 0 || b >= self.duration as f64 {
            self.end
        } else {
            self.start.lerp(&self.end, b / self.duration as f64)
        };
        Some(AnimationState::new(position, self.orientation))
    }

    fn text(&self) -> String {
        let steps = steps_for(self.duration, self.beats_per_step);
        match self.style {
            MoveStyle::March => format!(
                "Move {steps} {}",
                CompoundDirection::from_angle(self.direction).label()
            ),
            MoveStyle::Even => self.even_text(steps),
        }
    }

    fn even_text(&self, steps: f64) -> String {
        let (dx, dy) = self.start.delta_to(&self.end);
        let (dx, dy) = (snap(dx), snap(dy));
        let dir_x = if dx < 0.0 { "S" } else { "N" };
        let dir_y = if dy < 0.0 { "W" } else { "E" };
        let (ax, ay) = (dx.abs(), dy.abs());

        if ax == 0.0 && ay == steps {
            return format!("Move {steps} {dir_y}");
        }
        if ay == 0.0 && ax == steps {
            return format!("Move {steps} {dir_x}");
        }
        if ax == ay && ax == steps {
            return format!("Move {steps} {dir_x}{dir_y}");
        }

        let mut text = String::new();
        if ax.fract() != 0.0 || ay.fract() != 0.0 {
            text.push_str(CompoundDirection::from_angle(self.direction).label());
        } else {
            if ay != 0.0 {
                let _ = write!(text, "{ay} {dir_y}");
            }
            if ax != 0.0 {
                if !text.is_empty() {
                    text.push_str(", ");
                }
                let _ = write!(text, "{ax} {dir_x}");
            }
        }
        if text.is_empty() {
            text.push('0');
        }
        format!("Even {text} ({steps} steps)")
    }
}

/// Standing in place, either marking time or at a close.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopCommand {
    position: StepCoordinate,
    orientation: f64,
    duration: u32,
    beats_per_step: u32,
    is_mark_time: bool,
}

impl StopCommand {
    pub fn new(
        position: StepCoordinate,
        orientation: f64,
        duration: u32,
        beats_per_step: u32,
        is_mark_time: bool,
    ) -> Self {
        Self {
            position,
            orientation: wrap_degrees(orientation),
            duration,
            beats_per_step: beats_per_step.max(1),
            is_mark_time,
        }
    }

    pub fn position(&self) -> StepCoordinate {
        self.position
    }

    pub fn orientation(&self) -> f64 {
        self.orientation
    }

    pub fn is_mark_time(&self) -> bool {
        self.is_mark_time
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn beats_per_step(&self) -> u32 {
        self.beats_per_step
    }

    pub fn sample(&self, beat: f64) -> Option<AnimationState> {
        local_beat(beat, self.duration)?;
        Some(AnimationState::new(self.position, self.orientation))
    }

    fn text(&self) -> String {
        if self.is_mark_time {
            format!(
                "MT {} {}",
                steps_for(self.duration, self.beats_per_step),
                orientation_label(self.orientation)
            )
        } else {
            "Close".to_string()
        }
    }
}

/// Rotation about a fixed origin, as in a gate turn.
///
/// `degrees` is signed: positive turns clockwise (compass angles increase).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcCommand {
    start: StepCoordinate,
    origin: StepCoordinate,
    degrees: f64,
    duration: u32,
    beats_per_step: u32,
    radius: f64,
    start_angle: f64,
    end: StepCoordinate,
}

impl ArcCommand {
    pub fn new(
        start: StepCoordinate,
        origin: StepCoordinate,
        degrees: f64,
        duration: u32,
        beats_per_step: u32,
    ) -> Self {
        let (dx, dy) = origin.delta_to(&start);
        let radius = origin.distance(&start);
        let start_angle = direction_angle(dx, dy);
        let mut arc = Self {
            start,
            origin,
            degrees,
            duration,
            beats_per_step: beats_per_step.max(1),
            radius,
            start_angle,
            end: start,
        };
        if duration > 0 {
            arc.end = arc.point_at(1.0);
        }
        arc
    }

    pub fn start(&self) -> StepCoordinate {
        self.start
    }

    pub fn origin(&self) -> StepCoordinate {
        self.origin
    }

    pub fn end(&self) -> StepCoordinate {
        self.end
    }

    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn beats_per_step(&self) -> u32 {
        self.beats_per_step
    }

    fn point_at(&self, t: f64) -> StepCoordinate {
        let (ux, uy) = unit_vector(self.start_angle + self.degrees * t);
        self.origin
            .offset(ux * self.radius, uy * self.radius)
            .snapped()
    }

    /// Facing is tangent to the circle in the direction of rotation.
    fn facing_at(&self, position: &StepCoordinate) -> f64 {
        let (dx, dy) = position.delta_to(&self.origin);
        let inward = direction_angle(dx, dy);
        let turn = if self.degrees > 0.0 {
            1.0
        } else if self.degrees < 0.0 {
            -1.0
        } else {
            0.0
        };
        wrap_degrees(inward - turn * 90.0)
    }

    pub fn orientation(&self) -> f64 {
        self.facing_at(&self.start)
    }

    pub fn sample(&self, beat: f64) -> Option<AnimationState> {
        let b = local_beat(beat, self.duration)?;
        let position = if self.duration == 0 || b >= self.duration as f64 {
            self.end
        } else if b == 0.0 {
            self.start
        } else {
            self.point_at(b / self.duration as f64)
        };
        Some(AnimationState::new(position, self.facing_at(&position)))
    }

    fn text(&self) -> String {
        let turn = if self.degrees < 0.0 { "CCW" } else { "CW" };
        format!(
            "GT {turn} {} deg. ({} steps)",
            self.degrees.abs(),
            steps_for(self.duration, self.beats_per_step)
        )
    }
}

/// A single compiled movement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MovementCommand {
    Move(MoveCommand),
    Stop(StopCommand),
    Arc(ArcCommand),
}

impl From<MoveCommand> for MovementCommand {
    fn from(cmd: MoveCommand) -> Self {
        MovementCommand::Move(cmd)
    }
}

impl From<StopCommand> for MovementCommand {
    fn from(cmd: StopCommand) -> Self {
        MovementCommand::Stop(cmd)
    }
}

impl From<ArcCommand> for MovementCommand {
    fn from(cmd: ArcCommand) -> Self {
        MovementCommand::Arc(cmd)
    }
}

impl MovementCommand {
    pub fn start_position(&self) -> StepCoordinate {
        match self {
            MovementCommand::Move(m) => m.start,
            MovementCommand::Stop(s) => s.position,
            MovementCommand::Arc(a) => a.start,
        }
    }

    pub fn end_position(&self) -> StepCoordinate {
        match self {
            MovementCommand::Move(m) => m.end,
            MovementCommand::Stop(s) => s.position,
            MovementCommand::Arc(a) => a.end,
        }
    }

    /// Facing at the first beat.
    pub fn orientation(&self) -> f64 {
        match self {
            MovementCommand::Move(m) => m.orientation,
            MovementCommand::Stop(s) => s.orientation,
            MovementCommand::Arc(a) => a.orientation(),
        }
    }

    pub fn duration(&self) -> u32 {
        match self {
            MovementCommand::Move(m) => m.duration,
            MovementCommand::Stop(s) => s.duration,
            MovementCommand::Arc(a) => a.duration,
        }
    }

    pub fn beats_per_step(&self) -> u32 {
        match self {
            MovementCommand::Move(m) => m.beats_per_step,
            MovementCommand::Stop(s) => s.beats_per_step,
            MovementCommand::Arc(a) => a.beats_per_step,
        }
    }

    /// Length of the command in steps (`duration / beats_per_step`).
    pub fn steps(&self) -> f64 {
        steps_for(self.duration(), self.beats_per_step())
    }

    /// State at `beat` beats into this command, or `None` outside
    /// `[0, duration]`.
    pub fn sample(&self, beat: f64) -> Option<AnimationState> {
        match self {
            MovementCommand::Move(m) => m.sample(beat),
            MovementCommand::Stop(s) => s.sample(beat),
            MovementCommand::Arc(a) => a.sample(beat),
        }
    }

    /// Human-readable summary, e.g. "Move 4 E", "MT 4 E", "Close".
    pub fn continuity_text(&self) -> String {
        match self {
            MovementCommand::Move(m) => m.text(),
            MovementCommand::Stop(s) => s.text(),
            MovementCommand::Arc(a) => a.text(),
        }
    }
}
