//! Continuities: declarative per-dot-type instructions that compile into
//! movement commands for each dot on a sheet.
//!
//! Compilation threads a [`CompileContext`] by value through every continuity
//! of a dot type. Each continuity returns the commands it produced together
//! with the updated context, so the caller always owns the next hand-off.

mod counter_march;
mod diagonal;
mod even;
mod follow_leader;
mod forward;
mod fountain;
mod gate_turn;
mod grapevine;
mod order;
mod path;
mod stop;
mod two_step;

pub use counter_march::CounterMarch;
pub use diagonal::{Diagonal, DiagonalOrder};
pub use even::Even;
pub use follow_leader::FollowLeader;
pub use forward::ForwardMarch;
pub use fountain::{Fountain, FountainOrder};
pub use gate_turn::GateTurn;
pub use grapevine::Grapevine;
pub use order::{DotOrder, OrderedDots};
pub use stop::Stop;
pub use two_step::TwoStep;

use serde::{Deserialize, Serialize};

use crate::compass::{snap, Orientation};
use crate::coordinate::StepCoordinate;
use crate::dot_type::DotType;
use crate::error::ContinuityError;
use crate::ids::{ContinuityId, DotId, SheetId};
use crate::movement::{MovementCommand, StopCommand};
use crate::show::{SheetDefaults, ShowModel};

/// Deepest allowed chain of continuities nested inside two-steps.
pub const MAX_NESTING: usize = 8;

/// Position and beat budget handed from one continuity to the next.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompileContext {
    pub position: StepCoordinate,
    pub remaining: u32,
}

impl CompileContext {
    pub fn new(position: StepCoordinate, remaining: u32) -> Self {
        Self {
            position,
            remaining,
        }
    }

    /// Context after `cmd` has run.
    pub fn after(self, cmd: &MovementCommand) -> Self {
        Self {
            position: cmd.end_position(),
            remaining: self.remaining.saturating_sub(cmd.duration()),
        }
    }
}

/// Commands produced by one or more continuities, plus the context that
/// follows them.
#[derive(Clone, Debug, PartialEq)]
pub struct Compiled {
    pub commands: Vec<MovementCommand>,
    pub context: CompileContext,
}

impl Compiled {
    pub fn empty(context: CompileContext) -> Self {
        Self {
            commands: Vec::new(),
            context,
        }
    }

    pub fn push(&mut self, cmd: impl Into<MovementCommand>) {
        let cmd = cmd.into();
        self.context = self.context.after(&cmd);
        self.commands.push(cmd);
    }

    /// Append commands that were compiled starting from `self.context`.
    pub fn extend(&mut self, other: Compiled) {
        self.commands.extend(other.commands);
        self.context = other.context;
    }

    pub fn beats(&self) -> u32 {
        self.commands.iter().map(MovementCommand::duration).sum()
    }
}

/// Read-only view of the show a continuity is compiled against.
#[derive(Clone, Copy)]
pub struct SheetEnv<'a> {
    pub model: &'a dyn ShowModel,
    pub sheet: SheetId,
    pub defaults: SheetDefaults,
    depth: usize,
}

impl<'a> SheetEnv<'a> {
    pub fn new(model: &'a dyn ShowModel, sheet: SheetId) -> Self {
        Self {
            model,
            sheet,
            defaults: model.sheet_defaults(sheet),
            depth: 0,
        }
    }

    /// Where `dot` stands at the start of this sheet.
    pub fn position_of(&self, dot: &DotId) -> Option<StepCoordinate> {
        self.model.position_in_sheet(self.sheet, dot)
    }

    /// Where `dot` stands at the start of the following sheet.
    pub fn next_position(&self, dot: &DotId) -> Option<StepCoordinate> {
        let next = self.model.next_sheet(self.sheet)?;
        self.model.position_in_sheet(next, dot)
    }

    /// Environment for continuities nested inside another one. Nested
    /// continuities inherit the parent's resolved options as defaults.
    pub fn nested(&self, parent: &ContinuityOptions) -> Result<SheetEnv<'a>, ContinuityError> {
        if self.depth >= MAX_NESTING {
            return Err(ContinuityError::NestingTooDeep { limit: MAX_NESTING });
        }
        Ok(SheetEnv {
            model: self.model,
            sheet: self.sheet,
            defaults: SheetDefaults {
                beats_per_step: parent.beats_per_step,
                orientation: parent.orientation,
            },
            depth: self.depth + 1,
        })
    }
}

/// Options of one continuity after resolving overrides.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContinuityOptions {
    pub beats_per_step: u32,
    pub orientation: Orientation,
    /// Facing the continuity itself asked for, if any. Moves without one
    /// face their direction of travel.
    pub facing: Option<f64>,
}

impl ContinuityOptions {
    pub fn resolve(continuity: &Continuity, defaults: SheetDefaults) -> Self {
        Self {
            beats_per_step: continuity
                .beats_per_step
                .unwrap_or(defaults.beats_per_step)
                .max(1),
            orientation: continuity.orientation.unwrap_or(defaults.orientation),
            facing: continuity.orientation.map(Orientation::angle),
        }
    }
}

/// How a dot finishes once it reaches its spot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ending {
    /// Mark time.
    #[default]
    MT,
    /// Close.
    CL,
}

impl Ending {
    pub fn is_mark_time(self) -> bool {
        matches!(self, Ending::MT)
    }
}

/// Behaviour shared by every continuity kind.
pub trait Compile {
    fn compile(
        &self,
        dot: &DotId,
        ctx: CompileContext,
        opts: &ContinuityOptions,
        env: &SheetEnv<'_>,
    ) -> Result<Compiled, ContinuityError>;
}

/// Beats needed to march `steps` steps.
pub fn beats_for_steps(steps: f64, beats_per_step: u32) -> u32 {
    snap(steps.abs() * beats_per_step.max(1) as f64).ceil() as u32
}

/// Stand still for whatever is left of the sheet.
pub(crate) fn settle(compiled: &mut Compiled, opts: &ContinuityOptions, ending: Ending) {
    let ctx = compiled.context;
    if ctx.remaining > 0 {
        compiled.push(StopCommand::new(
            ctx.position,
            opts.orientation.angle(),
            ctx.remaining,
            opts.beats_per_step,
            ending.is_mark_time(),
        ));
    }
}

/// Run `continuities` in order for `dot`, feeding each the context the
/// previous one left behind.
pub fn compile_continuities(
    continuities: &[Continuity],
    dot: &DotId,
    ctx: CompileContext,
    env: &SheetEnv<'_>,
) -> Result<Compiled, ContinuityError> {
    let mut out = Compiled::empty(ctx);
    for continuity in continuities {
        let next = continuity.get_movements(dot, out.context, env)?;
        out.extend(next);
    }
    Ok(out)
}

/// The closed set of continuity kinds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContinuityKind {
    #[serde(rename = "stop")]
    Stop(Stop),
    #[serde(rename = "fm")]
    ForwardMarch(ForwardMarch),
    #[serde(rename = "even")]
    Even(Even),
    #[serde(rename = "fountain")]
    Fountain(Fountain),
    #[serde(rename = "diagonal")]
    Diagonal(Diagonal),
    #[serde(rename = "gv")]
    Grapevine(Grapevine),
    #[serde(rename = "gate")]
    GateTurn(GateTurn),
    #[serde(rename = "cm")]
    CounterMarch(CounterMarch),
    #[serde(rename = "ftl")]
    FollowLeader(FollowLeader),
    #[serde(rename = "two")]
    TwoStep(TwoStep),
}

/// One continuity for a dot type on a sheet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Continuity {
    #[serde(default = "ContinuityId::generate")]
    pub id: ContinuityId,
    #[serde(default)]
    pub dot_type: DotType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beats_per_step: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(flatten)]
    pub kind: ContinuityKind,
}

impl Continuity {
    pub fn new(dot_type: DotType, kind: impl Into<ContinuityKind>) -> Self {
        Self {
            id: ContinuityId::generate(),
            dot_type,
            beats_per_step: None,
            orientation: None,
            kind: kind.into(),
        }
    }

    pub fn with_beats_per_step(mut self, beats_per_step: u32) -> Self {
        self.beats_per_step = Some(beats_per_step);
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Short name as shown in the continuity panel.
    pub fn label(&self) -> &'static str {
        match &self.kind {
            ContinuityKind::Stop(s) if s.is_mark_time => "mt",
            ContinuityKind::Stop(_) => "close",
            ContinuityKind::ForwardMarch(_) => "fm",
            ContinuityKind::Even(_) => "even",
            ContinuityKind::Fountain(f) => f.along.label(),
            ContinuityKind::Diagonal(d) => d.along.label(),
            ContinuityKind::Grapevine(_) => "gv",
            ContinuityKind::GateTurn(_) => "gate",
            ContinuityKind::CounterMarch(_) => "cm",
            ContinuityKind::FollowLeader(_) => "ftl",
            ContinuityKind::TwoStep(_) => "two",
        }
    }

    /// Compile this continuity for `dot`. Consumes at most `ctx.remaining`
    /// beats.
    pub fn get_movements(
        &self,
        dot: &DotId,
        ctx: CompileContext,
        env: &SheetEnv<'_>,
    ) -> Result<Compiled, ContinuityError> {
        let opts = ContinuityOptions::resolve(self, env.defaults);
        let kind: &dyn Compile = match &self.kind {
            ContinuityKind::Stop(k) => k,
            ContinuityKind::ForwardMarch(k) => k,
            ContinuityKind::Even(k) => k,
            ContinuityKind::Fountain(k) => k,
            ContinuityKind::Diagonal(k) => k,
            ContinuityKind::Grapevine(k) => k,
            ContinuityKind::GateTurn(k) => k,
            ContinuityKind::CounterMarch(k) => k,
            ContinuityKind::FollowLeader(k) => k,
            ContinuityKind::TwoStep(k) => k,
        };
        kind.compile(dot, ctx, &opts, env)
    }

    pub fn ordered(&self) -> Option<&dyn OrderedDots> {
        match &self.kind {
            ContinuityKind::CounterMarch(k) => Some(k),
            ContinuityKind::FollowLeader(k) => Some(k),
            ContinuityKind::TwoStep(k) => Some(k),
            _ => None,
        }
    }

    pub fn ordered_mut(&mut self) -> Option<&mut dyn OrderedDots> {
        match &mut self.kind {
            ContinuityKind::CounterMarch(k) => Some(k),
            ContinuityKind::FollowLeader(k) => Some(k),
            ContinuityKind::TwoStep(k) => Some(k),
            _ => None,
        }
    }

    /// Visit this continuity and every continuity nested inside it.
    pub fn walk<'c>(&'c self, visit: &mut dyn FnMut(&'c Continuity)) {
        visit(self);
        if let ContinuityKind::TwoStep(two) = &self.kind {
            for nested in &two.continuities {
                nested.walk(visit);
            }
        }
    }
}

macro_rules! kind_from {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ContinuityKind {
                fn from(kind: $ty) -> Self {
                    ContinuityKind::$variant(kind)
                }
            }
        )*
    };
}

kind_from! {
    Stop => Stop,
    ForwardMarch => ForwardMarch,
    Even => Even,
    Fountain => Fountain,
    Diagonal => Diagonal,
    Grapevine => Grapevine,
    GateTurn => GateTurn,
    CounterMarch => CounterMarch,
    FollowLeader => FollowLeader,
    TwoStep => TwoStep,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beats_for_steps_rounds_up() {
        assert_eq!(beats_for_steps(6.0, 1), 6);
        assert_eq!(beats_for_steps(-6.0, 2), 12);
        assert_eq!(beats_for_steps(2.5, 1), 3);
        assert_eq!(beats_for_steps(0.1 + 0.2, 10), 3);
    }

    #[test]
    fn overrides_beat_sheet_defaults() {
        let defaults = SheetDefaults {
            beats_per_step: 2,
            orientation: Orientation::West,
        };
        let plain = Continuity::new(DotType::Plain, Even::default());
        let opts = ContinuityOptions::resolve(&plain, defaults);
        assert_eq!(opts.beats_per_step, 2);
        assert_eq!(opts.orientation, Orientation::West);
        assert_eq!(opts.facing, None);

        let custom = plain
            .with_beats_per_step(1)
            .with_orientation(Orientation::East);
        let opts = ContinuityOptions::resolve(&custom, defaults);
        assert_eq!(opts.beats_per_step, 1);
        assert_eq!(opts.facing, Some(0.0));
    }

    #[test]
    fn serde_uses_short_tags() {
        let c = Continuity::new(DotType::SolidX, Grapevine::default()).with_beats_per_step(2);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["type"], "gv");
        assert_eq!(json["dotType"], "solid-x");
        assert_eq!(json["beatsPerStep"], 2);
        assert!(json.get("orientation").is_none());
        let back: Continuity = serde_json::from_value(json).unwrap();
        assert_eq!(back, c);
    }
}
