use serde::{Deserialize, Serialize};

use crate::error::ContinuityError;
use crate::ids::DotId;
use crate::movement::MoveStyle;

use super::path::march_leg;
use super::{settle, Compile, CompileContext, Compiled, ContinuityOptions, Ending, SheetEnv};

/// Whether the diagonal leg comes before or after the straight one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagonalOrder {
    /// Diagonal march, then high step.
    #[default]
    DMHS,
    /// High step, then diagonal march.
    HSDM,
}

impl DiagonalOrder {
    pub fn label(self) -> &'static str {
        match self {
            DiagonalOrder::DMHS => "DMHS",
            DiagonalOrder::HSDM => "HSDM",
        }
    }
}

/// Reach the next spot with one 45-degree leg and one straight leg.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagonal {
    #[serde(default)]
    pub along: DiagonalOrder,
    #[serde(default)]
    pub end: Ending,
}

impl Diagonal {
    pub fn new(along: DiagonalOrder, end: Ending) -> Self {
        Self { along, end }
    }
}

impl Compile for Diagonal {
    fn compile(
        &self,
        dot: &DotId,
        ctx: CompileContext,
        opts: &ContinuityOptions,
        env: &SheetEnv<'_>,
    ) -> Result<Compiled, ContinuityError> {
        let mut out = Compiled::empty(ctx);
        let Some(end) = env.next_position(dot) else {
            return Ok(out);
        };
        let start = ctx.position;
        let (dx, dy) = start.delta_to(&end);
        let n = dx.abs().min(dy.abs());
        let (diag_x, diag_y) = (n * dx.signum(), n * dy.signum());
        let corner = match self.along {
            DiagonalOrder::DMHS => start.offset(diag_x, diag_y),
            DiagonalOrder::HSDM => end.offset(-diag_x, -diag_y),
        };
        for target in [corner, end] {
            let from = out.context.position;
            if let Some(leg) = march_leg(
                from,
                target,
                None,
                out.context.remaining,
                opts.beats_per_step,
                MoveStyle::March,
            ) {
                out.push(leg);
            }
        }
        settle(&mut out, opts, self.end);
        Ok(out)
    }
}
