use serde::{Deserialize, Serialize};

use crate::compass::{unit_vector, CardinalDirection};
use crate::error::ContinuityError;
use crate::ids::DotId;
use crate::movement::MoveStyle;

use super::path::march_leg;
use super::{Compile, CompileContext, Compiled, ContinuityOptions, SheetEnv};

/// March a fixed number of steps in one direction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForwardMarch {
    pub steps: u32,
    pub direction: CardinalDirection,
}

impl ForwardMarch {
    pub fn new(steps: u32, direction: CardinalDirection) -> Self {
        Self { steps, direction }
    }
}

impl Compile for ForwardMarch {
    fn compile(
        &self,
        _dot: &DotId,
        ctx: CompileContext,
        opts: &ContinuityOptions,
        _env: &SheetEnv<'_>,
    ) -> Result<Compiled, ContinuityError> {
        let mut out = Compiled::empty(ctx);
        let (ux, uy) = unit_vector(self.direction.angle());
        let steps = self.steps as f64;
        let target = ctx.position.offset(ux * steps, uy * steps);
        if let Some(leg) = march_leg(
            ctx.position,
            target,
            opts.facing,
            ctx.remaining,
            opts.beats_per_step,
            MoveStyle::March,
        ) {
            out.push(leg);
        }
        Ok(out)
    }
}
