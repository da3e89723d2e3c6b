use serde::{Deserialize, Serialize};

use crate::compass::x_axis_angle;
use crate::error::ContinuityError;
use crate::ids::DotId;
use crate::movement::MoveStyle;

use super::path::march_leg;
use super::{settle, Compile, CompileContext, Compiled, ContinuityOptions, Ending, SheetEnv};

/// Slide north or south to the next spot's x, then hold.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Grapevine {
    #[serde(default)]
    pub end: Ending,
}

impl Grapevine {
    pub fn new(end: Ending) -> Self {
        Self { end }
    }
}

impl Compile for Grapevine {
    fn compile(
        &self,
        dot: &DotId,
        ctx: CompileContext,
        opts: &ContinuityOptions,
        env: &SheetEnv<'_>,
    ) -> Result<Compiled, ContinuityError> {
        let mut out = Compiled::empty(ctx);
        let Some(next) = env.next_position(dot) else {
            return Ok(out);
        };
        let delta_x = next.x() - ctx.position.x();
        if delta_x != 0.0 {
            let target = ctx.position.offset(delta_x, 0.0);
            if let Some(leg) = march_leg(
                ctx.position,
                target,
                Some(x_axis_angle(delta_x)),
                ctx.remaining,
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
