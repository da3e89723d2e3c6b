use serde::{Deserialize, Serialize};

use crate::error::ContinuityError;
use crate::ids::DotId;
use crate::movement::{MoveCommand, MoveStyle};

use super::{Compile, CompileContext, Compiled, ContinuityOptions, SheetEnv};

/// Move in a straight line to the next sheet's spot using every beat left.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Even {}

impl Compile for Even {
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
        if ctx.remaining == 0 {
            return Ok(out);
        }
        out.push(MoveCommand::new(
            ctx.position,
            end,
            opts.facing,
            ctx.remaining,
            opts.beats_per_step,
            MoveStyle::Even,
        ));
        Ok(out)
    }
}
