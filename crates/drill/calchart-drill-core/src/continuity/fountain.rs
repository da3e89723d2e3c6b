use serde::{Deserialize, Serialize};

use crate::error::ContinuityError;
use crate::ids::DotId;
use crate::movement::MoveStyle;

use super::path::march_leg;
use super::{settle, Compile, CompileContext, Compiled, ContinuityOptions, Ending, SheetEnv};

/// Which axis a fountain grid covers first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FountainOrder {
    /// East/west first, then north/south.
    #[default]
    EWNS,
    /// North/south first, then east/west.
    NSEW,
}

impl FountainOrder {
    pub fn label(self) -> &'static str {
        match self {
            FountainOrder::EWNS => "EWNS",
            FountainOrder::NSEW => "NSEW",
        }
    }
}

/// Reach the next spot along the grid, one axis at a time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Fountain {
    #[serde(default)]
    pub along: FountainOrder,
    #[serde(default)]
    pub end: Ending,
}

impl Fountain {
    pub fn new(along: FountainOrder, end: Ending) -> Self {
        Self { along, end }
    }
}

impl Compile for Fountain {
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
        let corner = match self.along {
            FountainOrder::EWNS => start.offset(0.0, end.y() - start.y()),
            FountainOrder::NSEW => start.offset(end.x() - start.x(), 0.0),
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
