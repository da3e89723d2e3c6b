use serde::{Deserialize, Serialize};

use crate::coordinate::StepCoordinate;
use crate::error::ContinuityError;
use crate::ids::DotId;

use super::counter_march::order_positions;
use super::path::walk_route;
use super::{
    settle, Compile, CompileContext, Compiled, ContinuityOptions, DotOrder, Ending, OrderedDots,
    SheetEnv,
};

/// Every dot retraces the spots of the dots ahead of it, then the leader's
/// marked path.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowLeader {
    pub order: DotOrder,
    #[serde(default)]
    pub path: Vec<StepCoordinate>,
}

impl FollowLeader {
    pub fn new(order: impl Into<DotOrder>, path: Vec<StepCoordinate>) -> Self {
        Self {
            order: order.into(),
            path,
        }
    }
}

impl OrderedDots for FollowLeader {
    fn order(&self) -> &DotOrder {
        &self.order
    }

    fn order_mut(&mut self) -> &mut DotOrder {
        &mut self.order
    }
}

impl Compile for FollowLeader {
    fn compile(
        &self,
        dot: &DotId,
        ctx: CompileContext,
        opts: &ContinuityOptions,
        env: &SheetEnv<'_>,
    ) -> Result<Compiled, ContinuityError> {
        if self.order.is_empty() {
            return Err(ContinuityError::EmptyOrder {
                kind: "ftl".to_string(),
            });
        }
        let spots = order_positions(&self.order, env)?;
        let slot = self.order.slot_of(dot);
        let ahead = spots[..slot].iter().rev();

        let mut out = Compiled::empty(ctx);
        walk_route(
            &mut out,
            ahead.chain(self.path.iter()),
            opts.facing,
            opts.beats_per_step,
            ctx.remaining,
        );
        settle(&mut out, opts, Ending::MT);
        Ok(out)
    }
}
