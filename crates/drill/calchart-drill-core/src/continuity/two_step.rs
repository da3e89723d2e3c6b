use serde::{Deserialize, Serialize};

use crate::error::ContinuityError;
use crate::ids::DotId;
use crate::movement::StopCommand;

use super::{
    beats_for_steps, compile_continuities, Compile, CompileContext, Compiled, Continuity,
    ContinuityOptions, DotOrder, OrderedDots, SheetEnv,
};

/// Steps each dot waits per place in line.
pub const STEPS_PER_SLOT: u32 = 2;

/// Dots start the nested continuities one after another, two steps apart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoStep {
    pub order: DotOrder,
    #[serde(default)]
    pub continuities: Vec<Continuity>,
    #[serde(default = "mark_time_default")]
    pub is_mark_time: bool,
}

fn mark_time_default() -> bool {
    true
}

impl Default for TwoStep {
    fn default() -> Self {
        Self {
            order: DotOrder::default(),
            continuities: Vec::new(),
            is_mark_time: true,
        }
    }
}

impl TwoStep {
    pub fn new(order: impl Into<DotOrder>, continuities: Vec<Continuity>) -> Self {
        Self {
            order: order.into(),
            continuities,
            is_mark_time: true,
        }
    }
}

impl OrderedDots for TwoStep {
    fn order(&self) -> &DotOrder {
        &self.order
    }

    fn order_mut(&mut self) -> &mut DotOrder {
        &mut self.order
    }
}

impl Compile for TwoStep {
    fn compile(
        &self,
        dot: &DotId,
        ctx: CompileContext,
        opts: &ContinuityOptions,
        env: &SheetEnv<'_>,
    ) -> Result<Compiled, ContinuityError> {
        if self.order.is_empty() {
            return Err(ContinuityError::EmptyOrder {
                kind: "two".to_string(),
            });
        }
        let mut out = Compiled::empty(ctx);
        let wait_steps = self.order.slot_of(dot) as u32 * STEPS_PER_SLOT;
        let wait = beats_for_steps(wait_steps as f64, opts.beats_per_step).min(ctx.remaining);
        if wait > 0 {
            out.push(StopCommand::new(
                ctx.position,
                opts.orientation.angle(),
                wait,
                opts.beats_per_step,
                self.is_mark_time,
            ));
        }

        let nested = env.nested(opts)?;
        let inner = compile_continuities(&self.continuities, dot, out.context, &nested)?;
        out.extend(inner);
        Ok(out)
    }
}
