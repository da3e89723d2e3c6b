use serde::{Deserialize, Serialize};

use crate::coordinate::StepCoordinate;
use crate::error::ContinuityError;
use crate::ids::DotId;
use crate::movement::{MoveStyle, StopCommand};

use super::path::march_leg;
use super::{
    Compile, CompileContext, Compiled, ContinuityOptions, DotOrder, OrderedDots, SheetEnv,
};

/// Dots file along the loop formed by their own spots, each one heading for
/// the spot of the dot after it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterMarch {
    pub order: DotOrder,
    /// Beats to march; `None` marches for the rest of the sheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl CounterMarch {
    pub fn new(order: impl Into<DotOrder>) -> Self {
        Self {
            order: order.into(),
            duration: None,
        }
    }

    pub fn for_beats(mut self, beats: u32) -> Self {
        self.duration = Some(beats);
        self
    }
}

impl OrderedDots for CounterMarch {
    fn order(&self) -> &DotOrder {
        &self.order
    }

    fn order_mut(&mut self) -> &mut DotOrder {
        &mut self.order
    }
}

/// Sheet positions of every dot in `order`.
pub(super) fn order_positions(
    order: &DotOrder,
    env: &SheetEnv<'_>,
) -> Result<Vec<StepCoordinate>, ContinuityError> {
    order
        .get_order()
        .iter()
        .map(|d| {
            env.position_of(d)
                .ok_or_else(|| ContinuityError::MissingPosition {
                    dot: d.clone(),
                    sheet: env.sheet,
                })
        })
        .collect()
}

impl Compile for CounterMarch {
    fn compile(
        &self,
        dot: &DotId,
        ctx: CompileContext,
        opts: &ContinuityOptions,
        env: &SheetEnv<'_>,
    ) -> Result<Compiled, ContinuityError> {
        if self.order.is_empty() {
            return Err(ContinuityError::EmptyOrder {
                kind: "cm".to_string(),
            });
        }
        let mut out = Compiled::empty(ctx);
        let mut budget = self
            .duration
            .map_or(ctx.remaining, |d| d.min(ctx.remaining));
        if budget == 0 {
            return Ok(out);
        }

        let spots = order_positions(&self.order, env)?;
        let n = spots.len();
        let first = match self.order.index_of(dot) {
            Some(i) => i + 1,
            None => 0,
        };

        // A full lap of spots without moving means the loop has no length.
        let mut idle = 0;
        let mut k = 0;
        while budget > 0 && idle < n {
            let target = spots[(first + k) % n];
            k += 1;
            match march_leg(
                out.context.position,
                target,
                opts.facing,
                budget,
                opts.beats_per_step,
                MoveStyle::March,
            ) {
                Some(leg) => {
                    budget -= leg.duration();
                    idle = 0;
                    out.push(leg);
                }
                None => idle += 1,
            }
        }
        if budget > 0 {
            out.push(StopCommand::new(
                out.context.position,
                opts.orientation.angle(),
                budget,
                opts.beats_per_step,
                true,
            ));
        }
        Ok(out)
    }
}
