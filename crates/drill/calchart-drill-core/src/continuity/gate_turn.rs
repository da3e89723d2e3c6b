use serde::{Deserialize, Serialize};

use crate::coordinate::StepCoordinate;
use crate::error::ContinuityError;
use crate::ids::DotId;
use crate::movement::ArcCommand;

use super::{Compile, CompileContext, Compiled, ContinuityOptions, SheetEnv};

/// Swing about a reference point for the rest of the sheet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateTurn {
    pub degrees: f64,
    #[serde(default = "clockwise_default")]
    pub clockwise: bool,
    pub reference: StepCoordinate,
}

fn clockwise_default() -> bool {
    true
}

impl GateTurn {
    pub fn new(degrees: f64, clockwise: bool, reference: StepCoordinate) -> Self {
        Self {
            degrees,
            clockwise,
            reference,
        }
    }

    /// Signed rotation, positive clockwise.
    pub fn signed_degrees(&self) -> f64 {
        if self.clockwise {
            self.degrees
        } else {
            -self.degrees
        }
    }
}

impl Compile for GateTurn {
    fn compile(
        &self,
        _dot: &DotId,
        ctx: CompileContext,
        opts: &ContinuityOptions,
        _env: &SheetEnv<'_>,
    ) -> Result<Compiled, ContinuityError> {
        let mut out = Compiled::empty(ctx);
        if ctx.remaining > 0 {
            out.push(ArcCommand::new(
                ctx.position,
                self.reference,
                self.signed_degrees(),
                ctx.remaining,
                opts.beats_per_step,
            ));
        }
        Ok(out)
    }
}
