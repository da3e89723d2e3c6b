use serde::{Deserialize, Serialize};

use crate::error::ContinuityError;
use crate::ids::DotId;
use crate::movement::StopCommand;

use super::{Compile, CompileContext, Compiled, ContinuityOptions, SheetEnv};

/// Stand in place, marking time or closed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    #[serde(default = "mark_time_default")]
    pub is_mark_time: bool,
    /// Beats to hold; `None` holds for the rest of the sheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

fn mark_time_default() -> bool {
    true
}

impl Stop {
    pub fn mark_time() -> Self {
        Self {
            is_mark_time: true,
            duration: None,
        }
    }

    pub fn close() -> Self {
        Self {
            is_mark_time: false,
            duration: None,
        }
    }

    pub fn for_beats(mut self, beats: u32) -> Self {
        self.duration = Some(beats);
        self
    }
}

impl Default for Stop {
    fn default() -> Self {
        Self::mark_time()
    }
}

impl Compile for Stop {
    fn compile(
        &self,
        _dot: &DotId,
        ctx: CompileContext,
        opts: &ContinuityOptions,
        _env: &SheetEnv<'_>,
    ) -> Result<Compiled, ContinuityError> {
        let mut out = Compiled::empty(ctx);
        let beats = self.duration.map_or(ctx.remaining, |d| d.min(ctx.remaining));
        if beats > 0 {
            out.push(StopCommand::new(
                ctx.position,
                opts.orientation.angle(),
                beats,
                opts.beats_per_step,
                self.is_mark_time,
            ));
        }
        Ok(out)
    }
}
