//! Error types for drill compilation and show editing.

use serde::{Deserialize, Serialize};

use crate::dot_type::DotType;
use crate::ids::{DotId, SheetId};

/// A continuity that cannot produce movements for a dot.
///
/// Raised per dot and sheet; compilation of other dots and sheets carries on.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ContinuityError {
    /// The dot has no position on the sheet it is compiled against
    #[error("dot {dot} has no position on sheet {sheet}")]
    MissingPosition { dot: DotId, sheet: SheetId },

    /// An ordered continuity with nobody in its order
    #[error("{kind} continuity has an empty dot order")]
    EmptyOrder { kind: String },

    /// Nested continuities (two-step) recursed too far
    #[error("continuities nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Show-level parse, validation and edit errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DrillError {
    #[error("show parse error: {reason}")]
    Parse { reason: String },

    #[error("dot {dot} is defined more than once")]
    DuplicateDot { dot: DotId },

    #[error("sheet {sheet} is defined more than once")]
    DuplicateSheet { sheet: SheetId },

    #[error("unknown dot type '{name}'")]
    UnknownDotType { name: String },

    #[error("unknown dot {dot} referenced by {context}")]
    UnknownDot { dot: DotId, context: String },

    #[error("unknown sheet {sheet}")]
    UnknownSheet { sheet: SheetId },

    #[error("beats per step must be at least 1 (got {value})")]
    InvalidBeatsPerStep { value: u32 },

    #[error("sheet {sheet} has no continuity {index} for dot type {dot_type}")]
    NoSuchContinuity {
        sheet: SheetId,
        dot_type: DotType,
        index: usize,
    },

    #[error("continuity {label} on sheet {sheet} does not keep a dot order")]
    NotOrdered { sheet: SheetId, label: String },

    #[error("edit was opened on sheet {opened} but sheet {active} is active")]
    EditExpired { opened: SheetId, active: SheetId },
}

impl From<serde_json::Error> for DrillError {
    fn from(err: serde_json::Error) -> Self {
        DrillError::Parse {
            reason: err.to_string(),
        }
    }
}
