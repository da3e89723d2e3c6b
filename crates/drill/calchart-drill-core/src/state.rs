use serde::{Deserialize, Serialize};

use crate::coordinate::StepCoordinate;

/// Where a dot is and which way it faces at one beat.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    pub x: f64,
    pub y: f64,
    /// Facing in compass degrees.
    pub angle: f64,
}

impl AnimationState {
    pub fn new(position: StepCoordinate, angle: f64) -> Self {
        Self {
            x: position.x(),
            y: position.y(),
            angle,
        }
    }

    pub fn position(&self) -> StepCoordinate {
        StepCoordinate::new(self.x, self.y)
    }
}
