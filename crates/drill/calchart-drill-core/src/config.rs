//! Compile-time options for turning a show into a timeline.

use serde::{Deserialize, Serialize};

/// Knobs for `compile_show`. Every field has a default so hosts can pass a
/// partial JSON object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Pad a sheet whose continuities leave beats unused with a closing stop.
    pub pad_unused_beats: bool,

    /// Warn when a dot does not finish a sheet on its next-sheet spot.
    pub check_formation: bool,
    pub formation_tolerance: f64,

    /// Compute per-sheet collisions while compiling.
    pub detect_collisions: bool,
    /// Two dots collide when within this many steps on both axes.
    pub collision_radius: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pad_unused_beats: true,
            check_formation: true,
            formation_tolerance: 1e-6,
            detect_collisions: false,
            collision_radius: 1.0,
        }
    }
}
