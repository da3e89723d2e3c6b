//! Dots that come too close to each other during a sheet.

use hashbrown::HashMap;
use indexmap::IndexMap;

use crate::ids::{DotId, SheetId};
use crate::state::AnimationState;
use crate::timeline::ShowTimeline;

/// Sheet-relative beats at which each dot is within the collision radius of
/// another dot. Dots without collisions are left out.
pub type SheetCollisions = IndexMap<DotId, Vec<u32>>;

fn too_close(a: &AnimationState, b: &AnimationState, radius: f64) -> bool {
    (a.x - b.x).abs() <= radius && (a.y - b.y).abs() <= radius
}

impl ShowTimeline {
    /// Check every whole beat of `sheet` (from its first beat up to, but not
    /// including, its last) for pairs of dots within `radius` steps on both
    /// axes.
    pub fn collisions(&self, sheet: SheetId, radius: f64) -> SheetCollisions {
        let Some(span) = self.sheet_span(sheet) else {
            return SheetCollisions::new();
        };
        let dots: Vec<&DotId> = self.dots().collect();
        let mut hits: HashMap<usize, Vec<u32>> = HashMap::new();

        for beat in 0..span.beats {
            let states: Vec<Option<AnimationState>> = dots
                .iter()
                .map(|dot| {
                    self.dot(dot)
                        .and_then(|t| t.segment(sheet))
                        .and_then(|s| s.state_at(beat as f64))
                })
                .collect();
            for i in 0..states.len() {
                let Some(a) = &states[i] else { continue };
                for (j, other) in states.iter().enumerate().skip(i + 1) {
                    let Some(b) = other else { continue };
                    if too_close(a, b, radius) {
                        for k in [i, j] {
                            let beats = hits.entry(k).or_default();
                            if beats.last() != Some(&beat) {
                                beats.push(beat);
                            }
                        }
                    }
                }
            }
        }

        let mut out = SheetCollisions::new();
        for (i, dot) in dots.into_iter().enumerate() {
            if let Some(beats) = hits.remove(&i) {
                out.insert(dot.clone(), beats);
            }
        }
        log::debug!("sheet {sheet}: {} dots collide", out.len());
        out
    }
}
