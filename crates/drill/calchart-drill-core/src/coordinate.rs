//! Field coordinates.
//!
//! Step space is the space continuities and movements work in: `x` counts steps
//! from the south end zone (north is +x) and `y` counts steps from the west
//! sideline (east is +y). Pixel space belongs to the renderer. The space is a
//! type parameter so the two never mix without an explicit conversion.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::compass::snap;

/// Marker for positions measured in marching steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Step;

/// Marker for positions measured in screen pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Coordinate<S> {
    x: f64,
    y: f64,
    #[serde(skip)]
    space: PhantomData<S>,
}

pub type StepCoordinate = Coordinate<Step>;
pub type PixelCoordinate = Coordinate<Pixel>;

impl<S> Coordinate<S> {
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            space: PhantomData,
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// New coordinate shifted by `(dx, dy)` in the same space.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// `(other.x - self.x, other.y - self.y)`.
    pub fn delta_to(&self, other: &Self) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }

    pub fn distance(&self, other: &Self) -> f64 {
        let (dx, dy) = self.delta_to(other);
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation; `t == 0` yields `self` exactly.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Same coordinate with float noise around whole numbers removed.
    pub fn snapped(&self) -> Self {
        Self::new(snap(self.x), snap(self.y))
    }

    /// True when both axes agree within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_structural() {
        assert_eq!(StepCoordinate::new(1.5, -2.0), StepCoordinate::new(1.5, -2.0));
        assert_ne!(StepCoordinate::new(1.5, -2.0), StepCoordinate::new(1.5, 2.0));
    }

    #[test]
    fn serde_keeps_fields_exact() {
        let c = StepCoordinate::new(0.1 + 0.2, -7.25);
        let text = serde_json::to_string(&c).unwrap();
        assert_eq!(text, r#"{"x":0.30000000000000004,"y":-7.25}"#);
        let back: StepCoordinate = serde_json::from_str(&text).unwrap();
        assert_eq!(back.x().to_bits(), c.x().to_bits());
        assert_eq!(back.y().to_bits(), c.y().to_bits());
    }

    #[test]
    fn lerp_endpoints() {
        let a = StepCoordinate::new(10.0, 5.0);
        let b = StepCoordinate::new(4.0, 5.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 0.5), StepCoordinate::new(7.0, 5.0));
        assert_eq!(a.distance(&b), 6.0);
    }
}
