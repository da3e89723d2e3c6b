//! Calchart compass math.
//!
//! Angles are in Calchart degrees: east 0, south 90, west 180, north 270,
//! increasing clockwise when the field is viewed with north up. In step space
//! (+x north, +y east) the unit vector for angle `a` is `(-sin a, cos a)`.

use serde::{Deserialize, Serialize};

/// Values closer than this to a whole number are treated as that number.
pub const SNAP_EPSILON: f64 = 1e-9;

/// Remove float noise around whole numbers (and turn `-0.0` into `0.0`).
#[inline]
pub fn snap(x: f64) -> f64 {
    let r = x.round();
    if (x - r).abs() < SNAP_EPSILON {
        r + 0.0
    } else {
        x
    }
}

/// Wrap an angle into `[0, 360)`.
pub fn wrap_degrees(angle: f64) -> f64 {
    let w = snap(angle.rem_euclid(360.0));
    if w >= 360.0 {
        w - 360.0
    } else {
        w
    }
}

/// Step-space unit vector `(dx, dy)` for an angle.
pub fn unit_vector(angle: f64) -> (f64, f64) {
    let rad = angle.to_radians();
    (snap(-rad.sin()), snap(rad.cos()))
}

/// Angle of travel for a step-space displacement, in `[0, 360)`.
/// A zero displacement faces east.
pub fn direction_angle(dx: f64, dy: f64) -> f64 {
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    wrap_degrees((-dx).atan2(dy).to_degrees())
}

/// Travel angle for a move along the x axis (north/south).
#[inline]
pub fn x_axis_angle(dx: f64) -> f64 {
    if dx < 0.0 {
        CardinalDirection::South.angle()
    } else {
        CardinalDirection::North.angle()
    }
}

/// Short label for a facing angle: "E", "SE", "S", ...
pub fn orientation_label(angle: f64) -> &'static str {
    CompoundDirection::from_angle(angle).label()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardinalDirection {
    East,
    South,
    West,
    North,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::East,
        CardinalDirection::South,
        CardinalDirection::West,
        CardinalDirection::North,
    ];

    pub fn angle(self) -> f64 {
        match self {
            CardinalDirection::East => 0.0,
            CardinalDirection::South => 90.0,
            CardinalDirection::West => 180.0,
            CardinalDirection::North => 270.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CardinalDirection::East => "E",
            CardinalDirection::South => "S",
            CardinalDirection::West => "W",
            CardinalDirection::North => "N",
        }
    }

    /// Nearest cardinal direction; exact diagonals round toward E/W.
    pub fn from_angle(angle: f64) -> Self {
        let a = wrap_degrees(angle);
        if a <= 45.0 || a >= 315.0 {
            CardinalDirection::East
        } else if a < 135.0 {
            CardinalDirection::South
        } else if a <= 225.0 {
            CardinalDirection::West
        } else {
            CardinalDirection::North
        }
    }
}

/// All eight directions. Exact multiples of 90 map to a cardinal direction,
/// everything else to the compound direction between its neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompoundDirection {
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    North,
    NorthEast,
}

impl CompoundDirection {
    pub fn from_angle(angle: f64) -> Self {
        let a = wrap_degrees(angle);
        if a == 0.0 {
            CompoundDirection::East
        } else if a < 90.0 {
            CompoundDirection::SouthEast
        } else if a == 90.0 {
            CompoundDirection::South
        } else if a < 180.0 {
            CompoundDirection::SouthWest
        } else if a == 180.0 {
            CompoundDirection::West
        } else if a < 270.0 {
            CompoundDirection::NorthWest
        } else if a == 270.0 {
            CompoundDirection::North
        } else {
            CompoundDirection::NorthEast
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CompoundDirection::East => "E",
            CompoundDirection::SouthEast => "SE",
            CompoundDirection::South => "S",
            CompoundDirection::SouthWest => "SW",
            CompoundDirection::West => "W",
            CompoundDirection::NorthWest => "NW",
            CompoundDirection::North => "N",
            CompoundDirection::NorthEast => "NE",
        }
    }
}

/// Facing override a continuity (or sheet, or show) can ask for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    East,
    West,
}

impl Orientation {
    pub fn angle(self) -> f64 {
        match self {
            Orientation::East => 0.0,
            Orientation::West => 180.0,
        }
    }

    pub fn label(self) -> &'static str {
        orientation_label(self.angle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_unit_vectors() {
        assert_eq!(unit_vector(0.0), (0.0, 1.0));
        assert_eq!(unit_vector(90.0), (-1.0, 0.0));
        assert_eq!(unit_vector(180.0), (0.0, -1.0));
        assert_eq!(unit_vector(270.0), (1.0, 0.0));
    }

    #[test]
    fn direction_angle_matches_axes() {
        assert_eq!(direction_angle(0.0, 3.0), 0.0);
        assert_eq!(direction_angle(-6.0, 0.0), 90.0);
        assert_eq!(direction_angle(0.0, -2.0), 180.0);
        assert_eq!(direction_angle(4.0, 0.0), 270.0);
        assert_eq!(direction_angle(-1.0, 1.0), 45.0);
        assert_eq!(direction_angle(0.0, 0.0), 0.0);
        assert_eq!(direction_angle(-6.0, 0.0), x_axis_angle(-6.0));
    }

    #[test]
    fn labels_follow_compass() {
        assert_eq!(orientation_label(0.0), "E");
        assert_eq!(orientation_label(45.0), "SE");
        assert_eq!(orientation_label(90.0), "S");
        assert_eq!(orientation_label(180.0), "W");
        assert_eq!(orientation_label(315.0), "NE");
        assert_eq!(orientation_label(360.0), "E");
        assert_eq!(Orientation::West.label(), "W");
    }

    #[test]
    fn cardinal_rounding() {
        assert_eq!(CardinalDirection::from_angle(10.0), CardinalDirection::East);
        assert_eq!(CardinalDirection::from_angle(100.0), CardinalDirection::South);
        assert_eq!(CardinalDirection::from_angle(200.0), CardinalDirection::West);
        assert_eq!(CardinalDirection::from_angle(-80.0), CardinalDirection::North);
    }

    #[test]
    fn snap_and_wrap() {
        assert_eq!(snap(2.0000000000001), 2.0);
        assert_eq!(snap(-0.0).to_bits(), 0.0f64.to_bits());
        assert_eq!(snap(2.5), 2.5);
        assert_eq!(wrap_degrees(-90.0), 270.0);
        assert_eq!(wrap_degrees(359.99999999999), 0.0);
    }
}
