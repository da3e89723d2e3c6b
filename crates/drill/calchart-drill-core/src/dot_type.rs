use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DrillError;

/// Symbol drawn for a dot. Declaration order is display order.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum DotType {
    #[default]
    Plain,
    Solid,
    PlainForwardslash,
    SolidForwardslash,
    PlainBackslash,
    SolidBackslash,
    PlainX,
    SolidX,
}

/// Which slash strokes a dot symbol carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Slashes {
    pub forward: bool,
    pub back: bool,
}

impl DotType {
    pub const ALL: [DotType; 8] = [
        DotType::Plain,
        DotType::Solid,
        DotType::PlainForwardslash,
        DotType::SolidForwardslash,
        DotType::PlainBackslash,
        DotType::SolidBackslash,
        DotType::PlainX,
        DotType::SolidX,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DotType::Plain => "plain",
            DotType::Solid => "solid",
            DotType::PlainForwardslash => "plain-forwardslash",
            DotType::SolidForwardslash => "solid-forwardslash",
            DotType::PlainBackslash => "plain-backslash",
            DotType::SolidBackslash => "solid-backslash",
            DotType::PlainX => "plain-x",
            DotType::SolidX => "solid-x",
        }
    }

    pub fn is_plain(self) -> bool {
        matches!(
            self,
            DotType::Plain | DotType::PlainForwardslash | DotType::PlainBackslash | DotType::PlainX
        )
    }

    pub fn slashes(self) -> Slashes {
        match self {
            DotType::Plain | DotType::Solid => Slashes::default(),
            DotType::PlainForwardslash | DotType::SolidForwardslash => Slashes {
                forward: true,
                back: false,
            },
            DotType::PlainBackslash | DotType::SolidBackslash => Slashes {
                forward: false,
                back: true,
            },
            DotType::PlainX | DotType::SolidX => Slashes {
                forward: true,
                back: true,
            },
        }
    }

    /// Distinct dot types from `types`, in display order.
    pub fn sort(types: impl IntoIterator<Item = DotType>) -> Vec<DotType> {
        let mut out: Vec<DotType> = types.into_iter().collect();
        out.sort();
        out.dedup();
        out
    }
}

impl fmt::Display for DotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DotType {
    type Err = DrillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DotType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DrillError::UnknownDotType {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_is_declaration_order() {
        let mixed = [DotType::SolidX, DotType::Plain, DotType::SolidX, DotType::Solid];
        let sorted = DotType::sort(mixed);
        assert_eq!(sorted, vec![DotType::Plain, DotType::Solid, DotType::SolidX]);
    }

    #[test]
    fn slashes_and_plainness() {
        assert!(DotType::PlainX.is_plain());
        assert!(!DotType::SolidBackslash.is_plain());
        assert_eq!(
            DotType::SolidX.slashes(),
            Slashes {
                forward: true,
                back: true
            }
        );
        assert!(!DotType::Solid.slashes().forward);
    }

    #[test]
    fn names_round_trip() {
        for t in DotType::ALL {
            assert_eq!(t.to_string().parse::<DotType>().unwrap(), t);
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
        assert_eq!(
            "striped".parse::<DotType>(),
            Err(DrillError::UnknownDotType {
                name: "striped".to_string()
            })
        );
    }
}
