//! Per-location baseline soil measurements
//!
//! Five surveyed locations, each with a fixed nine-value baseline in the same
//! order as the user-supplied measurements.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LigtasError;

/// Measurement names, in vector order
pub const BASELINE_FIELDS: [&str; 9] = ["rainfall", "H", "Zn", "Mn", "Fe", "Cu", "P", "Na", "N"];

/// Surveyed location code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationCode {
    Loc1,
    Loc2,
    Loc3,
    Loc4,
    Loc5,
}

impl LocationCode {
    /// All location codes in table order
    pub fn all() -> [LocationCode; 5] {
        [Self::Loc1, Self::Loc2, Self::Loc3, Self::Loc4, Self::Loc5]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loc1 => "Loc1",
            Self::Loc2 => "Loc2",
            Self::Loc3 => "Loc3",
            Self::Loc4 => "Loc4",
            Self::Loc5 => "Loc5",
        }
    }

    /// Baseline values for this location: rainfall, H, Zn, Mn, Fe, Cu, P, Na, N
    pub fn baseline(&self) -> &'static [f64; 9] {
        match self {
            Self::Loc1 => &[38.45, 0.119, 0.154, 0.137, 0.149, 0.124, 0.210, 0.008, 0.150],
            Self::Loc2 => &[96.07, 0.110, 0.183, 0.118, 0.039, 0.191, 0.120, 0.006, 0.018],
            Self::Loc3 => &[74.19, 0.005, 0.057, 0.066, 0.200, 0.028, 0.166, 0.170, 0.055],
            Self::Loc4 => &[60.86, 0.078, 0.143, 0.001, 0.141, 0.029, 0.100, 0.073, 0.178],
            Self::Loc5 => &[16.60, 0.087, 0.131, 0.114, 0.036, 0.128, 0.144, 0.183, 0.121],
        }
    }

    /// Baseline paired with field names
    pub fn named_baseline(&self) -> impl Iterator<Item = (&'static str, f64)> {
        BASELINE_FIELDS
            .iter()
            .copied()
            .zip(self.baseline().iter().copied())
    }
}

impl fmt::Display for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationCode {
    type Err = LigtasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Loc1" => Ok(Self::Loc1),
            "Loc2" => Ok(Self::Loc2),
            "Loc3" => Ok(Self::Loc3),
            "Loc4" => Ok(Self::Loc4),
            "Loc5" => Ok(Self::Loc5),
            other => Err(LigtasError::UnknownLocation {
                code: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_codes() {
        for code in LocationCode::all() {
            let parsed: LocationCode = code.as_str().parse().unwrap();
            assert_eq!(parsed, code);
        }
        assert_eq!(" Loc3 ".parse::<LocationCode>().unwrap(), LocationCode::Loc3);
    }

    #[test]
    fn rejects_unknown_codes() {
        let err = "loc1".parse::<LocationCode>().unwrap_err();
        assert!(matches!(err, LigtasError::UnknownLocation { code } if code == "loc1"));
        assert!("Loc6".parse::<LocationCode>().is_err());
        assert!("".parse::<LocationCode>().is_err());
    }

    #[test]
    fn baseline_rows() {
        assert_eq!(LocationCode::Loc1.baseline()[0], 38.45);
        assert_eq!(LocationCode::Loc2.baseline()[8], 0.018);
        assert_eq!(LocationCode::Loc5.baseline()[7], 0.183);

        let named: Vec<_> = LocationCode::Loc4.named_baseline().collect();
        assert_eq!(named.len(), 9);
        assert_eq!(named[0], ("rainfall", 60.86));
        assert_eq!(named[3], ("Mn", 0.001));
    }

    #[test]
    fn serializes_as_code_string() {
        let json = serde_json::to_string(&LocationCode::Loc2).unwrap();
        assert_eq!(json, "\"Loc2\"");
    }
}
