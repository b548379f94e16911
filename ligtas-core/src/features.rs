//! User measurements and model feature assembly
//!
//! The classifier reads 18 values: the location's nine baseline entries
//! followed by the nine values submitted for the farm.

use serde::Serialize;

use crate::error::{LigtasError, Result};
use crate::location::LocationCode;

/// Number of slots the classifier reads
pub const FEATURE_COUNT: usize = 18;

/// Form field names for user measurements, in vector order
pub const MEASUREMENT_FIELDS: [&str; 9] = [
    "rainfall_val",
    "H_val",
    "Zn_val",
    "Mn_val",
    "Fe_val",
    "Cu_val",
    "P_val",
    "Na_val",
    "N_val",
];

/// Feature names in vector order (baseline entries first)
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "loc_rainfall",
    "loc_H",
    "loc_Zn",
    "loc_Mn",
    "loc_Fe",
    "loc_Cu",
    "loc_P",
    "loc_Na",
    "loc_N",
    "rainfall",
    "H",
    "Zn",
    "Mn",
    "Fe",
    "Cu",
    "P",
    "Na",
    "N",
];

/// Parse one submitted measurement.
///
/// Missing or blank input counts as zero. Anything else must be a finite number.
pub fn parse_measurement(field: &'static str, raw: Option<&str>) -> Result<f64> {
    let text = match raw.map(str::trim) {
        None | Some("") => return Ok(0.0),
        Some(t) => t,
    };

    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(LigtasError::InvalidMeasurement {
            field,
            value: text.to_owned(),
        }),
    }
}

/// Soil measurements submitted for a farm
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Measurements {
    pub rainfall: f64,
    pub h: f64,
    pub zn: f64,
    pub mn: f64,
    pub fe: f64,
    pub cu: f64,
    pub p: f64,
    pub na: f64,
    pub n: f64,
}

impl Measurements {
    /// Build from values in vector order
    pub fn from_array(v: [f64; 9]) -> Self {
        Self {
            rainfall: v[0],
            h: v[1],
            zn: v[2],
            mn: v[3],
            fe: v[4],
            cu: v[5],
            p: v[6],
            na: v[7],
            n: v[8],
        }
    }

    /// Parse every measurement field through `lookup`, keyed by form field name.
    pub fn from_fields<'a, F>(lookup: F) -> Result<Self>
    where
        F: Fn(&'static str) -> Option<&'a str>,
    {
        let mut values = [0.0; 9];
        for (slot, field) in values.iter_mut().zip(MEASUREMENT_FIELDS) {
            *slot = parse_measurement(field, lookup(field))?;
        }
        Ok(Self::from_array(values))
    }

    pub fn to_array(&self) -> [f64; 9] {
        [
            self.rainfall,
            self.h,
            self.zn,
            self.mn,
            self.fe,
            self.cu,
            self.p,
            self.na,
            self.n,
        ]
    }
}

/// Model input: baseline ++ measurements
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn assemble(location: LocationCode, measurements: &Measurements) -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        let (base, user) = values.split_at_mut(9);
        base.copy_from_slice(location.baseline());
        user.copy_from_slice(&measurements.to_array());
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Values paired with their feature names
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn blank_and_missing_are_zero() {
        assert_eq!(parse_measurement("H_val", None).unwrap(), 0.0);
        assert_eq!(parse_measurement("H_val", Some("")).unwrap(), 0.0);
        assert_eq!(parse_measurement("H_val", Some("   ")).unwrap(), 0.0);
    }

    #[test]
    fn parses_numbers() {
        assert_eq!(parse_measurement("Zn_val", Some("0.25")).unwrap(), 0.25);
        assert_eq!(parse_measurement("Zn_val", Some(" 12 ")).unwrap(), 12.0);
        assert_eq!(parse_measurement("Zn_val", Some("-1e-3")).unwrap(), -0.001);
    }

    #[test]
    fn rejects_garbage_and_non_finite() {
        for bad in ["abc", "1,5", "NaN", "inf", "-infinity"] {
            let err = parse_measurement("Fe_val", Some(bad)).unwrap_err();
            assert!(
                matches!(err, LigtasError::InvalidMeasurement { field: "Fe_val", .. }),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn from_fields_reads_every_slot() {
        let form: HashMap<&str, &str> = MEASUREMENT_FIELDS
            .iter()
            .zip(["100", "1", "2", "3", "4", "5", "6", "7", "8"])
            .map(|(k, v)| (*k, v))
            .collect();

        let m = Measurements::from_fields(|f| form.get(f).copied()).unwrap();
        assert_eq!(m.rainfall, 100.0);
        assert_eq!(m.h, 1.0);
        assert_eq!(m.n, 8.0);
        assert_eq!(m.to_array(), [100.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn from_fields_reports_offending_field() {
        let err = Measurements::from_fields(|f| (f == "Na_val").then_some("salty")).unwrap_err();
        assert!(matches!(err, LigtasError::InvalidMeasurement { field: "Na_val", .. }));
    }

    #[test]
    fn assemble_concatenates_baseline_then_measurements() {
        let m = Measurements::from_array([80.0, 0.05, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.3]);
        let v = FeatureVector::assemble(LocationCode::Loc1, &m);

        assert_eq!(v.as_slice().len(), FEATURE_COUNT);
        assert_eq!(&v.as_slice()[..9], LocationCode::Loc1.baseline());
        assert_eq!(v.as_slice()[9], 80.0);
        assert_eq!(v.as_slice()[10], 0.05);
        assert_eq!(v.as_slice()[17], 0.3);

        let named: Vec<_> = v.named().collect();
        assert_eq!(named[0], ("loc_rainfall", 38.45));
        assert_eq!(named[10], ("H", 0.05));
    }

    #[test]
    fn feature_vector_serializes_as_list() {
        let v = FeatureVector::assemble(LocationCode::Loc5, &Measurements::default());
        let json = serde_json::to_value(v).unwrap();
        assert_eq!(json.as_array().unwrap().len(), FEATURE_COUNT);
    }
}
