//! Farm field validation
//!
//! Lengths mirror the `farms` table: name and location up to 50 characters,
//! city up to 255. Lengths count characters, not bytes.

use once_cell::sync::Lazy;
use regex::Regex;

use ligtas_core::LocationCode;

use super::ValidationError;

const MAX_FARM_NAME_LEN: usize = 50;
const MAX_CITY_LEN: usize = 255;
const MAX_LOCATION_LEN: usize = 50;

static CONTROL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Cc}").expect("invalid control-char regex"));

/// Location codes are short identifiers like `Loc1`
static LOCATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("invalid location regex"));

fn check_text(field: &'static str, s: &str, max: usize) -> Result<(), ValidationError> {
    if s.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    if CONTROL_RE.is_match(s) {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must not contain control characters",
        });
    }
    Ok(())
}

/// Validated farm name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmName(String);

impl FarmName {
    /// Trimmed, non-empty, at most 50 characters, no control characters.
    ///
    /// ```
    /// use ligtas_server::models::FarmName;
    ///
    /// assert!(FarmName::new("Dela Cruz rice paddy").is_ok());
    /// assert!(FarmName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "farm_name" });
        }
        check_text("farm_name", s, MAX_FARM_NAME_LEN)?;
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Optional city; blank input means no city
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City(Option<String>);

impl City {
    pub fn new(s: Option<&str>) -> Result<Self, ValidationError> {
        match s.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(Self(None)),
            Some(s) => {
                check_text("city", s, MAX_CITY_LEN)?;
                Ok(Self(Some(s.to_owned())))
            }
        }
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Stored location text.
///
/// Any short identifier is stored; only codes in the baseline table get a
/// prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationField(String);

impl LocationField {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "location" });
        }
        if s.chars().count() > MAX_LOCATION_LEN {
            return Err(ValidationError::TooLong {
                field: "location",
                max: MAX_LOCATION_LEN,
            });
        }
        if !LOCATION_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "location",
                reason: "must be letters, digits, hyphens or underscores",
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Baseline table entry, if this is a surveyed location
    pub fn code(&self) -> Option<LocationCode> {
        self.0.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn farm_name_rules() {
        assert_eq!(FarmName::new("  Bukid ni Lola ").unwrap().as_str(), "Bukid ni Lola");
        assert_eq!(
            FarmName::new("").unwrap_err(),
            ValidationError::Empty { field: "farm_name" }
        );
        assert!(FarmName::new(&"a".repeat(50)).is_ok());
        assert!(matches!(
            FarmName::new(&"a".repeat(51)).unwrap_err(),
            ValidationError::TooLong { max: 50, .. }
        ));
        assert!(matches!(
            FarmName::new("north\u{0007}field").unwrap_err(),
            ValidationError::InvalidFormat { .. }
        ));
    }

    #[test]
    fn farm_name_counts_characters() {
        // 50 multi-byte characters fit
        assert!(FarmName::new(&"ñ".repeat(50)).is_ok());
    }

    #[test]
    fn city_is_optional() {
        assert_eq!(City::new(None).unwrap().as_deref(), None);
        assert_eq!(City::new(Some("   ")).unwrap().as_deref(), None);
        assert_eq!(City::new(Some(" Iloilo ")).unwrap().as_deref(), Some("Iloilo"));
        assert!(City::new(Some(&"c".repeat(256))).is_err());
    }

    #[test]
    fn location_rules() {
        let loc = LocationField::new("Loc3").unwrap();
        assert_eq!(loc.code(), Some(LocationCode::Loc3));

        let loc = LocationField::new("Loc9").unwrap();
        assert_eq!(loc.as_str(), "Loc9");
        assert_eq!(loc.code(), None);

        assert!(matches!(
            LocationField::new(" ").unwrap_err(),
            ValidationError::Empty { .. }
        ));
        assert!(matches!(
            LocationField::new("Loc 1").unwrap_err(),
            ValidationError::InvalidFormat { .. }
        ));
        assert!(LocationField::new(&"L".repeat(51)).is_err());
    }
}
