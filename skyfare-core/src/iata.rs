use serde::{Deserialize, Serialize};
use std::fmt;

use crate::search::ValidationError;

// ============================================================================
// Airport codes
// ============================================================================

/// A three-letter IATA airport code, always upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IataCode(String);

impl IataCode {
    /// Trims and upper-cases `raw`, then checks it is exactly three ASCII letters.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let code = raw.trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err(ValidationError::MissingAirport);
        }
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidAirportCode(code));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IataCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for IataCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<IataCode> for String {
    fn from(code: IataCode) -> Self {
        code.0
    }
}

// ============================================================================
// Airline directory
// ============================================================================

const AIRLINES: &[(&str, &str)] = &[
    ("UT", "UTair"),
    ("SU", "Aeroflot"),
    ("S7", "S7 Airlines"),
    ("U6", "Ural Airlines"),
    ("DP", "Pobeda Airlines"),
    ("FV", "Rossiya Airlines"),
    ("D2", "Severstal Air"),
];

/// Display name for a carrier code. Unknown codes are returned unchanged.
pub fn airline_display_name(code: &str) -> String {
    AIRLINES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code.trim()))
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| code.to_string())
}

/// All known `(code, name)` pairs, in directory order.
pub fn known_airlines() -> &'static [(&'static str, &'static str)] {
    AIRLINES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_normalized() {
        let code = IataCode::parse("  svo ").unwrap();
        assert_eq!(code.as_str(), "SVO");
    }

    #[test]
    fn test_code_length_enforced() {
        assert!(matches!(
            IataCode::parse("MO"),
            Err(ValidationError::InvalidAirportCode(c)) if c == "MO"
        ));
        assert!(matches!(IataCode::parse("LEDX"), Err(ValidationError::InvalidAirportCode(_))));
        assert!(matches!(IataCode::parse("L3D"), Err(ValidationError::InvalidAirportCode(_))));
        assert!(matches!(IataCode::parse("   "), Err(ValidationError::MissingAirport)));
    }

    #[test]
    fn test_code_deserialization_validates() {
        let code: IataCode = serde_json::from_str("\"led\"").unwrap();
        assert_eq!(code.to_string(), "LED");
        assert!(serde_json::from_str::<IataCode>("\"LE\"").is_err());
    }

    #[test]
    fn test_airline_lookup() {
        assert_eq!(airline_display_name("SU"), "Aeroflot");
        assert_eq!(airline_display_name("dp"), "Pobeda Airlines");
        assert_eq!(airline_display_name("ZZ"), "ZZ");
    }
}
