use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::iata::IataCode;

/// Form input as typed by the user, before any checks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSearchInput {
    pub origin: String,
    pub destination: String,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
}

/// A validated search. Only constructed through [`SearchQuery::parse`] or
/// [`SearchQuery::new`], so every instance satisfies the date and code rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    origin: IataCode,
    destination: IataCode,
    departure_date: NaiveDate,
    return_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Origin and destination airports are required")]
    MissingAirport,
    #[error("Airport codes must be exactly 3 letters, got '{0}'")]
    InvalidAirportCode(String),
    #[error("Departure date is required")]
    MissingDate,
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Departure date {0} is in the past")]
    DateInPast(NaiveDate),
    #[error("Return date {ret} is before departure date {departure}")]
    ReturnBeforeDeparture { departure: NaiveDate, ret: NaiveDate },
}

impl SearchQuery {
    pub fn new(
        origin: IataCode,
        destination: IataCode,
        departure_date: NaiveDate,
        return_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        if departure_date < today {
            return Err(ValidationError::DateInPast(departure_date));
        }
        if let Some(ret) = return_date {
            if ret < departure_date {
                return Err(ValidationError::ReturnBeforeDeparture {
                    departure: departure_date,
                    ret,
                });
            }
        }
        Ok(Self {
            origin,
            destination,
            departure_date,
            return_date,
        })
    }

    /// Validate raw form input against `today`.
    pub fn parse(raw: &RawSearchInput, today: NaiveDate) -> Result<Self, ValidationError> {
        if raw.origin.trim().is_empty() || raw.destination.trim().is_empty() {
            return Err(ValidationError::MissingAirport);
        }
        let origin = IataCode::parse(&raw.origin)?;
        let destination = IataCode::parse(&raw.destination)?;

        let departure = raw
            .departure_date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::MissingDate)?;
        let departure_date = parse_date(departure)?;

        let return_date = match raw.return_date.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => Some(parse_date(s)?),
            _ => None,
        };

        Self::new(origin, destination, departure_date, return_date, today)
    }

    pub fn origin(&self) -> &IataCode {
        &self.origin
    }

    pub fn destination(&self) -> &IataCode {
        &self.destination
    }

    pub fn departure_date(&self) -> NaiveDate {
        self.departure_date
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn raw(origin: &str, destination: &str, date: Option<&str>) -> RawSearchInput {
        RawSearchInput {
            origin: origin.to_string(),
            destination: destination.to_string(),
            departure_date: date.map(str::to_string),
            return_date: None,
        }
    }

    #[test]
    fn test_valid_query() {
        let query = SearchQuery::parse(&raw("svo", " led", Some("2026-10-26")), today()).unwrap();
        assert_eq!(query.origin().as_str(), "SVO");
        assert_eq!(query.destination().as_str(), "LED");
        assert_eq!(query.departure_date(), NaiveDate::from_ymd_opt(2026, 10, 26).unwrap());
        assert_eq!(query.return_date(), None);
    }

    #[test]
    fn test_today_is_allowed() {
        assert!(SearchQuery::parse(&raw("SVO", "LED", Some("2026-10-19")), today()).is_ok());
    }

    #[test]
    fn test_past_date_rejected() {
        let err = SearchQuery::parse(&raw("SVO", "LED", Some("2026-10-18")), today()).unwrap_err();
        assert_eq!(err, ValidationError::DateInPast(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()));
    }

    #[test]
    fn test_two_letter_origin_rejected() {
        let err = SearchQuery::parse(&raw("MO", "LED", Some("2026-10-26")), today()).unwrap_err();
        assert_eq!(err, ValidationError::InvalidAirportCode("MO".to_string()));
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(
            SearchQuery::parse(&raw("", "LED", Some("2026-10-26")), today()).unwrap_err(),
            ValidationError::MissingAirport
        );
        assert_eq!(
            SearchQuery::parse(&raw("SVO", "LED", None), today()).unwrap_err(),
            ValidationError::MissingDate
        );
        assert_eq!(
            SearchQuery::parse(&raw("SVO", "LED", Some("26.10.2026")), today()).unwrap_err(),
            ValidationError::InvalidDate("26.10.2026".to_string())
        );
    }

    #[test]
    fn test_return_date_ordering() {
        let mut input = raw("SVO", "LED", Some("2026-10-26"));
        input.return_date = Some("2026-10-25".to_string());
        assert!(matches!(
            SearchQuery::parse(&input, today()),
            Err(ValidationError::ReturnBeforeDeparture { .. })
        ));

        input.return_date = Some("2026-11-02".to_string());
        let query = SearchQuery::parse(&input, today()).unwrap();
        assert_eq!(query.return_date(), NaiveDate::from_ymd_opt(2026, 11, 2));
    }
}
