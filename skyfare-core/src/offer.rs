use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use uuid::Uuid;

use crate::iata::IataCode;
use crate::schedule::derive_arrival;
use crate::{CoreError, CoreResult};

/// Everything needed to build a [`FlightOffer`]. Arrival is not part of the
/// draft: it is always derived from departure plus duration.
#[derive(Debug, Clone)]
pub struct FlightOfferDraft {
    pub airline_name: String,
    pub flight_number: String,
    pub price: u64,
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub duration_minutes: u32,
    pub origin: IataCode,
    pub destination: IataCode,
    pub transfer_count: u32,
    pub aircraft_type: Option<String>,
    pub fare_class: Option<String>,
}

/// A priced itinerary candidate, ready for display. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct FlightOffer {
    id: Uuid,
    airline_name: String,
    flight_number: String,
    price: u64,
    departure_time: NaiveTime,
    arrival_time: NaiveTime,
    departure_date: NaiveDate,
    arrival_date: NaiveDate,
    duration_minutes: u32,
    origin: IataCode,
    destination: IataCode,
    transfer_count: u32,
    aircraft_type: Option<String>,
    fare_class: Option<String>,
}

impl FlightOffer {
    pub fn new(draft: FlightOfferDraft) -> CoreResult<Self> {
        if draft.airline_name.trim().is_empty() {
            return Err(CoreError::InconsistentOffer("airline name is empty".to_string()));
        }

        let (arrival_date, arrival_time) =
            derive_arrival(draft.departure_date, draft.departure_time, draft.duration_minutes);

        Ok(Self {
            id: Uuid::new_v4(),
            airline_name: draft.airline_name,
            flight_number: draft.flight_number,
            price: draft.price,
            departure_time: draft.departure_time,
            arrival_time,
            departure_date: draft.departure_date,
            arrival_date,
            duration_minutes: draft.duration_minutes,
            origin: draft.origin,
            destination: draft.destination,
            transfer_count: draft.transfer_count,
            aircraft_type: draft.aircraft_type,
            fare_class: draft.fare_class,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn airline_name(&self) -> &str {
        &self.airline_name
    }

    pub fn flight_number(&self) -> &str {
        &self.flight_number
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn departure_time(&self) -> NaiveTime {
        self.departure_time
    }

    pub fn arrival_time(&self) -> NaiveTime {
        self.arrival_time
    }

    pub fn departure_date(&self) -> NaiveDate {
        self.departure_date
    }

    pub fn arrival_date(&self) -> NaiveDate {
        self.arrival_date
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn origin(&self) -> &IataCode {
        &self.origin
    }

    pub fn destination(&self) -> &IataCode {
        &self.destination
    }

    pub fn transfer_count(&self) -> u32 {
        self.transfer_count
    }

    pub fn aircraft_type(&self) -> Option<&str> {
        self.aircraft_type.as_deref()
    }

    pub fn fare_class(&self) -> Option<&str> {
        self.fare_class.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> FlightOfferDraft {
        FlightOfferDraft {
            airline_name: "Aeroflot".to_string(),
            flight_number: "SU 6".to_string(),
            price: 5400,
            departure_date: NaiveDate::from_ymd_opt(2026, 10, 26).unwrap(),
            departure_time: NaiveTime::from_hms_opt(23, 10, 0).unwrap(),
            duration_minutes: 90,
            origin: IataCode::parse("SVO").unwrap(),
            destination: IataCode::parse("LED").unwrap(),
            transfer_count: 0,
            aircraft_type: None,
            fare_class: Some("Economy".to_string()),
        }
    }

    #[test]
    fn test_arrival_is_derived() {
        let offer = FlightOffer::new(draft()).unwrap();
        assert_eq!(offer.arrival_time(), NaiveTime::from_hms_opt(0, 40, 0).unwrap());
        assert_eq!(offer.arrival_date(), NaiveDate::from_ymd_opt(2026, 10, 27).unwrap());
        assert_eq!(offer.fare_class(), Some("Economy"));
        assert_eq!(offer.aircraft_type(), None);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = FlightOffer::new(draft()).unwrap();
        let b = FlightOffer::new(draft()).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_empty_airline_rejected() {
        let mut d = draft();
        d.airline_name = "  ".to_string();
        assert!(matches!(FlightOffer::new(d), Err(CoreError::InconsistentOffer(_))));
    }
}
