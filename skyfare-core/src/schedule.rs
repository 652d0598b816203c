use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Block time assumed when a provider reports departure only.
pub const NOMINAL_FLIGHT_MINUTES: u32 = 120;

/// Arrival date and time for a departure plus `duration_minutes`.
/// Times past midnight wrap and roll the date forward.
pub fn derive_arrival(
    departure_date: NaiveDate,
    departure_time: NaiveTime,
    duration_minutes: u32,
) -> (NaiveDate, NaiveTime) {
    let arrival = NaiveDateTime::new(departure_date, departure_time)
        + Duration::minutes(i64::from(duration_minutes));
    (arrival.date(), arrival.time())
}

/// Whole minutes from departure to arrival, or `None` if arrival is not later.
pub fn minutes_between(departure: NaiveDateTime, arrival: NaiveDateTime) -> Option<u32> {
    let minutes = (arrival - departure).num_minutes();
    if minutes <= 0 {
        return None;
    }
    u32::try_from(minutes).ok()
}
