use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt::Write;

use skyfare_core::FlightOffer;

use crate::session::{SearchState, SearchStatus};

pub const NO_RESULTS_PLACEHOLDER: &str = "No flights found. Try different search parameters.";

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Printed after every amount, e.g. "₽".
    #[serde(default = "default_currency_suffix")]
    pub currency_suffix: String,
    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: char,
}

fn default_currency_suffix() -> String { "₽".to_string() }
fn default_thousands_separator() -> char { ' ' }

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_suffix: default_currency_suffix(),
            thousands_separator: default_thousands_separator(),
        }
    }
}

/// Sort by ascending price. Equal prices keep their input order.
pub fn rank(mut offers: Vec<FlightOffer>) -> Vec<FlightOffer> {
    offers.sort_by_key(|o| o.price());
    offers
}

pub fn format_duration(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

pub fn transfer_label(transfers: u32) -> String {
    match transfers {
        0 => "direct".to_string(),
        1 => "1 stop".to_string(),
        n => format!("{} stops", n),
    }
}

/// "Mon, 26 October"
pub fn format_date_label(date: NaiveDate) -> String {
    date.format("%a, %-d %B").to_string()
}

/// Renders offers and search state as plain text.
pub struct Presenter {
    config: DisplayConfig,
}

impl Presenter {
    pub fn new(config: DisplayConfig) -> Self {
        Self { config }
    }

    pub fn format_price(&self, amount: u64) -> String {
        let digits = amount.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(self.config.thousands_separator);
            }
            grouped.push(c);
        }
        format!("{} {}", grouped, self.config.currency_suffix)
    }

    /// Summary card: airline, price, times, airports, duration, transfers.
    pub fn render_card(&self, offer: &FlightOffer) -> String {
        let day_shift = (offer.arrival_date() - offer.departure_date()).num_days();
        let arrival_suffix = if day_shift > 0 {
            format!(" (+{})", day_shift)
        } else {
            String::new()
        };

        let mut card = String::new();
        let _ = writeln!(card, "{} · {}", offer.airline_name(), self.format_price(offer.price()));
        let _ = writeln!(
            card,
            "  {} {} → {}{} {}  {}",
            offer.departure_time().format("%H:%M"),
            offer.origin(),
            offer.arrival_time().format("%H:%M"),
            arrival_suffix,
            offer.destination(),
            format_duration(offer.duration_minutes()),
        );
        let _ = write!(
            card,
            "  {} · {}",
            format_date_label(offer.departure_date()),
            transfer_label(offer.transfer_count())
        );
        card
    }

    /// Full record for one offer, including the return date when searching a round trip.
    pub fn render_details(&self, offer: &FlightOffer, return_date: Option<NaiveDate>) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Flight {} · {}", offer.flight_number(), offer.airline_name());
        let _ = writeln!(out, "  Offer id:    {}", offer.id());
        let _ = writeln!(out, "  Route:       {} → {}", offer.origin(), offer.destination());
        let _ = writeln!(
            out,
            "  Departure:   {} {}",
            offer.departure_date().format("%Y-%m-%d"),
            offer.departure_time().format("%H:%M")
        );
        let _ = writeln!(
            out,
            "  Arrival:     {} {}",
            offer.arrival_date().format("%Y-%m-%d"),
            offer.arrival_time().format("%H:%M")
        );
        let _ = writeln!(out, "  Duration:    {}", format_duration(offer.duration_minutes()));
        let _ = writeln!(out, "  Transfers:   {}", transfer_label(offer.transfer_count()));
        let _ = writeln!(out, "  Aircraft:    {}", offer.aircraft_type().unwrap_or("not specified"));
        let _ = writeln!(out, "  Fare class:  {}", offer.fare_class().unwrap_or("not specified"));
        if let Some(ret) = return_date {
            let _ = writeln!(out, "  Return date: {}", ret.format("%Y-%m-%d"));
        }
        let _ = write!(out, "  Price:       {}", self.format_price(offer.price()));
        out
    }

    /// Count line, optional advisory, then one numbered card per offer in the
    /// order given. An empty slice renders the placeholder instead.
    pub fn render_results(&self, offers: &[FlightOffer], advisory: Option<&str>) -> String {
        let mut out = String::new();
        let noun = if offers.len() == 1 { "flight" } else { "flights" };
        let _ = writeln!(out, "Found: {} {}", offers.len(), noun);
        if let Some(advisory) = advisory {
            let _ = writeln!(out, "! {}", advisory);
        }

        if offers.is_empty() {
            out.push_str(NO_RESULTS_PLACEHOLDER);
            return out;
        }

        let cards: Vec<String> = offers
            .iter()
            .enumerate()
            .map(|(i, offer)| format!("[{}] {}", i + 1, self.render_card(offer)))
            .collect();
        out.push_str(&cards.join("\n\n"));
        out
    }

    pub fn render_state(&self, state: &SearchState) -> String {
        match &state.status {
            SearchStatus::Idle => "Enter origin, destination and departure date to search.".to_string(),
            SearchStatus::Searching => "Searching...".to_string(),
            SearchStatus::Error(message) => format!("Error: {}", message),
            SearchStatus::Results | SearchStatus::Empty => {
                self.render_results(&state.offers, state.advisory.as_deref())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use skyfare_core::{FlightOfferDraft, IataCode};

    fn offer(airline: &str, price: u64, dep: (u32, u32), minutes: u32) -> FlightOffer {
        FlightOffer::new(FlightOfferDraft {
            airline_name: airline.to_string(),
            flight_number: "SU 1".to_string(),
            price,
            departure_date: NaiveDate::from_ymd_opt(2026, 10, 26).unwrap(),
            departure_time: NaiveTime::from_hms_opt(dep.0, dep.1, 0).unwrap(),
            duration_minutes: minutes,
            origin: IataCode::parse("SVO").unwrap(),
            destination: IataCode::parse("LED").unwrap(),
            transfer_count: 0,
            aircraft_type: Some("Airbus A320".to_string()),
            fare_class: None,
        })
        .unwrap()
    }

    fn presenter() -> Presenter {
        Presenter::new(DisplayConfig::default())
    }

    #[test]
    fn test_rank_is_stable_ascending() {
        let offers = vec![
            offer("A", 5000, (8, 0), 60),
            offer("B", 3000, (9, 0), 60),
            offer("C", 5000, (10, 0), 60),
            offer("D", 1000, (11, 0), 60),
            offer("E", 3000, (12, 0), 60),
        ];
        let names: Vec<String> = rank(offers).iter().map(|o| o.airline_name().to_string()).collect();
        assert_eq!(names, ["D", "B", "E", "A", "C"]);
    }

    #[test]
    fn test_rank_any_permutation_is_sorted() {
        let prices = [700u64, 100, 400, 400, 0, 9_999, 250];
        for shift in 0..prices.len() {
            let mut rotated = prices.to_vec();
            rotated.rotate_left(shift);
            let offers = rotated.iter().map(|p| offer("X", *p, (8, 0), 60)).collect();
            let ranked = rank(offers);
            assert!(ranked.windows(2).all(|w| w[0].price() <= w[1].price()));
        }
    }

    #[test]
    fn test_formatting_helpers() {
        let p = presenter();
        assert_eq!(p.format_price(0), "0 ₽");
        assert_eq!(p.format_price(999), "999 ₽");
        assert_eq!(p.format_price(12_345), "12 345 ₽");
        assert_eq!(p.format_price(1_234_567), "1 234 567 ₽");

        assert_eq!(format_duration(135), "2h 15m");
        assert_eq!(format_duration(45), "0h 45m");

        assert_eq!(transfer_label(0), "direct");
        assert_eq!(transfer_label(1), "1 stop");
        assert_eq!(transfer_label(3), "3 stops");

        assert_eq!(format_date_label(NaiveDate::from_ymd_opt(2026, 10, 26).unwrap()), "Mon, 26 October");
    }

    #[test]
    fn test_card_shows_day_shift() {
        let card = presenter().render_card(&offer("Aeroflot", 4200, (23, 10), 90));
        assert!(card.contains("Aeroflot · 4 200 ₽"));
        assert!(card.contains("23:10 SVO → 00:40 (+1) LED  1h 30m"));
        assert!(card.contains("direct"));
    }

    #[test]
    fn test_details_include_optional_fields() {
        let o = offer("Aeroflot", 4200, (8, 0), 135);
        let details = presenter().render_details(&o, NaiveDate::from_ymd_opt(2026, 11, 2));
        assert!(details.contains("Aircraft:    Airbus A320"));
        assert!(details.contains("Fare class:  not specified"));
        assert!(details.contains("Arrival:     2026-10-26 10:15"));
        assert!(details.contains("Return date: 2026-11-02"));

        let one_way = presenter().render_details(&o, None);
        assert!(!one_way.contains("Return date"));
    }

    #[test]
    fn test_empty_results_render_placeholder() {
        let out = presenter().render_results(&[], None);
        assert!(out.contains(NO_RESULTS_PLACEHOLDER));
        assert!(out.starts_with("Found: 0 flights"));
        assert!(!out.contains("[1]"));
    }

    #[test]
    fn test_results_with_advisory() {
        let offers = vec![offer("A", 100, (8, 0), 60), offer("B", 200, (9, 0), 60)];
        let out = presenter().render_results(&offers, Some("synthetic"));
        assert!(out.contains("Found: 2 flights"));
        assert!(out.contains("! synthetic"));
        assert!(out.contains("[1] A"));
        assert!(out.contains("[2] B"));
    }
}
