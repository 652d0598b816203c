use chrono::NaiveTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::sync::Mutex;

use skyfare_core::iata::known_airlines;
use skyfare_core::{FlightOffer, FlightOfferDraft, SearchQuery};

const AIRCRAFT_TYPES: &[&str] = &[
    "Airbus A320",
    "Airbus A321neo",
    "Boeing 737-800",
    "Boeing 777-300ER",
    "Sukhoi Superjet 100",
];

const FARE_CLASSES: &[&str] = &["Economy", "Economy Flex", "Comfort", "Business"];

/// Shortest and longest sampled block time, in minutes.
const DURATION_RANGE: (u32, u32) = (50, 420);

/// Sampled fares, in tens of currency units.
const PRICE_RANGE: (u64, u64) = (250, 2_800);

/// Flights at least this long are generated with one stop.
const CONNECTING_FROM_MINUTES: u32 = 300;

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_min_offers")]
    pub min_offers: usize,
    #[serde(default = "default_max_offers")]
    pub max_offers: usize,
    /// Fixed seed for reproducible output. Entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_enabled() -> bool { true }
fn default_min_offers() -> usize { 3 }
fn default_max_offers() -> usize { 6 }

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            min_offers: default_min_offers(),
            max_offers: default_max_offers(),
            seed: None,
        }
    }
}

/// Synthesizes plausible offers when no live prices are available.
pub struct OfferGenerator {
    rng: Mutex<StdRng>,
    min_offers: usize,
    max_offers: usize,
}

impl OfferGenerator {
    pub fn new(config: &GenerationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let min_offers = config.min_offers.max(1);
        Self {
            rng: Mutex::new(rng),
            min_offers,
            max_offers: config.max_offers.max(min_offers),
        }
    }

    /// Generate between `min_offers` and `max_offers` offers departing on the
    /// query's date. Each field is sampled independently.
    pub fn generate(&self, query: &SearchQuery) -> Vec<FlightOffer> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let count = rng.gen_range(self.min_offers..=self.max_offers);

        let mut offers = Vec::with_capacity(count);
        for _ in 0..count {
            let draft = sample_draft(&mut *rng, query);
            match FlightOffer::new(draft) {
                Ok(offer) => offers.push(offer),
                Err(e) => tracing::warn!("Discarding generated offer: {}", e),
            }
        }

        tracing::debug!(
            "Generated {} offers for {} -> {} on {}",
            offers.len(),
            query.origin(),
            query.destination(),
            query.departure_date()
        );
        offers
    }
}

fn sample_draft<R: Rng>(rng: &mut R, query: &SearchQuery) -> FlightOfferDraft {
    let airlines = known_airlines();
    let (code, name) = airlines[rng.gen_range(0..airlines.len())];

    let hour = rng.gen_range(0..24);
    let minute = rng.gen_range(0..12) * 5;
    let departure_time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);

    let duration_minutes = rng.gen_range(DURATION_RANGE.0 / 5..=DURATION_RANGE.1 / 5) * 5;
    let price = rng.gen_range(PRICE_RANGE.0..=PRICE_RANGE.1) * 10;

    let aircraft = AIRCRAFT_TYPES[rng.gen_range(0..AIRCRAFT_TYPES.len())];
    let fare_class = FARE_CLASSES[rng.gen_range(0..FARE_CLASSES.len())];
    let number: u32 = rng.gen_range(100..=9999);

    FlightOfferDraft {
        airline_name: name.to_string(),
        flight_number: format!("{} {}", code, number),
        price,
        departure_date: query.departure_date(),
        departure_time,
        duration_minutes,
        origin: query.origin().clone(),
        destination: query.destination().clone(),
        transfer_count: u32::from(duration_minutes >= CONNECTING_FROM_MINUTES),
        aircraft_type: Some(aircraft.to_string()),
        fare_class: Some(fare_class.to_string()),
    }
}
