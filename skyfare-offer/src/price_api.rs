use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use skyfare_core::schedule::{minutes_between, NOMINAL_FLIGHT_MINUTES};
use skyfare_core::{airline_display_name, FlightOffer, FlightOfferDraft, SearchQuery};

use crate::provider::{OfferProvider, ProviderError};

/// One configured pricing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    pub name: String,
    pub url: String,
}

/// Client for a Travelpayouts-style "cheapest prices" endpoint, either called
/// directly or through a proxy that forwards the same JSON.
pub struct PriceApiProvider {
    name: String,
    url: String,
    token: Option<String>,
    currency: String,
    client: reqwest::Client,
}

impl PriceApiProvider {
    pub fn new(
        endpoint: &EndpointConfig,
        token: Option<String>,
        currency: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("cannot build client for {}: {}", endpoint.name, e)))?;
        Ok(Self {
            name: endpoint.name.clone(),
            url: endpoint.url.clone(),
            token,
            currency: currency.to_string(),
            client,
        })
    }
}

#[async_trait]
impl OfferProvider for PriceApiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_offers(&self, query: &SearchQuery) -> Result<Vec<FlightOffer>, ProviderError> {
        let departure_date = query.departure_date().format("%Y-%m-%d").to_string();
        let mut params = vec![
            ("origin", query.origin().as_str().to_string()),
            ("destination", query.destination().as_str().to_string()),
            ("departure_date", departure_date.clone()),
            // Name used by Travelpayouts and the local proxy.
            ("depart_date", departure_date),
            ("currency", self.currency.clone()),
        ];
        if let Some(token) = &self.token {
            params.push(("token", token.clone()));
        }

        tracing::debug!("Querying {} at {}", self.name, self.url);
        let resp = self
            .client
            .get(&self.url)
            .query(&params)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !resp.status().is_success() {
            return Err(ProviderError::Status(resp.status().as_u16()));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        normalize_payload(&body, query)
    }
}

fn map_transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Network(err.to_string())
    }
}

// ============================================================================
// Payload normalization
// ============================================================================

#[derive(Debug, Deserialize)]
struct PricesResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct PriceEntry {
    airline: String,
    price: f64,
    departure_at: String,
    #[serde(default)]
    arrival_at: Option<String>,
    #[serde(default)]
    duration: Option<u32>,
    #[serde(default)]
    flight_number: Option<Value>,
    #[serde(default, alias = "number_of_changes")]
    transfers: Option<u32>,
}

/// Turn a provider body into offers for the query's departure date.
///
/// `data` may be a flat list of entries or a map keyed by destination code
/// whose value is a list or a map of entries. Entries that cannot be read are
/// skipped; a body that is not a price response at all is an error.
pub fn normalize_payload(body: &Value, query: &SearchQuery) -> Result<Vec<FlightOffer>, ProviderError> {
    let response: PricesResponse =
        serde_json::from_value(body.clone()).map_err(|e| ProviderError::Malformed(e.to_string()))?;

    if let Some(error) = response.error.filter(|e| !e.trim().is_empty()) {
        return Err(ProviderError::Rejected(error));
    }
    if response.success == Some(false) {
        return Err(ProviderError::Rejected(
            response.message.unwrap_or_else(|| "unknown error".to_string()),
        ));
    }

    let entries = entries_for_destination(&response.data, query.destination().as_str())?;

    let mut offers = Vec::new();
    for raw in entries {
        let entry: PriceEntry = match serde_json::from_value(raw.clone()) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable price entry: {}", e);
                continue;
            }
        };
        match entry_to_offer(entry, query) {
            Ok(Some(offer)) => offers.push(offer),
            Ok(None) => {}
            Err(e) => tracing::warn!("Skipping price entry: {}", e),
        }
    }

    Ok(offers)
}

fn entries_for_destination<'a>(data: &'a Value, destination: &str) -> Result<Vec<&'a Value>, ProviderError> {
    match data {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items.iter().collect()),
        Value::Object(map) => match map.get(destination) {
            Some(Value::Array(items)) => Ok(items.iter().collect()),
            Some(Value::Object(by_index)) => Ok(by_index.values().collect()),
            Some(other) => Err(ProviderError::Malformed(format!(
                "unexpected entry set for {}: {}",
                destination, other
            ))),
            None => Ok(Vec::new()),
        },
        other => Err(ProviderError::Malformed(format!("unexpected data field: {}", other))),
    }
}

fn entry_to_offer(entry: PriceEntry, query: &SearchQuery) -> Result<Option<FlightOffer>, ProviderError> {
    let departure = parse_timestamp(&entry.departure_at)
        .ok_or_else(|| ProviderError::Malformed(format!("bad departure_at '{}'", entry.departure_at)))?;

    // Providers may answer with a wider date window than requested.
    if departure.date() != query.departure_date() {
        return Ok(None);
    }

    if !entry.price.is_finite() || entry.price < 0.0 {
        return Err(ProviderError::Malformed(format!("bad price {}", entry.price)));
    }

    let duration_minutes = entry
        .arrival_at
        .as_deref()
        .and_then(parse_timestamp)
        .and_then(|arrival| minutes_between(departure, arrival))
        .or(entry.duration.filter(|d| *d > 0))
        .unwrap_or(NOMINAL_FLIGHT_MINUTES);

    let code = entry.airline.trim().to_string();
    let flight_number = match entry.flight_number {
        Some(Value::Number(n)) => format!("{} {}", code, n),
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => code.clone(),
    };

    let offer = FlightOffer::new(FlightOfferDraft {
        airline_name: airline_display_name(&code),
        flight_number,
        price: entry.price.round() as u64,
        departure_date: departure.date(),
        departure_time: departure.time(),
        duration_minutes,
        origin: query.origin().clone(),
        destination: query.destination().clone(),
        transfer_count: entry.transfers.unwrap_or(0),
        aircraft_type: None,
        fare_class: None,
    })
    .map_err(|e| ProviderError::Malformed(e.to_string()))?;

    Ok(Some(offer))
}

/// Wall-clock time at the departure airport. Offsets are kept local, not
/// converted to UTC, so the date matches what the traveller sees.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .ok()
}
