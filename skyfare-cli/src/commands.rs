use chrono::{Duration, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;

use skyfare_core::iata::known_airlines;
use skyfare_core::{RawSearchInput, SearchQuery};
use skyfare_offer::{
    OfferGenerator, OfferProvider, OfferSource, Presenter, PriceApiProvider, ProviderError,
    SearchSession, SearchStatus,
};

use crate::app_config::Config;

/// Days ahead used when no departure date is given.
const DEFAULT_DAYS_AHEAD: i64 = 7;

#[derive(Debug, Parser)]
#[command(name = "skyfare", version, about = "Search flight offers, ranked by price")]
pub struct Cli {
    /// Directory holding default.toml and friends
    #[arg(long, global = true, default_value = "config")]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search offers for one route and date
    Search(SearchArgs),
    /// List the airline codes with display names
    Airlines,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Origin airport, 3-letter IATA code
    #[arg(long = "from")]
    pub origin: String,

    /// Destination airport, 3-letter IATA code
    #[arg(long = "to")]
    pub destination: String,

    /// Departure date (YYYY-MM-DD), defaults to a week from today
    #[arg(long)]
    pub date: Option<String>,

    /// Return date (YYYY-MM-DD)
    #[arg(long)]
    pub return_date: Option<String>,

    /// Show full details of the Nth offer (1-based) after the list
    #[arg(long, value_name = "N")]
    pub details: Option<usize>,

    /// Seed for generated offers
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip live providers and generate offers directly
    #[arg(long)]
    pub offline: bool,

    /// Print the search state as JSON
    #[arg(long)]
    pub json: bool,
}

/// Text to print and whether the command succeeded.
#[derive(Debug)]
pub struct Report {
    pub text: String,
    pub success: bool,
}

pub async fn execute(cli: &Cli, config: &Config, today: NaiveDate) -> Report {
    match &cli.command {
        Command::Search(args) => run_search(args, config, today).await,
        Command::Airlines => Report {
            text: known_airlines()
                .iter()
                .map(|(code, name)| format!("{}  {}", code, name))
                .collect::<Vec<_>>()
                .join("\n"),
            success: true,
        },
    }
}

pub fn build_source(config: &Config, args: &SearchArgs) -> Result<OfferSource, ProviderError> {
    let providers: Vec<Box<dyn OfferProvider>> = if args.offline {
        Vec::new()
    } else {
        let timeout = std::time::Duration::from_secs(config.provider.timeout_seconds);
        config
            .provider
            .endpoints
            .iter()
            .map(|endpoint| {
                let token = config.provider.token.clone();
                PriceApiProvider::new(endpoint, token, &config.provider.currency, timeout)
                    .map(|provider| Box::new(provider) as Box<dyn OfferProvider>)
            })
            .collect::<Result<_, _>>()?
    };

    let generator = if config.generation.enabled {
        let mut generation = config.generation.clone();
        if args.seed.is_some() {
            generation.seed = args.seed;
        }
        Some(OfferGenerator::new(&generation))
    } else {
        None
    };

    Ok(OfferSource::new(providers, generator))
}

pub async fn run_search(args: &SearchArgs, config: &Config, today: NaiveDate) -> Report {
    let presenter = Presenter::new(config.display.clone());
    let mut session = SearchSession::new();

    let raw = RawSearchInput {
        origin: args.origin.clone(),
        destination: args.destination.clone(),
        departure_date: Some(
            args.date
                .clone()
                .unwrap_or_else(|| {
                    (today + Duration::days(DEFAULT_DAYS_AHEAD)).format("%Y-%m-%d").to_string()
                }),
        ),
        return_date: args.return_date.clone(),
    };

    let query = match SearchQuery::parse(&raw, today) {
        Ok(query) => query,
        Err(e) => {
            tracing::info!("Rejected search input: {}", e);
            session.fail_validation(&e);
            return render(&presenter, &session, args, None, false);
        }
    };

    tracing::info!(
        "Searching {} -> {} on {}",
        query.origin(),
        query.destination(),
        query.departure_date()
    );
    let return_date = query.return_date();
    let source = match build_source(config, args) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!("Cannot set up offer providers: {}", e);
            return Report { text: format!("Error: {}", e), success: false };
        }
    };
    let status = session.run(&source, query).await.status.clone();
    let success = !matches!(status, SearchStatus::Error(_));

    render(&presenter, &session, args, return_date, success)
}

fn render(
    presenter: &Presenter,
    session: &SearchSession,
    args: &SearchArgs,
    return_date: Option<NaiveDate>,
    success: bool,
) -> Report {
    let state = session.state();
    let detail = args.details.map(|n| n.checked_sub(1).and_then(|i| session.offer(i)));

    if args.json {
        let mut value = json!({ "state": state });
        if let Some(Some(offer)) = detail {
            value["details"] = json!(offer);
        }
        let text = serde_json::to_string_pretty(&value).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e));
        return Report { text, success: success && !matches!(detail, Some(None)) };
    }

    let mut text = presenter.render_state(state);
    let mut success = success;
    match (detail, args.details) {
        (Some(Some(offer)), _) => {
            text.push_str("\n\n");
            text.push_str(&presenter.render_details(offer, return_date));
        }
        (Some(None), Some(n)) if success => {
            text.push_str(&format!("\n\nNo offer #{} in these results.", n));
            success = false;
        }
        _ => {}
    }

    Report { text, success }
}
