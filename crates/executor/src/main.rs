use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use common::config::AppConfig;
use common::logger;
use common::models::{Asset, popular_assets, popular_predictions};
use market_data::remote::FinnhubClient;
use market_data::services::price_board::PriceBoard;
use market_data::services::search_flow::{SearchFlow, SearchState, SearchView};
use market_data::traits::QuoteGateway;
use storage::repositories::{PredictionRepository, SessionRepository};
use storage::{KeyValueStore, SqliteStore};

use crate::console::{Command, HELP, parse_command};
use crate::services::{PredictionForm, PredictionService};

mod console;
mod services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logger::setup_logger();
    debug!("System starting up...");

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let gateway: Arc<dyn QuoteGateway> =
        Arc::new(FinnhubClient::new(&config).context("Failed to build quote client")?);
    let store: Arc<dyn KeyValueStore> = Arc::new(
        SqliteStore::open(&config.db_path)
            .await
            .context("Failed to open local store")?,
    );

    let session = Arc::new(SessionRepository::new(store.clone()));
    let predictions = Arc::new(PredictionRepository::new(store));
    let prediction_svc = PredictionService::new(gateway.clone(), session.clone(), predictions);
    let board = PriceBoard::new(gateway.clone());

    if let Some(user) = session.current_user().await? {
        info!("Resuming session for {}", user.display_name());
    }

    print_board(&board).await;

    let search = SearchFlow::from_config(gateway, &config).spawn();
    let renderer = tokio::spawn(render_views(search.view()));

    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            Command::Query(query) => {
                if search.input(&query).await.is_err() {
                    warn!("Search flow stopped, ignoring input");
                }
            }
            Command::Login(email) => match session.login(&email).await {
                Ok(user) => println!("Welcome back, {}", user.display_name()),
                Err(e) => println!("Login failed: {}", e),
            },
            Command::Signup(args) => match session.signup(&args.into()).await {
                Ok(user) => println!("Account created for {}", user.display_name()),
                Err(e) => println!("Signup failed: {}", e),
            },
            Command::Logout => session.logout().await?,
            Command::Predict {
                symbol,
                direction,
                timeframe,
            } => {
                let Some(asset) = resolve_asset(&search.current(), &symbol) else {
                    println!("Unknown asset {}, search for it first", symbol);
                    continue;
                };
                let form = PredictionForm {
                    asset,
                    direction: Some(direction),
                    timeframe: Some(timeframe),
                };
                match prediction_svc.submit(form).await {
                    Ok(stored) => println!(
                        "Prediction {} on {} registered at ${:.2}",
                        stored.id, stored.prediction.asset.symbol, stored.prediction.initial_price
                    ),
                    Err(e) => println!("Prediction rejected: {}", e),
                }
            }
            Command::Predictions => match prediction_svc.my_predictions().await {
                Ok(mine) => {
                    for p in mine {
                        let p = p.prediction;
                        println!(
                            "{:<8} {:?} {:<4} from ${:.2} ({:?}, {})",
                            p.asset.symbol,
                            p.direction,
                            p.timeframe,
                            p.initial_price,
                            p.status,
                            p.created_at.format("%Y-%m-%d")
                        );
                    }
                }
                Err(e) => println!("{}", e),
            },
            Command::Stats => match prediction_svc.stats().await {
                Ok(stats) => println!(
                    "{} predictions: {} correct, {} incorrect, {} pending, accuracy {:.1}%",
                    stats.total, stats.correct, stats.incorrect, stats.pending, stats.accuracy
                ),
                Err(e) => println!("{}", e),
            },
            Command::Board => print_board(&board).await,
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }
    }

    search.shutdown().await;
    renderer.abort();
    info!("Bye");
    Ok(())
}

async fn print_board(board: &PriceBoard) {
    for entry in board.refresh(&popular_predictions()).await {
        let price = entry
            .current_price
            .map(|p| format!("${:.2}", p))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "{:<6} {:>12}  {:?} {:<4} {} users",
            entry.symbol(),
            price,
            entry.prediction.direction,
            entry.prediction.timeframe,
            entry.prediction.count
        );
    }
}

async fn render_views(mut view_rx: watch::Receiver<SearchView>) {
    while view_rx.changed().await.is_ok() {
        let view = view_rx.borrow_and_update().clone();
        match view.state {
            SearchState::Idle => {
                println!("Popular assets:");
                print_assets(&view.results);
            }
            SearchState::Merged if view.results.is_empty() => {
                println!("No assets found for {:?}", view.query);
            }
            SearchState::Merged => print_assets(&view.results),
            SearchState::DebouncePending | SearchState::Searching => {}
        }
    }
}

fn print_assets(assets: &[Asset]) {
    for asset in assets {
        println!(
            "  {:<10} {:<7} {}",
            asset.display_symbol,
            if asset.is_crypto() { "crypto" } else { "stock" },
            asset.description
        );
    }
}

/// Looks in what is on screen first, then in the popular list.
fn resolve_asset(view: &SearchView, symbol: &str) -> Option<Asset> {
    view.results
        .iter()
        .cloned()
        .chain(popular_assets())
        .find(|asset| asset.symbol.eq_ignore_ascii_case(symbol))
}
