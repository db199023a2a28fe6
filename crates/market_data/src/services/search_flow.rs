use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use common::config::AppConfig;
use common::models::{Asset, popular_assets};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info};

use crate::traits::QuoteGateway;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Empty query, showing the popular list.
    Idle,
    DebouncePending,
    Searching,
    /// Remote hits merged with popular matches. A failed upstream call lands
    /// here too, with only the popular matches.
    Merged,
}

/// What the user currently sees.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchView {
    pub query: String,
    pub state: SearchState,
    pub results: Vec<Asset>,
}

impl SearchView {
    fn idle(popular: &[Asset]) -> Self {
        Self {
            query: String::new(),
            state: SearchState::Idle,
            results: popular.to_vec(),
        }
    }
}

struct Completion {
    seq: u64,
    query: String,
    results: Vec<Asset>,
}

/// Popular assets whose symbol or description contains `query`, ignoring case.
pub fn filter_popular(popular: &[Asset], query: &str) -> Vec<Asset> {
    popular
        .iter()
        .filter(|asset| asset.matches(query))
        .cloned()
        .collect()
}

/// Remote hits first, then local ones; first occurrence of a symbol wins.
pub fn merge_results(remote: Vec<Asset>, local: Vec<Asset>, limit: usize) -> Vec<Asset> {
    let mut seen = HashSet::new();

    remote
        .into_iter()
        .chain(local)
        .filter(|asset| seen.insert(asset.symbol.clone()))
        .take(limit)
        .collect()
}

pub struct SearchFlow {
    gateway: Arc<dyn QuoteGateway>,
    popular: Arc<Vec<Asset>>,
    debounce: Duration,
    max_results: usize,
}

pub struct SearchHandle {
    input_tx: mpsc::Sender<String>,
    view_rx: watch::Receiver<SearchView>,
    task: JoinHandle<()>,
}

impl SearchHandle {
    /// Replaces the whole query, as one keystroke would.
    pub async fn input(&self, query: &str) -> Result<(), mpsc::error::SendError<String>> {
        self.input_tx.send(query.to_string()).await
    }

    pub fn view(&self) -> watch::Receiver<SearchView> {
        self.view_rx.clone()
    }

    pub fn current(&self) -> SearchView {
        self.view_rx.borrow().clone()
    }

    pub async fn shutdown(self) {
        drop(self.input_tx);
        let _ = self.task.await;
    }
}

impl SearchFlow {
    pub fn new(
        gateway: Arc<dyn QuoteGateway>,
        popular: Vec<Asset>,
        debounce: Duration,
        max_results: usize,
    ) -> Self {
        Self {
            gateway,
            popular: Arc::new(popular),
            debounce,
            max_results,
        }
    }

    pub fn from_config(gateway: Arc<dyn QuoteGateway>, config: &AppConfig) -> Self {
        Self::new(gateway, popular_assets(), config.debounce, config.max_results)
    }

    pub fn spawn(self) -> SearchHandle {
        let (input_tx, input_rx) = mpsc::channel(64);
        let (view_tx, view_rx) = watch::channel(SearchView::idle(&self.popular));

        let task = tokio::spawn(self.run(input_rx, view_tx));

        SearchHandle {
            input_tx,
            view_rx,
            task,
        }
    }

    async fn run(self, mut input_rx: mpsc::Receiver<String>, view_tx: watch::Sender<SearchView>) {
        let (done_tx, mut done_rx) = mpsc::channel::<Completion>(16);

        let mut query = String::new();
        let mut deadline: Option<Instant> = None;
        let mut latest_seq: u64 = 0;

        info!("Search flow started (debounce {:?})", self.debounce);

        loop {
            tokio::select! {
                input = input_rx.recv() => {
                    let Some(input) = input else {
                        debug!("Search input closed, stopping flow");
                        break;
                    };
                    query = input.trim().to_string();
                    // Anything still in flight belongs to an older query.
                    latest_seq += 1;

                    if query.is_empty() {
                        deadline = None;
                        view_tx.send_replace(SearchView::idle(&self.popular));
                    } else {
                        deadline = Some(Instant::now() + self.debounce);
                        self.publish(&view_tx, &query, SearchState::DebouncePending);
                    }
                }

                _ = time::sleep_until(deadline.unwrap_or_else(Instant::now)),
                    if deadline.is_some() =>
                {
                    deadline = None;
                    latest_seq += 1;
                    debug!("Issuing search #{} for {:?}", latest_seq, query);

                    self.publish(&view_tx, &query, SearchState::Searching);
                    self.spawn_search(latest_seq, query.clone(), done_tx.clone());
                }

                Some(done) = done_rx.recv() => {
                    if done.seq != latest_seq {
                        debug!(
                            "Discarding stale results #{} for {:?} (latest #{})",
                            done.seq, done.query, latest_seq
                        );
                        continue;
                    }

                    debug!("Search #{} produced {} results", done.seq, done.results.len());
                    view_tx.send_replace(SearchView {
                        query: done.query,
                        state: SearchState::Merged,
                        results: done.results,
                    });
                }
            }
        }
    }

    fn publish(&self, view_tx: &watch::Sender<SearchView>, query: &str, state: SearchState) {
        view_tx.send_modify(|view| {
            view.query = query.to_string();
            view.state = state;
        });
    }

    fn spawn_search(&self, seq: u64, query: String, done_tx: mpsc::Sender<Completion>) {
        let gateway = self.gateway.clone();
        let popular = self.popular.clone();
        let limit = self.max_results;

        tokio::spawn(async move {
            // An upstream failure arrives here as an empty list, leaving only
            // the popular matches.
            let remote = gateway.search_assets(&query).await;
            let local = filter_popular(&popular, &query);
            let results = merge_results(remote, local, limit);

            let _ = done_tx
                .send(Completion {
                    seq,
                    query,
                    results,
                })
                .await;
        });
    }
}
