use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use super::Symbol;
use crate::error::StorageError;
use crate::storage::KeyValueStore;

/// Storage key holding the JSON list of watched symbols
pub const WATCHLIST_KEY: &str = "stockWatchList";

/// Watched symbols in order of first addition, unique by value
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watchlist {
    symbols: Vec<Symbol>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a possibly dirty list, keeping the first occurrence
    pub fn from_symbols(symbols: Vec<Symbol>) -> Self {
        let mut seen = HashSet::new();
        let mut deduped = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            if !symbol.is_empty() && seen.insert(symbol.clone()) {
                deduped.push(symbol);
            }
        }

        Self { symbols: deduped }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Append unless already present, returns whether the list changed
    fn push(&mut self, symbol: Symbol) -> bool {
        if symbol.is_empty() || self.contains(&symbol) {
            return false;
        }
        self.symbols.push(symbol);
        true
    }
}

/// Result of [`WatchlistStore::add_symbol`]
#[derive(Debug)]
pub struct AddSymbol {
    pub state: Watchlist,
    /// Background persistence write, `None` when nothing changed
    pub persist: Option<JoinHandle<()>>,
}

impl AddSymbol {
    pub fn changed(&self) -> bool {
        self.persist.is_some()
    }
}

/// Owner of the watchlist: in-memory state, change notifications and the
/// durable copy.
pub struct WatchlistStore {
    storage: Arc<dyn KeyValueStore>,
    state: watch::Sender<Watchlist>,
    generation: AtomicU64,
    /// Generation of the newest list written to storage
    last_written: Arc<Mutex<u64>>,
}

impl WatchlistStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let (state, _) = watch::channel(Watchlist::new());
        Self {
            storage,
            state,
            generation: AtomicU64::new(0),
            last_written: Arc::new(Mutex::new(0)),
        }
    }

    /// Current watchlist snapshot
    pub fn current(&self) -> Watchlist {
        self.state.borrow().clone()
    }

    /// Receiver notified on every change of the watchlist
    pub fn subscribe(&self) -> watch::Receiver<Watchlist> {
        self.state.subscribe()
    }

    /// Hydrate from storage, replacing the in-memory list wholesale.
    ///
    /// Missing, unreadable or malformed data all hydrate as an empty list.
    pub async fn load(&self) -> Watchlist {
        let watchlist = match self.storage.get(WATCHLIST_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Symbol>>(&raw) {
                Ok(symbols) => Watchlist::from_symbols(symbols),
                Err(err) => {
                    tracing::warn!(key = WATCHLIST_KEY, error = %err, "malformed watchlist in storage, starting empty");
                    Watchlist::new()
                }
            },
            Ok(None) => {
                tracing::info!(key = WATCHLIST_KEY, "no stored watchlist, starting empty");
                Watchlist::new()
            }
            Err(err) => {
                tracing::warn!(key = WATCHLIST_KEY, error = %err, "failed to read watchlist, starting empty");
                Watchlist::new()
            }
        };

        tracing::info!(count = watchlist.len(), "watchlist loaded");
        self.state.send_replace(watchlist.clone());
        watchlist
    }

    /// Append `symbol` and persist in the background.
    ///
    /// Already watched symbols are a no-op: no notification and no write.
    pub fn add_symbol(&self, symbol: Symbol) -> AddSymbol {
        let mut pending = None;
        self.state.send_if_modified(|watchlist| {
            if !watchlist.push(symbol.clone()) {
                return false;
            }
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            pending = Some((generation, watchlist.clone()));
            true
        });

        let Some((generation, state)) = pending else {
            tracing::debug!(%symbol, "symbol already watched");
            return AddSymbol {
                state: self.current(),
                persist: None,
            };
        };

        tracing::info!(%symbol, count = state.len(), "symbol added to watchlist");
        let persist = tokio::spawn(persist(
            Arc::clone(&self.storage),
            Arc::clone(&self.last_written),
            generation,
            state.clone(),
        ));

        AddSymbol {
            state,
            persist: Some(persist),
        }
    }

    /// Overwrite the stored watchlist with an empty list
    pub async fn clear_persisted(&self) -> Result<(), StorageError> {
        let mut written = self.last_written.lock().await;
        self.storage.set(WATCHLIST_KEY, "[]").await?;
        *written = self.generation.load(Ordering::SeqCst);
        tracing::info!(key = WATCHLIST_KEY, "stored watchlist cleared");
        Ok(())
    }
}

async fn persist(
    storage: Arc<dyn KeyValueStore>,
    last_written: Arc<Mutex<u64>>,
    generation: u64,
    watchlist: Watchlist,
) {
    let mut written = last_written.lock().await;
    // a newer list already reached storage
    if *written > generation {
        tracing::debug!(generation, "skip stale watchlist write");
        return;
    }

    match write_list(storage.as_ref(), &watchlist).await {
        Ok(()) => {
            *written = generation;
            tracing::debug!(generation, count = watchlist.len(), "watchlist persisted");
        }
        Err(err) => {
            tracing::warn!(key = WATCHLIST_KEY, error = %err, "failed to persist watchlist");
        }
    }
}

async fn write_list(storage: &dyn KeyValueStore, watchlist: &Watchlist) -> Result<(), StorageError> {
    let json = serde_json::to_string(watchlist)?;
    storage.set(WATCHLIST_KEY, &json).await
}
