use std::sync::{Arc, PoisonError, RwLock};

use dashmap::DashSet;
use futures::stream::{FuturesUnordered, StreamExt};
use scopeguard::ScopeGuard;
use tokio::sync::watch;

use super::{DetailRecord, Symbol, Watchlist};
use crate::api::StockApi;

/// Detail records in merge order, at most one per symbol
pub struct DetailCache {
    records: RwLock<Vec<Arc<DetailRecord>>>,
    /// Number of records, bumped after every merge
    revision: watch::Sender<usize>,
}

impl DetailCache {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            records: RwLock::new(Vec::new()),
            revision,
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.read().iter().any(|r| &r.symbol == symbol)
    }

    pub fn get(&self, symbol: &Symbol) -> Option<Arc<DetailRecord>> {
        self.read().iter().find(|r| &r.symbol == symbol).cloned()
    }

    /// Earliest merged record
    pub fn first(&self) -> Option<Arc<DetailRecord>> {
        self.read().first().cloned()
    }

    /// Records in merge order
    pub fn snapshot(&self) -> Vec<Arc<DetailRecord>> {
        self.read().clone()
    }

    /// Records sorted by symbol for display; the stored order is untouched
    pub fn sorted(&self) -> Vec<Arc<DetailRecord>> {
        let mut records = self.snapshot();
        records.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        records
    }

    /// Watched symbols that have no record yet, in watchlist order
    pub fn missing(&self, watchlist: &Watchlist) -> Vec<Symbol> {
        let records = self.read();
        watchlist
            .symbols()
            .iter()
            .filter(|symbol| !records.iter().any(|r| &r.symbol == *symbol))
            .cloned()
            .collect()
    }

    /// Receiver notified with the record count after each merge
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.revision.subscribe()
    }

    /// Insert unless a record for the symbol is already present.
    ///
    /// The presence check and the insert happen under one write lock, so the
    /// second of two racing merges for a symbol is a no-op.
    pub fn merge(&self, record: DetailRecord) -> bool {
        let len = {
            let mut records = self
                .records
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if records.iter().any(|r| r.symbol == record.symbol) {
                return false;
            }
            records.push(Arc::new(record));
            records.len()
        };
        self.revision.send_replace(len);
        true
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Arc<DetailRecord>>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DetailCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps the detail cache in step with the watchlist
pub struct DetailSync {
    api: Arc<dyn StockApi>,
    cache: Arc<DetailCache>,
    in_flight: DashSet<Symbol>,
}

impl DetailSync {
    pub fn new(api: Arc<dyn StockApi>, cache: Arc<DetailCache>) -> Self {
        Self {
            api,
            cache,
            in_flight: DashSet::new(),
        }
    }

    pub fn cache(&self) -> &Arc<DetailCache> {
        &self.cache
    }

    /// Fetch every watched symbol missing from the cache and merge the results.
    ///
    /// Fetches run concurrently and are merged as they complete. A failed
    /// symbol stays missing and is fetched again on the next change. Symbols
    /// already being fetched by an overlapping call are skipped. Returns the
    /// cache contents once this call's fetches have settled.
    pub async fn on_watchlist_change(&self, watchlist: &Watchlist) -> Vec<Arc<DetailRecord>> {
        let claimed = self.claim(self.cache.missing(watchlist));
        if claimed.is_empty() {
            return self.cache.snapshot();
        }

        tracing::debug!(count = claimed.len(), "fetching missing details");

        // a claim is released when its pending future is dropped
        let mut pending: FuturesUnordered<_> = claimed
            .into_iter()
            .map(|claim| async move {
                let result = self.api.fetch_detail(&claim).await;
                (claim, result)
            })
            .collect();

        let (mut merged, mut failed) = (0usize, 0usize);
        while let Some((claim, result)) = pending.next().await {
            let symbol: &Symbol = &claim;
            match result {
                Ok(mut record) => {
                    if record.symbol != *symbol {
                        tracing::warn!(%symbol, returned = %record.symbol, "detail returned for another symbol");
                        record.symbol = symbol.clone();
                    }
                    if self.cache.merge(record) {
                        merged += 1;
                        tracing::debug!(%symbol, "detail merged");
                    } else {
                        tracing::debug!(%symbol, "detail already cached, dropped");
                    }
                }
                Err(err) => {
                    failed += 1;
                    tracing::warn!(%symbol, error = %err, "failed to fetch detail");
                }
            }
        }

        tracing::info!(merged, failed, cached = self.cache.len(), "detail sync finished");
        self.cache.snapshot()
    }

    /// Mark symbols as in flight, skipping those another call holds or that
    /// were cached since they were found missing. Dropping a claim releases it.
    fn claim(&self, symbols: Vec<Symbol>) -> Vec<ScopeGuard<Symbol, impl FnOnce(Symbol) + '_>> {
        symbols
            .into_iter()
            .filter(|symbol| self.in_flight.insert(symbol.clone()))
            .map(|symbol| {
                scopeguard::guard(symbol, move |symbol| {
                    self.in_flight.remove(&symbol);
                })
            })
            .filter(|claim| !self.cache.contains(claim))
            .collect()
    }
}
