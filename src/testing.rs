//! Test doubles for the storage and data-source seams

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::Semaphore;

use crate::api::StockApi;
use crate::data::{CatalogEntry, DetailRecord, HistoryRow, Symbol};
use crate::error::{FetchError, StorageError};
use crate::storage::KeyValueStore;

/// Let spawned tasks run until they park
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// In-memory storage with write counting and failure injection
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    gate: tokio::sync::Mutex<()>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Successful writes so far
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Writes block until the returned guard is dropped
    pub async fn hold_writes(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.gate.lock().await
    }
}

fn injected() -> StorageError {
    StorageError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        "injected failure",
    ))
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected());
        }
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _gate = self.gate.lock().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(injected());
        }
        self.insert(key, value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Data source answering from a script, with per-symbol gates and failures
#[derive(Default)]
pub struct ScriptedApi {
    catalog: Mutex<Option<Vec<CatalogEntry>>>,
    quotes: Mutex<HashMap<Symbol, DetailRecord>>,
    failing: Mutex<HashSet<Symbol>>,
    gates: Mutex<HashMap<Symbol, Arc<Semaphore>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(symbol: &str, open: Decimal, close: Decimal) -> DetailRecord {
        DetailRecord::from_history(HistoryRow {
            symbol: Symbol::new(symbol),
            name: format!("{symbol} Corp"),
            open,
            close,
            high: open.max(close),
            low: open.min(close),
            volume: 1_000,
        })
    }

    pub fn set_catalog(&self, catalog: Vec<CatalogEntry>) {
        *lock(&self.catalog) = Some(catalog);
    }

    pub fn quote(&self, symbol: &str, open: Decimal, close: Decimal) {
        lock(&self.quotes).insert(Symbol::new(symbol), Self::record(symbol, open, close));
    }

    pub fn fail(&self, symbol: &str, fail: bool) {
        let mut failing = lock(&self.failing);
        if fail {
            failing.insert(Symbol::new(symbol));
        } else {
            failing.remove(symbol);
        }
    }

    /// Hold fetches of `symbol` until permits are added to the returned gate
    pub fn gate(&self, symbol: &str) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        lock(&self.gates).insert(Symbol::new(symbol), gate.clone());
        gate
    }

    /// Symbols passed to `fetch_detail`, in call order
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl StockApi for ScriptedApi {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, FetchError> {
        lock(&self.catalog)
            .clone()
            .ok_or_else(|| FetchError::EmptyHistory("catalog".to_string()))
    }

    async fn fetch_detail(&self, symbol: &Symbol) -> Result<DetailRecord, FetchError> {
        lock(&self.calls).push(symbol.to_string());

        let gate = lock(&self.gates).get(symbol).cloned();
        if let Some(gate) = gate {
            // permits are handed back on drop, an opened gate stays open
            let _permit = gate.acquire().await;
        }

        if lock(&self.failing).contains(symbol) {
            return Err(FetchError::EmptyHistory(symbol.to_string()));
        }
        lock(&self.quotes)
            .get(symbol)
            .cloned()
            .ok_or_else(|| FetchError::EmptyHistory(symbol.to_string()))
    }
}
