use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::{wrappers::WatchStream, StreamExt};

use crate::api::StockApi;
use crate::data::{
    catalog, AddSymbol, CatalogEntry, DetailCache, DetailRecord, DetailSync, Selection, Symbol,
    Watchlist, WatchlistStore,
};
use crate::error::StorageError;
use crate::storage::KeyValueStore;

/// Per-session state owned by the application root and handed to the views
pub struct Session {
    api: Arc<dyn StockApi>,
    watchlist: WatchlistStore,
    sync: DetailSync,
    selection: Mutex<Selection>,
    catalog: RwLock<Arc<Vec<CatalogEntry>>>,
}

impl Session {
    pub fn new(storage: Arc<dyn KeyValueStore>, api: Arc<dyn StockApi>) -> Arc<Self> {
        let cache = Arc::new(DetailCache::new());
        Arc::new(Self {
            sync: DetailSync::new(Arc::clone(&api), cache),
            api,
            watchlist: WatchlistStore::new(storage),
            selection: Mutex::new(Selection::new()),
            catalog: RwLock::new(Arc::new(Vec::new())),
        })
    }

    /// Hydrate the watchlist, then reconcile details on every change.
    ///
    /// The returned task ends once the session is dropped.
    pub async fn start(self: &Arc<Self>) -> JoinHandle<()> {
        self.watchlist.load().await;
        tokio::spawn(follow_watchlist(
            Arc::downgrade(self),
            self.watchlist.subscribe(),
        ))
    }

    /// Empty the persisted watchlist, call before `start`
    pub async fn reset_watchlist(&self) -> Result<(), StorageError> {
        self.watchlist.clear_persisted().await
    }

    /// Fetch the search catalog, an error leaves the previous one in place
    pub async fn load_catalog(&self) -> usize {
        match self.api.fetch_catalog().await {
            Ok(entries) => {
                let count = entries.len();
                *self.catalog.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(entries);
                tracing::info!(count, "catalog loaded");
                count
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load catalog");
                self.catalog().len()
            }
        }
    }

    pub fn catalog(&self) -> Arc<Vec<CatalogEntry>> {
        Arc::clone(&self.catalog.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Catalog entries matching a search box query
    pub fn search(&self, query: &str) -> Vec<CatalogEntry> {
        catalog::filter(&self.catalog(), query)
    }

    pub fn watchlist(&self) -> Watchlist {
        self.watchlist.current()
    }

    pub fn subscribe_watchlist(&self) -> watch::Receiver<Watchlist> {
        self.watchlist.subscribe()
    }

    pub fn add_symbol(&self, symbol: Symbol) -> AddSymbol {
        self.watchlist.add_symbol(symbol)
    }

    pub fn details(&self) -> &Arc<DetailCache> {
        self.sync.cache()
    }

    /// Run one reconciliation against the current watchlist
    pub async fn reconcile(&self) -> Vec<Arc<DetailRecord>> {
        let watchlist = self.watchlist.current();
        let records = self.sync.on_watchlist_change(&watchlist).await;
        self.selected();
        records
    }

    /// Make the cached record of `symbol` the active one
    pub fn select(&self, symbol: &Symbol) -> Option<Arc<DetailRecord>> {
        let record = self.details().get(symbol)?;
        self.lock_selection().select(Arc::clone(&record));
        Some(record)
    }

    /// Active record, defaulting to the earliest cached one
    pub fn selected(&self) -> Option<Arc<DetailRecord>> {
        let cache = Arc::clone(self.details());
        self.lock_selection().default_if_unset(&cache)
    }

    fn lock_selection(&self) -> std::sync::MutexGuard<'_, Selection> {
        self.selection.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn follow_watchlist(session: Weak<Session>, changes: watch::Receiver<Watchlist>) {
    // yields the current list first, then every change in order; changes
    // landing between two polls arrive as the later, larger list
    let mut changes = WatchStream::new(changes);
    while let Some(watchlist) = changes.next().await {
        let Some(session) = session.upgrade() else {
            break;
        };
        tokio::spawn(async move {
            session.sync.on_watchlist_change(&watchlist).await;
            session.selected();
        });
    }
    tracing::debug!("watchlist subscription closed");
}
