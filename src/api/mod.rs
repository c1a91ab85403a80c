mod http;

pub use http::HttpStockApi;

use async_trait::async_trait;

use crate::data::{CatalogEntry, DetailRecord, Symbol};
use crate::error::FetchError;

/// Remote source of catalog and detail data
#[async_trait]
pub trait StockApi: Send + Sync {
    /// Every symbol/name pair available to search
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, FetchError>;

    /// Latest detail snapshot of `symbol`, percentage already derived
    async fn fetch_detail(&self, symbol: &Symbol) -> Result<DetailRecord, FetchError>;
}
