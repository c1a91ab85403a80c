use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::StockApi;
use crate::data::{CatalogEntry, DetailRecord, HistoryRow, Symbol};
use crate::error::FetchError;

/// JSON over HTTP: `GET /all` and `GET /history?symbol=S`
#[derive(Clone, Debug)]
pub struct HttpStockApi {
    base_url: String,
    client: Client,
}

impl HttpStockApi {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status, url });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl StockApi for HttpStockApi {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, FetchError> {
        let catalog: Vec<CatalogEntry> = self.get_json("/all", &[]).await?;
        tracing::debug!(count = catalog.len(), "catalog fetched");
        Ok(catalog)
    }

    async fn fetch_detail(&self, symbol: &Symbol) -> Result<DetailRecord, FetchError> {
        let history: Vec<HistoryRow> = self
            .get_json("/history", &[("symbol", symbol.as_str())])
            .await?;

        // newest row first, the rest is ignored
        let row = history
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::EmptyHistory(symbol.to_string()))?;
        Ok(DetailRecord::from_history(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve one canned response, hand back the request line
    async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.expect("read");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let request = String::from_utf8_lossy(&request);
            let line = request.lines().next().unwrap_or_default().to_string();
            _ = tx.send(line);

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.expect("write");
            socket.shutdown().await.expect("shutdown");
        });

        (format!("http://{addr}/"), rx)
    }

    #[tokio::test]
    async fn fetch_detail_uses_first_history_row() {
        let body = r#"[{"symbol":"AAPL","name":"Apple Inc.","open":100,"close":110,"high":111.5,"low":99,"volumes":5000},{"symbol":"AAPL","name":"Apple Inc.","open":1,"close":2,"high":2,"low":1,"volumes":1}]"#;
        let (url, request) = serve_once("200 OK", body).await;
        let api = HttpStockApi::new(&url, Duration::from_secs(5));

        let record = api.fetch_detail(&Symbol::new("AAPL")).await.expect("detail");
        assert_eq!(record.percentage, dec!(10.00));
        assert_eq!(record.volume, 5000);
        assert_eq!(record.name, "Apple Inc.");

        let line = request.await.expect("request line");
        assert!(line.starts_with("GET /history?symbol=AAPL "), "{line}");
    }

    #[tokio::test]
    async fn empty_history_is_an_error() {
        let (url, _request) = serve_once("200 OK", "[]").await;
        let api = HttpStockApi::new(&url, Duration::from_secs(5));

        let err = api.fetch_detail(&Symbol::new("NONE")).await.expect_err("empty");
        assert!(matches!(err, FetchError::EmptyHistory(symbol) if symbol == "NONE"));
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let (url, _request) = serve_once("500 Internal Server Error", "{}").await;
        let api = HttpStockApi::new(&url, Duration::from_secs(5));

        let err = api.fetch_catalog().await.expect_err("status");
        assert!(matches!(err, FetchError::Status { status, .. } if status.as_u16() == 500));
    }

    #[tokio::test]
    async fn fetch_catalog_parses_entries() {
        let body = r#"[{"symbol":"A","name":"Agilent Technologies Inc","industry":"Health Care"},{"symbol":"AAL","name":"American Airlines Group"}]"#;
        let (url, request) = serve_once("200 OK", body).await;
        let api = HttpStockApi::new(&url, Duration::from_secs(5));
        assert_eq!(api.base_url(), url.trim_end_matches('/'));

        let catalog = api.fetch_catalog().await.expect("catalog");
        assert_eq!(catalog, [
            CatalogEntry::new("A", "Agilent Technologies Inc"),
            CatalogEntry::new("AAL", "American Airlines Group"),
        ]);
        let line = request.await.expect("request line");
        assert!(line.starts_with("GET /all "), "{line}");
    }
}
