use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Ticker identifier (e.g. AAPL)
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol {
    inner: String,
}

impl Symbol {
    pub fn new(symbol: &str) -> Self {
        Self {
            inner: symbol.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self { inner: s }
    }
}

impl std::borrow::Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

/// Catalog entry as served by `GET /all`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub symbol: Symbol,
    #[serde(default)]
    pub name: String,
}

impl CatalogEntry {
    pub fn new(symbol: &str, name: &str) -> Self {
        Self {
            symbol: Symbol::new(symbol),
            name: name.to_string(),
        }
    }
}

/// One row of `GET /history?symbol=S`, newest first
#[derive(Clone, Debug, Deserialize)]
pub struct HistoryRow {
    pub symbol: Symbol,
    #[serde(default)]
    pub name: String,
    pub open: Decimal,
    pub close: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    #[serde(default, alias = "volumes")]
    pub volume: u64,
}

/// Detail snapshot of a watched symbol
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DetailRecord {
    pub symbol: Symbol,
    pub name: String,
    pub open: Decimal,
    pub close: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub volume: u64,
    /// Change since open, in percent, 2 decimal places
    pub percentage: Decimal,
}

impl DetailRecord {
    pub fn from_history(row: HistoryRow) -> Self {
        let percentage = percentage_change(row.open, row.close).unwrap_or_else(|| {
            tracing::warn!(symbol = %row.symbol, "open price is zero, percentage set to 0");
            Decimal::ZERO
        });
        Self {
            symbol: row.symbol,
            name: row.name,
            open: row.open,
            close: row.close,
            high: row.high,
            low: row.low,
            volume: row.volume,
            percentage,
        }
    }

    /// Header text for the detail view, falls back to the symbol
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.symbol.as_str()
        } else {
            &self.name
        }
    }
}

/// `round2((close - open) * 100 / open)`, `None` when open is zero
pub fn percentage_change(open: Decimal, close: Decimal) -> Option<Decimal> {
    ((close - open) * dec!(100))
        .checked_div(open)
        .map(|v| v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(symbol: &str, open: Decimal, close: Decimal) -> HistoryRow {
        HistoryRow {
            symbol: Symbol::new(symbol),
            name: String::new(),
            open,
            close,
            high: close,
            low: open,
            volume: 0,
        }
    }

    #[test]
    fn percentage_gain_and_loss() {
        assert_eq!(percentage_change(dec!(100), dec!(110)), Some(dec!(10.00)));
        assert_eq!(percentage_change(dec!(50), dec!(45)), Some(dec!(-10.00)));
        assert_eq!(percentage_change(dec!(10), dec!(12)), Some(dec!(20.00)));
    }

    #[test]
    fn percentage_rounds_half_away_from_zero() {
        // 1/3 % -> 0.33, 2/3 % -> 0.67
        assert_eq!(percentage_change(dec!(300), dec!(301)), Some(dec!(0.33)));
        assert_eq!(percentage_change(dec!(300), dec!(302)), Some(dec!(0.67)));
        assert_eq!(percentage_change(dec!(8), dec!(8.0004)), Some(dec!(0.01)));
    }

    #[test]
    fn zero_open_has_no_percentage() {
        assert_eq!(percentage_change(Decimal::ZERO, dec!(5)), None);
        let record = DetailRecord::from_history(row("ZERO", Decimal::ZERO, dec!(5)));
        assert_eq!(record.percentage, Decimal::ZERO);
    }

    #[test]
    fn symbol_serializes_as_plain_string() {
        let list = vec![Symbol::new("A"), Symbol::new("AAP")];
        let json = serde_json::to_string(&list).expect("serialize");
        assert_eq!(json, r#"["A","AAP"]"#);
        let back: Vec<Symbol> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, list);
    }

    #[test]
    fn history_row_accepts_numbers_and_volumes_alias() {
        let json = r#"{"timestamp":"2020-03-23T14:00:00.000Z","symbol":"A","name":"Agilent Technologies Inc","industry":"Health Care","open":10,"high":12.5,"low":9.75,"close":12,"volumes":1234567}"#;
        let row: HistoryRow = serde_json::from_str(json).expect("deserialize");
        assert_eq!(row.volume, 1_234_567);
        assert_eq!(row.high, dec!(12.5));

        let record = DetailRecord::from_history(row);
        assert_eq!(record.percentage, dec!(20.00));
        assert_eq!(record.display_name(), "Agilent Technologies Inc");
    }
}
