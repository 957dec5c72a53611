use serde::{Deserialize, Serialize};

/// One entry of the symbol catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub symbol: String,
    pub name: String,
}

impl SymbolEntry {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        SymbolEntry {
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

/// Price snapshot with its day-over-day change. Replaced wholesale on refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub percent_change: f64,
}

impl Quote {
    /// Derive `change` and `percent_change` from the previous close.
    /// A zero previous close yields a zero percent change.
    pub fn from_previous_close(
        symbol: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        previous_close: f64,
    ) -> Self {
        let change = price - previous_close;
        let percent_change = if previous_close == 0.0 {
            0.0
        } else {
            change / previous_close * 100.0
        };
        Quote {
            symbol: symbol.into(),
            name: name.into(),
            price,
            change,
            percent_change,
        }
    }
}
