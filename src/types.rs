use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// One row of the wine table, with column names normalized.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WineRecord {
    #[serde(rename = "Country", alias = "País", alias = "Pais")]
    pub country: String,
    #[serde(
        rename = "AveragePrice",
        alias = "Average Price",
        alias = "Preço Médio",
        alias = "Preco Medio"
    )]
    pub average_price: f64,
    #[serde(rename = "Count", alias = "Número", alias = "Numero")]
    pub count: u64,
}

/// The table loaded at startup. Never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<WineRecord>,
}

impl Dataset {
    pub fn new(records: Vec<WineRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[WineRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Upper bound on average price applied before ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceCeiling {
    All,
    UpTo(u32),
}

impl PriceCeiling {
    /// The values offered by the price selector, in display order.
    pub const OPTIONS: [PriceCeiling; 4] = [
        PriceCeiling::All,
        PriceCeiling::UpTo(40),
        PriceCeiling::UpTo(30),
        PriceCeiling::UpTo(20),
    ];

    pub fn admits(&self, price: f64) -> bool {
        match self {
            PriceCeiling::All => true,
            PriceCeiling::UpTo(limit) => price <= f64::from(*limit),
        }
    }
}

impl fmt::Display for PriceCeiling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceCeiling::All => write!(f, "All"),
            PriceCeiling::UpTo(limit) => write!(f, "{}", limit),
        }
    }
}

impl FromStr for PriceCeiling {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            // "Todos" is the label older pages used for the same option
            "All" | "Todos" => Ok(PriceCeiling::All),
            other => other.parse().map(PriceCeiling::UpTo),
        }
    }
}

/// Which end of the count ranking the wine-count panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountOrder {
    Fewest,
    Most,
}

impl CountOrder {
    /// Maps the "Show top 5?" checkbox; unchecked shows the fewest.
    pub fn from_show_top(show_top: bool) -> Self {
        if show_top {
            CountOrder::Most
        } else {
            CountOrder::Fewest
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CountOrder::Fewest => "fewest",
            CountOrder::Most => "most",
        }
    }
}
