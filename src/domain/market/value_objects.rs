use derive_more::{Constructor, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;

/// Instrument symbol, stored upper-case
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deref, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
#[serde(try_from = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: &str) -> Result<Self, ValidationError> {
        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidSymbol("symbol cannot be empty".to_string()));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self(value.trim().to_uppercase())
    }
}

/// Milliseconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, From, Into, Constructor, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn from_millis(value: u64) -> Self {
        Self(value)
    }
}

/// Initial per-symbol snapshot delivered before any tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySnapshot {
    pub projected_adr_high: f64,
    pub projected_adr_low: f64,
    pub todays_high: f64,
    pub todays_low: f64,
    pub day_open_price: f64,
}

impl DaySnapshot {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("projectedAdrHigh", self.projected_adr_high),
            ("projectedAdrLow", self.projected_adr_low),
            ("todaysHigh", self.todays_high),
            ("todaysLow", self.todays_low),
            ("dayOpenPrice", self.day_open_price),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ValidationError::InvalidPrice(format!("{} is not finite", name)));
        }
        if self.projected_adr_high <= self.projected_adr_low {
            return Err(ValidationError::InvalidPrice(format!(
                "projected ADR high {} must exceed low {}",
                self.projected_adr_high, self.projected_adr_low
            )));
        }
        Ok(())
    }
}

/// One live price update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tick {
    pub current_price: f64,
    pub timestamp: Timestamp,
}

impl Tick {
    pub fn new(current_price: f64, timestamp: u64) -> Self {
        Self { current_price, timestamp: Timestamp::from_millis(timestamp) }
    }
}

/// What the external data pipeline delivers, keyed by symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MarketEvent {
    Snapshot { symbol: Symbol, snapshot: DaySnapshot },
    Tick { symbol: Symbol, tick: Tick },
}

impl MarketEvent {
    pub fn symbol(&self) -> &Symbol {
        match self {
            MarketEvent::Snapshot { symbol, .. } | MarketEvent::Tick { symbol, .. } => symbol,
        }
    }
}
