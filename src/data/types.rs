//! Core data types for the backtest input contract.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Parse from the forms seen in NSE exports and config files.
    /// Anything outside the call/put vocabulary is rejected.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "C" | "CE" | "CALL" => Some(Self::Call),
            "P" | "PE" | "PUT" => Some(Self::Put),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "CE",
            Self::Put => "PE",
        }
    }
}

/// Minimum surface a historical row must expose to the simulation driver.
///
/// The engine only reads the timestamp and the underlying spot price;
/// strategies are free to use richer row types carrying whatever else
/// their signal logic needs (option-chain columns, model features, ...).
pub trait MarketRow {
    fn timestamp(&self) -> NaiveDateTime;
    fn spot(&self) -> Decimal;
}

/// Plain timestamp/spot row, the shape produced by the CSV loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotBar {
    pub timestamp: NaiveDateTime,
    pub spot: Decimal,
}

impl MarketRow for SpotBar {
    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    fn spot(&self) -> Decimal {
        self.spot
    }
}
