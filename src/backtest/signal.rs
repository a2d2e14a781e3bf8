//! Strategy contract: signal records and the callback seam.
//!
//! A strategy sees one historical row per step and answers with zero or
//! more buy requests. It never touches ledger internals; the driver
//! executes whatever signals come back and scores the outcome.

use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::data::{MarketRow, OptionType};

use super::position::{OptionPosition, PositionError};

/// A buy request produced by a strategy.
///
/// Quantity defaults to 1 and expiry to entry time plus the engine's
/// configured default when left unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub strike: Decimal,
    pub option_type: OptionType,
    pub premium: Decimal,
    pub quantity: u32,
    pub expiry: Option<NaiveDateTime>,
    pub implied_volatility: Option<f64>,
}

impl Signal {
    pub fn buy(strike: Decimal, option_type: OptionType, premium: Decimal) -> Self {
        Self {
            strike,
            option_type,
            premium,
            quantity: 1,
            expiry: None,
            implied_volatility: None,
        }
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn expiry(mut self, expiry: NaiveDateTime) -> Self {
        self.expiry = Some(expiry);
        self
    }

    pub fn implied_volatility(mut self, implied_volatility: f64) -> Self {
        self.implied_volatility = Some(implied_volatility);
        self
    }

    /// Resolve defaults against the entry time and validate the fields.
    pub(crate) fn into_position(
        self,
        entry_time: NaiveDateTime,
        default_expiry_days: i64,
    ) -> Result<OptionPosition, PositionError> {
        let expiry = self
            .expiry
            .unwrap_or(entry_time + Duration::days(default_expiry_days));
        OptionPosition::new(
            self.strike,
            self.option_type,
            self.premium,
            self.quantity,
            entry_time,
            expiry,
            self.implied_volatility,
        )
    }
}

/// Signal producer invoked once per historical row.
pub trait Strategy<R: MarketRow> {
    fn on_row(&mut self, row: &R) -> Vec<Signal>;
}

/// Adapter turning a closure into a [`Strategy`].
pub struct StrategyFn<F>(F);

/// Wrap a closure as a [`Strategy`], for inline strategies and tests.
pub fn strategy_fn<R, F>(f: F) -> StrategyFn<F>
where
    R: MarketRow,
    F: FnMut(&R) -> Vec<Signal>,
{
    StrategyFn(f)
}

impl<R, F> Strategy<R> for StrategyFn<F>
where
    R: MarketRow,
    F: FnMut(&R) -> Vec<Signal>,
{
    fn on_row(&mut self, row: &R) -> Vec<Signal> {
        (self.0)(row)
    }
}
