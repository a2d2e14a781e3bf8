//! Core backtesting engine.
//!
//! Runs the simulation loop, one historical row at a time:
//! 1. Advance the clock: decay open premiums, settle reached expiries
//! 2. Invoke the strategy and execute its buy signals
//! 3. Record an equity sample
//!
//! After the last row every remaining position is liquidated at intrinsic
//! value, then the trade log and equity curve are reduced to a
//! [`BacktestResult`].

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::data::MarketRow;
use crate::metrics::{BacktestResult, MetricsCalculator};
use crate::pricing;

use super::ledger::Ledger;
use super::signal::Strategy;

/// Configuration for backtest execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Starting capital.
    pub initial_capital: Decimal,

    /// Expiry assigned to signals that do not specify one, in days after
    /// entry.
    pub default_expiry_days: i64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: Decimal::from(100_000),
            default_expiry_days: 30,
        }
    }
}

#[derive(Error, Debug)]
pub enum BacktestError {
    /// A malformed input row. Raised before the simulation loop starts;
    /// the engine never partially processes a bad dataset.
    #[error("row {index}: spot price must be positive, got {spot}")]
    InvalidSpot { index: usize, spot: Decimal },
}

/// The simulation driver. Owns one [`Ledger`] per run.
pub struct BacktestEngine {
    config: BacktestConfig,
    ledger: Ledger,
}

impl BacktestEngine {
    pub fn new(config: BacktestConfig) -> Self {
        let ledger = Ledger::new(config.initial_capital);
        Self { config, ledger }
    }

    /// Run a backtest over the given rows.
    ///
    /// Rows are validated up front and sorted by timestamp before the loop,
    /// so callers may pass unordered data. An empty slice yields the
    /// canonical empty result.
    pub fn run<R, S>(&mut self, rows: &[R], strategy: &mut S) -> Result<BacktestResult, BacktestError>
    where
        R: MarketRow + Clone,
        S: Strategy<R>,
    {
        for (index, row) in rows.iter().enumerate() {
            if row.spot() <= Decimal::ZERO {
                return Err(BacktestError::InvalidSpot {
                    index,
                    spot: row.spot(),
                });
            }
        }

        self.ledger = Ledger::new(self.config.initial_capital);

        let mut data: Vec<R> = rows.to_vec();
        data.sort_by_key(|row| row.timestamp());

        let mut prev_timestamp: Option<NaiveDateTime> = None;
        for row in &data {
            let now = row.timestamp();
            let spot = row.spot();

            // 1.0 for the first row, by convention.
            let days_passed = match prev_timestamp {
                None => 1.0,
                Some(prev) => (now - prev).num_days() as f64,
            };
            self.ledger.advance_time(now, spot, days_passed);

            for signal in strategy.on_row(row) {
                match signal.into_position(now, self.config.default_expiry_days) {
                    Ok(position) => {
                        if !self.ledger.buy(position) {
                            // capital exhaustion constrains the strategy
                            // without aborting the run
                            debug!(%now, "signal dropped: insufficient capital");
                        }
                    }
                    Err(err) => warn!(%now, "signal dropped: {err}"),
                }
            }

            let equity = self.ledger.portfolio_value(now, spot);
            self.ledger.record_equity(now, equity);

            prev_timestamp = Some(now);
        }

        if let Some(last) = data.last() {
            self.liquidate_remaining(last.timestamp(), last.spot());
        }

        Ok(MetricsCalculator::calculate(
            self.ledger.closed_trades().to_vec(),
            self.ledger.equity_curve().to_vec(),
            self.config.initial_capital,
            self.ledger.capital(),
        ))
    }

    /// Close every remaining position at intrinsic value, oldest first:
    /// liquidation at the simulation horizon.
    fn liquidate_remaining(&mut self, final_time: NaiveDateTime, final_spot: Decimal) {
        while let Some(position) = self.ledger.open_positions().first() {
            let settlement =
                pricing::intrinsic_value(final_spot, position.strike, position.option_type);
            if self.ledger.close(0, settlement, final_time, final_spot).is_err() {
                break;
            }
        }
    }

    /// The run's ledger. Mid-run reads see mutable, not-yet-finalized
    /// state; the finished summary is the [`BacktestResult`].
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }
}
