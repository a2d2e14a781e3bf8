//! Position ledger.
//!
//! Tracks cash, open positions, closed trades and the equity curve for one
//! backtest run. A ledger belongs to exactly one run; parallel sweeps get
//! one ledger each.

use chrono::NaiveDateTime;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::pricing;

use super::position::{ClosedTrade, OptionPosition};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("no open position at index {0}")]
    PositionNotFound(usize),
}

/// Portfolio valuation snapshot, one per simulated time step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: NaiveDateTime,
    pub equity: Decimal,
    pub cash: Decimal,
    pub open_positions: usize,
}

/// Cash, open positions and the closed-trade log for a single run.
#[derive(Debug)]
pub struct Ledger {
    initial_capital: Decimal,
    capital: Decimal,
    open_positions: Vec<OptionPosition>,
    closed_trades: Vec<ClosedTrade>,
    equity_curve: Vec<EquityPoint>,
}

impl Ledger {
    pub fn new(initial_capital: Decimal) -> Self {
        Self {
            initial_capital,
            capital: initial_capital,
            open_positions: Vec::new(),
            closed_trades: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    /// Open a position, debiting its entry cost from capital.
    ///
    /// Returns `false` without touching any state when the cost exceeds
    /// available capital. A rejected buy is not an error; capital can
    /// never go negative.
    pub fn buy(&mut self, position: OptionPosition) -> bool {
        let cost = position.premium() * Decimal::from(position.quantity);
        if cost > self.capital {
            debug!(%cost, capital = %self.capital, "buy rejected: insufficient capital");
            return false;
        }
        self.capital -= cost;
        self.open_positions.push(position);
        true
    }

    /// Close the open position at `index`, crediting the exit proceeds and
    /// appending the trade record.
    pub fn close(
        &mut self,
        index: usize,
        exit_premium: Decimal,
        exit_time: NaiveDateTime,
        spot: Decimal,
    ) -> Result<ClosedTrade, LedgerError> {
        if index >= self.open_positions.len() {
            return Err(LedgerError::PositionNotFound(index));
        }
        Ok(self.close_at(index, exit_premium, exit_time, spot))
    }

    /// Close a known-valid index. Callers guarantee bounds.
    fn close_at(
        &mut self,
        index: usize,
        exit_premium: Decimal,
        exit_time: NaiveDateTime,
        spot: Decimal,
    ) -> ClosedTrade {
        let position = self.open_positions.remove(index);
        let quantity = Decimal::from(position.quantity);
        let entry_cost = position.premium() * quantity;
        let exit_value = exit_premium * quantity;
        let pnl = exit_value - entry_cost;

        self.capital += exit_value;

        let return_pct: f64 = if entry_cost > Decimal::ZERO {
            (pnl / entry_cost * Decimal::from(100))
                .try_into()
                .unwrap_or(0.0)
        } else {
            0.0
        };
        let holding_days = (exit_time - position.entry_time).num_days();
        let intrinsic = pricing::intrinsic_value(spot, position.strike, position.option_type);

        let trade = ClosedTrade {
            entry_time: position.entry_time,
            exit_time,
            strike: position.strike,
            option_type: position.option_type,
            entry_premium: position.premium(),
            exit_premium,
            quantity: position.quantity,
            pnl,
            return_pct,
            holding_days,
            intrinsic_value: intrinsic,
            spot_at_exit: spot,
        };
        self.closed_trades.push(trade.clone());
        trade
    }

    /// Advance the simulation clock: decay open premiums, then settle every
    /// position whose expiry has been reached at its intrinsic value.
    pub fn advance_time(&mut self, now: NaiveDateTime, spot: Decimal, days_passed: f64) {
        let step = Decimal::from_f64(days_passed).unwrap_or(Decimal::ONE);
        let mut expired = Vec::new();

        for (index, position) in self.open_positions.iter_mut().enumerate() {
            let days_to_expiry = position.days_to_expiry(now);
            if days_to_expiry <= 0 {
                expired.push(index);
                continue;
            }
            if let Some(iv) = position.implied_volatility {
                let theta = pricing::theta_decay(days_to_expiry, position.premium(), iv);
                position.apply_decay(theta * step);
            }
        }

        // Descending index order keeps the remaining indices valid while
        // positions are removed, so same-step multi-expiries all settle.
        for &index in expired.iter().rev() {
            let position = &self.open_positions[index];
            let settlement =
                pricing::intrinsic_value(spot, position.strike, position.option_type);
            self.close_at(index, settlement, now, spot);
        }
    }

    /// Mark the whole portfolio: cash plus the value of every open position.
    ///
    /// Expired-but-not-yet-settled positions are worth intrinsic value;
    /// live positions carry intrinsic plus the heuristic time value.
    /// Read-only.
    pub fn portfolio_value(&self, now: NaiveDateTime, spot: Decimal) -> Decimal {
        let positions_value: Decimal = self
            .open_positions
            .iter()
            .map(|position| {
                let quantity = Decimal::from(position.quantity);
                let intrinsic =
                    pricing::intrinsic_value(spot, position.strike, position.option_type);
                let days_to_expiry = position.days_to_expiry(now);
                if days_to_expiry <= 0 {
                    intrinsic * quantity
                } else {
                    let time_value = pricing::time_value(position.premium(), days_to_expiry);
                    (intrinsic + time_value) * quantity
                }
            })
            .sum();
        self.capital + positions_value
    }

    /// Append an equity sample for the current step.
    pub fn record_equity(&mut self, timestamp: NaiveDateTime, equity: Decimal) {
        self.equity_curve.push(EquityPoint {
            timestamp,
            equity,
            cash: self.capital,
            open_positions: self.open_positions.len(),
        });
    }

    pub fn initial_capital(&self) -> Decimal {
        self.initial_capital
    }

    pub fn capital(&self) -> Decimal {
        self.capital
    }

    pub fn open_positions(&self) -> &[OptionPosition] {
        &self.open_positions
    }

    pub fn closed_trades(&self) -> &[ClosedTrade] {
        &self.closed_trades
    }

    pub fn equity_curve(&self) -> &[EquityPoint] {
        &self.equity_curve
    }
}
