//! Spot-momentum strategy.
//!
//! Buys an at-the-money call after an up-move beyond the configured
//! threshold and an at-the-money put after a down-move. Premium and
//! implied volatility are fixed heuristics; plain spot history carries no
//! option quotes to price against.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::backtest::{Signal, Strategy};
use crate::data::{MarketRow, OptionType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MomentumConfig {
    /// Fractional spot move that triggers a buy (0.01 = 1%).
    pub threshold: f64,

    /// Premium charged per unit, as a fraction of spot.
    pub premium_fraction: Decimal,

    /// Lot count per signal.
    pub quantity: u32,

    /// Implied volatility attached to every signal (drives decay).
    pub implied_volatility: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            threshold: 0.01,
            premium_fraction: dec!(0.02),
            quantity: 1,
            implied_volatility: 0.20,
        }
    }
}

/// Buys into the direction of the latest spot move.
#[derive(Debug)]
pub struct MomentumStrategy {
    config: MomentumConfig,
    prev_spot: Option<Decimal>,
}

impl MomentumStrategy {
    pub fn new(config: MomentumConfig) -> Self {
        Self {
            config,
            prev_spot: None,
        }
    }
}

impl<R: MarketRow> Strategy<R> for MomentumStrategy {
    fn on_row(&mut self, row: &R) -> Vec<Signal> {
        let spot = row.spot();
        let Some(prev) = self.prev_spot.replace(spot) else {
            // first row has no reference point
            return Vec::new();
        };
        if prev <= Decimal::ZERO {
            return Vec::new();
        }

        let change: f64 = ((spot - prev) / prev).try_into().unwrap_or(0.0);
        if change.abs() < self.config.threshold {
            return Vec::new();
        }

        let option_type = if change > 0.0 {
            OptionType::Call
        } else {
            OptionType::Put
        };
        let premium = spot * self.config.premium_fraction;

        vec![Signal::buy(spot, option_type, premium)
            .quantity(self.config.quantity)
            .implied_volatility(self.config.implied_volatility)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SpotBar;
    use chrono::NaiveDate;

    fn bar(day: u32, spot: Decimal) -> SpotBar {
        SpotBar {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(9, 15, 0)
                .unwrap(),
            spot,
        }
    }

    #[test]
    fn test_no_signal_on_first_row() {
        let mut strategy = MomentumStrategy::new(MomentumConfig::default());
        assert!(strategy.on_row(&bar(1, dec!(100))).is_empty());
    }

    #[test]
    fn test_call_on_up_move() {
        let mut strategy = MomentumStrategy::new(MomentumConfig::default());
        strategy.on_row(&bar(1, dec!(100)));
        let signals = strategy.on_row(&bar(2, dec!(102)));
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].option_type, OptionType::Call);
        assert_eq!(signals[0].strike, dec!(102));
        assert_eq!(signals[0].premium, dec!(102) * dec!(0.02));
    }

    #[test]
    fn test_put_on_down_move() {
        let mut strategy = MomentumStrategy::new(MomentumConfig::default());
        strategy.on_row(&bar(1, dec!(100)));
        let signals = strategy.on_row(&bar(2, dec!(97)));
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].option_type, OptionType::Put);
    }

    #[test]
    fn test_quiet_market_stays_flat() {
        let mut strategy = MomentumStrategy::new(MomentumConfig::default());
        strategy.on_row(&bar(1, dec!(100)));
        assert!(strategy.on_row(&bar(2, dec!(100.5))).is_empty());
    }
}
