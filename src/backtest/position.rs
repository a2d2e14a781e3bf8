//! Position lifecycle types.
//!
//! An [`OptionPosition`] is created by a successful buy, mutated in place
//! by theta decay while it stays open, and leaves the open set exactly
//! once (explicit close or automatic expiry close), becoming an immutable
//! [`ClosedTrade`] record.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::OptionType;

#[derive(Error, Debug)]
pub enum PositionError {
    #[error("strike must be positive, got {0}")]
    InvalidStrike(Decimal),

    #[error("quantity must be positive")]
    InvalidQuantity,

    #[error("expiry {expiry} precedes entry time {entry}")]
    ExpiryBeforeEntry {
        entry: NaiveDateTime,
        expiry: NaiveDateTime,
    },
}

/// An open exchange-traded option holding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionPosition {
    pub strike: Decimal,
    pub option_type: OptionType,
    /// Current per-unit value. Only the decay update mutates this after
    /// entry, so it is kept private behind [`OptionPosition::premium`].
    premium: Decimal,
    pub quantity: u32,
    pub entry_time: NaiveDateTime,
    pub expiry: NaiveDateTime,
    /// Used only for decay; positions without it do not decay.
    pub implied_volatility: Option<f64>,
}

impl OptionPosition {
    pub fn new(
        strike: Decimal,
        option_type: OptionType,
        premium: Decimal,
        quantity: u32,
        entry_time: NaiveDateTime,
        expiry: NaiveDateTime,
        implied_volatility: Option<f64>,
    ) -> Result<Self, PositionError> {
        if strike <= Decimal::ZERO {
            return Err(PositionError::InvalidStrike(strike));
        }
        if quantity == 0 {
            return Err(PositionError::InvalidQuantity);
        }
        if expiry < entry_time {
            return Err(PositionError::ExpiryBeforeEntry {
                entry: entry_time,
                expiry,
            });
        }
        Ok(Self {
            strike,
            option_type,
            premium,
            quantity,
            entry_time,
            expiry,
            implied_volatility,
        })
    }

    /// Current per-unit premium.
    pub fn premium(&self) -> Decimal {
        self.premium
    }

    /// Reduce the premium by a decay amount, floored at zero.
    pub(crate) fn apply_decay(&mut self, amount: Decimal) {
        self.premium = (self.premium - amount).max(Decimal::ZERO);
    }

    /// Whole days until expiry as seen from `now`; partial days truncate
    /// toward zero.
    pub fn days_to_expiry(&self, now: NaiveDateTime) -> i64 {
        (self.expiry - now).num_days()
    }

    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.days_to_expiry(now) <= 0
    }
}

/// Immutable record of a completed round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub entry_time: NaiveDateTime,
    pub exit_time: NaiveDateTime,
    pub strike: Decimal,
    pub option_type: OptionType,
    pub entry_premium: Decimal,
    pub exit_premium: Decimal,
    pub quantity: u32,
    /// `(exit_premium - entry_premium) * quantity`.
    pub pnl: Decimal,
    /// P&L as a percentage of entry cost; zero when the entry cost is zero.
    pub return_pct: f64,
    /// Whole days held; a same-day round trip reads zero.
    pub holding_days: i64,
    /// Intrinsic value at exit, given the exit spot.
    pub intrinsic_value: Decimal,
    pub spot_at_exit: Decimal,
}

impl ClosedTrade {
    pub fn is_winner(&self) -> bool {
        self.pnl > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap()
    }

    #[test]
    fn test_construction_validation() {
        let bad_strike = OptionPosition::new(
            Decimal::ZERO,
            OptionType::Call,
            dec!(5),
            1,
            ts(1),
            ts(30),
            None,
        );
        assert!(matches!(bad_strike, Err(PositionError::InvalidStrike(_))));

        let bad_quantity = OptionPosition::new(
            dec!(100),
            OptionType::Call,
            dec!(5),
            0,
            ts(1),
            ts(30),
            None,
        );
        assert!(matches!(bad_quantity, Err(PositionError::InvalidQuantity)));

        let bad_expiry = OptionPosition::new(
            dec!(100),
            OptionType::Put,
            dec!(5),
            1,
            ts(30),
            ts(1),
            None,
        );
        assert!(matches!(
            bad_expiry,
            Err(PositionError::ExpiryBeforeEntry { .. })
        ));
    }

    #[test]
    fn test_apply_decay_floors_at_zero() {
        let mut position = OptionPosition::new(
            dec!(100),
            OptionType::Call,
            dec!(5),
            1,
            ts(1),
            ts(30),
            Some(0.2),
        )
        .unwrap();

        position.apply_decay(dec!(2));
        assert_eq!(position.premium(), dec!(3));

        position.apply_decay(dec!(10));
        assert_eq!(position.premium(), Decimal::ZERO);
    }

    #[test]
    fn test_days_to_expiry_truncates() {
        let position = OptionPosition::new(
            dec!(100),
            OptionType::Call,
            dec!(5),
            1,
            ts(1),
            ts(10),
            None,
        )
        .unwrap();

        assert_eq!(position.days_to_expiry(ts(1)), 9);
        // 8.5 days out truncates to 8
        let half_day_later = ts(1) + chrono::Duration::hours(12);
        assert_eq!(position.days_to_expiry(half_day_later), 8);
        assert!(position.is_expired(ts(10)));
        assert!(!position.is_expired(ts(9)));
    }
}
