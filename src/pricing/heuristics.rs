//! Pure valuation functions.
//!
//! All functions here are total over finite inputs and side-effect free.
//! `theta_decay` and `time_value` are heuristic proxies: theta is not a
//! real Greek, and time value is a rough linear ramp, both inherited from
//! the simulation design rather than derived from a pricing model.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::data::OptionType;

/// In-the-money value of an option if exercised at the given spot.
///
/// Calls pay `max(0, spot - strike)`, puts pay `max(0, strike - spot)`.
pub fn intrinsic_value(spot: Decimal, strike: Decimal, option_type: OptionType) -> Decimal {
    match option_type {
        OptionType::Call => (spot - strike).max(Decimal::ZERO),
        OptionType::Put => (strike - spot).max(Decimal::ZERO),
    }
}

/// Per-day premium decay.
///
/// Returns the full premium once expiry is reached (`days_to_expiry <= 0`),
/// otherwise `iv * premium / (days_to_expiry + 1)`. The rate grows as
/// expiry approaches; the `+ 1` keeps the divisor positive at one day out
/// while true expiry is handled by the `<= 0` branch.
pub fn theta_decay(days_to_expiry: i64, premium: Decimal, implied_volatility: f64) -> Decimal {
    if days_to_expiry <= 0 {
        return premium;
    }
    let iv = Decimal::from_f64(implied_volatility).unwrap_or_default();
    iv * premium / Decimal::from(days_to_expiry + 1)
}

/// Remaining time value of an open position's premium.
///
/// `max(0, premium * 0.1 * days_to_expiry / 30)`, a rough linear ramp used
/// only for marking open positions in portfolio valuation.
pub fn time_value(premium: Decimal, days_to_expiry: i64) -> Decimal {
    let raw = premium * dec!(0.1) * Decimal::from(days_to_expiry) / dec!(30);
    raw.max(Decimal::ZERO)
}
