//! Backtesting engine for option-buying strategies.
//!
//! - Position lifecycle (entry, theta decay, expiry settlement, close)
//! - Capital-constrained signal execution
//! - Mark-to-market portfolio valuation
//! - Equity-curve recording

pub mod engine;
pub mod ledger;
pub mod position;
pub mod signal;

pub use engine::{BacktestConfig, BacktestEngine, BacktestError};
pub use ledger::{EquityPoint, Ledger, LedgerError};
pub use position::{ClosedTrade, OptionPosition, PositionError};
pub use signal::{strategy_fn, Signal, Strategy, StrategyFn};
