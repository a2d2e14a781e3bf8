pub mod backtest;
pub mod data;
pub mod metrics;
pub mod pricing;
pub mod strategy;

// Re-export commonly used types
pub use backtest::{
    BacktestConfig, BacktestEngine, BacktestError, ClosedTrade, EquityPoint, Ledger, LedgerError,
    OptionPosition, PositionError, Signal, Strategy,
};
pub use data::{LoaderError, MarketRow, OptionType, SpotBar};
pub use metrics::{BacktestResult, MetricsCalculator};
