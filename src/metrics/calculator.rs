//! Statistics aggregator.
//!
//! Reduces the final closed-trade log and equity curve into a
//! [`BacktestResult`]. Degenerate inputs (no trades, flat curves) produce
//! well-defined defaults rather than errors; the aggregator never fails.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::backtest::{ClosedTrade, EquityPoint};

/// Sharpe annualization factor.
///
/// Assumes one equity sample per trading day (~252 per year). Curves
/// sampled at a different cadence are annualized with the same factor, so
/// compare Sharpe values only across runs with equal sampling intervals.
pub const PERIODS_PER_YEAR: f64 = 252.0;

/// Summary of a completed backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    pub total_pnl: Decimal,
    pub total_trades: usize,
    pub winning_trades: usize,
    /// Trades with P&L <= 0; break-even trades count as losses.
    pub losing_trades: usize,
    pub win_rate: f64,
    /// Mean P&L of winning trades, zero when there are none.
    pub avg_profit: Decimal,
    /// Mean P&L of losing trades (a non-positive number), zero when there
    /// are none.
    pub avg_loss: Decimal,
    /// Largest peak-to-trough equity decline as a fraction of the peak.
    pub max_drawdown: f64,
    /// Annualized risk-adjusted return; absent when the curve has fewer
    /// than two samples or zero return variance.
    pub sharpe_ratio: Option<f64>,
    pub initial_capital: Decimal,
    pub final_capital: Decimal,
    pub total_return_pct: f64,
    pub trades: Vec<ClosedTrade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl BacktestResult {
    /// Generate a summary string.
    pub fn summary(&self) -> String {
        let sharpe = self
            .sharpe_ratio
            .map(|s| format!("{s:.2}"))
            .unwrap_or_else(|| "n/a".to_string());
        format!(
            "Backtest Results\n\
             ----------------------------------------\n\
             Total P&L: {:.2}\n\
             Total Return: {:.2}%\n\
             Final Capital: {:.2}\n\
             \n\
             Trades: {} (W: {}, L: {})\n\
             Win Rate: {:.1}%\n\
             Avg Win: {:.2}\n\
             Avg Loss: {:.2}\n\
             \n\
             Max Drawdown: {:.2}%\n\
             Sharpe Ratio: {}",
            self.total_pnl,
            self.total_return_pct,
            self.final_capital,
            self.total_trades,
            self.winning_trades,
            self.losing_trades,
            self.win_rate * 100.0,
            self.avg_profit,
            self.avg_loss,
            self.max_drawdown * 100.0,
            sharpe,
        )
    }
}

/// Metrics calculator.
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Reduce a run's trade log and equity curve into a result summary.
    pub fn calculate(
        trades: Vec<ClosedTrade>,
        equity_curve: Vec<EquityPoint>,
        initial_capital: Decimal,
        final_capital: Decimal,
    ) -> BacktestResult {
        let total_trades = trades.len();
        let winning_trades = trades.iter().filter(|t| t.is_winner()).count();
        let losing_trades = total_trades - winning_trades;
        let win_rate = if total_trades > 0 {
            winning_trades as f64 / total_trades as f64
        } else {
            0.0
        };

        let total_pnl: Decimal = trades.iter().map(|t| t.pnl).sum();
        let gross_profit: Decimal = trades.iter().filter(|t| t.is_winner()).map(|t| t.pnl).sum();
        let gross_loss: Decimal = trades.iter().filter(|t| !t.is_winner()).map(|t| t.pnl).sum();

        let avg_profit = if winning_trades > 0 {
            gross_profit / Decimal::from(winning_trades as i64)
        } else {
            Decimal::ZERO
        };
        let avg_loss = if losing_trades > 0 {
            gross_loss / Decimal::from(losing_trades as i64)
        } else {
            Decimal::ZERO
        };

        let max_drawdown = Self::max_drawdown(&equity_curve);
        let sharpe_ratio = Self::sharpe_ratio(&equity_curve);

        let initial: f64 = initial_capital.try_into().unwrap_or(1.0);
        let final_value: f64 = final_capital.try_into().unwrap_or(1.0);
        let total_return_pct = if initial > 0.0 {
            (final_value - initial) / initial * 100.0
        } else {
            0.0
        };

        BacktestResult {
            total_pnl,
            total_trades,
            winning_trades,
            losing_trades,
            win_rate,
            avg_profit,
            avg_loss,
            max_drawdown,
            sharpe_ratio,
            initial_capital,
            final_capital,
            total_return_pct,
            trades,
            equity_curve,
        }
    }

    /// Largest decline from a running equity peak, as a positive fraction.
    fn max_drawdown(equity_curve: &[EquityPoint]) -> f64 {
        let mut peak = f64::NEG_INFINITY;
        let mut worst = 0.0_f64;
        for point in equity_curve {
            let equity: f64 = point.equity.try_into().unwrap_or(0.0);
            if equity > peak {
                peak = equity;
            }
            if peak > 0.0 {
                let drawdown = (equity - peak) / peak;
                if drawdown < worst {
                    worst = drawdown;
                }
            }
        }
        worst.abs()
    }

    /// Annualized Sharpe ratio over period-to-period percentage returns.
    ///
    /// `None` when the curve has fewer than two samples or the return
    /// standard deviation is not strictly positive.
    fn sharpe_ratio(equity_curve: &[EquityPoint]) -> Option<f64> {
        if equity_curve.len() < 2 {
            return None;
        }

        let returns: Vec<f64> = equity_curve
            .windows(2)
            .map(|w| {
                let prev: f64 = w[0].equity.try_into().unwrap_or(1.0);
                let curr: f64 = w[1].equity.try_into().unwrap_or(1.0);
                (curr - prev) / prev
            })
            .collect();

        let mean = returns.iter().sum::<f64>() / returns.len() as f64;
        let variance =
            returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
        let std_dev = variance.sqrt();

        if std_dev > 0.0 {
            Some(mean / std_dev * PERIODS_PER_YEAR.sqrt())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::OptionType;
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal_macros::dec;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap()
    }

    fn trade(pnl: Decimal) -> ClosedTrade {
        ClosedTrade {
            entry_time: ts(1),
            exit_time: ts(2),
            strike: dec!(100),
            option_type: OptionType::Call,
            entry_premium: dec!(5),
            exit_premium: dec!(5) + pnl,
            quantity: 1,
            pnl,
            return_pct: 0.0,
            holding_days: 1,
            intrinsic_value: Decimal::ZERO,
            spot_at_exit: dec!(100),
        }
    }

    fn curve(values: &[Decimal]) -> Vec<EquityPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &equity)| EquityPoint {
                timestamp: ts(i as u32 + 1),
                equity,
                cash: equity,
                open_positions: 0,
            })
            .collect()
    }

    #[test]
    fn test_empty_inputs_yield_canonical_result() {
        let result =
            MetricsCalculator::calculate(Vec::new(), Vec::new(), dec!(1000), dec!(1000));
        assert_eq!(result.total_trades, 0);
        assert_eq!(result.total_pnl, Decimal::ZERO);
        assert_eq!(result.win_rate, 0.0);
        assert_eq!(result.avg_profit, Decimal::ZERO);
        assert_eq!(result.avg_loss, Decimal::ZERO);
        assert_eq!(result.max_drawdown, 0.0);
        assert!(result.sharpe_ratio.is_none());
        assert!(result.trades.is_empty());
    }

    #[test]
    fn test_break_even_counts_as_loss() {
        let trades = vec![trade(dec!(10)), trade(Decimal::ZERO), trade(dec!(-5))];
        let result = MetricsCalculator::calculate(trades, Vec::new(), dec!(1000), dec!(1005));

        assert_eq!(result.total_trades, 3);
        assert_eq!(result.winning_trades, 1);
        assert_eq!(result.losing_trades, 2);
        assert_eq!(
            result.winning_trades + result.losing_trades,
            result.total_trades
        );
        assert!((result.win_rate - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(result.total_pnl, dec!(5));
    }

    #[test]
    fn test_bucket_averages() {
        let trades = vec![
            trade(dec!(10)),
            trade(dec!(20)),
            trade(dec!(-4)),
            trade(dec!(-8)),
        ];
        let result = MetricsCalculator::calculate(trades, Vec::new(), dec!(1000), dec!(1018));
        assert_eq!(result.avg_profit, dec!(15));
        assert_eq!(result.avg_loss, dec!(-6));
    }

    #[test]
    fn test_max_drawdown() {
        let points = curve(&[dec!(100), dec!(120), dec!(90), dec!(110)]);
        let result = MetricsCalculator::calculate(Vec::new(), points, dec!(100), dec!(110));
        // peak 120, trough 90
        assert!((result.max_drawdown - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_drawdown_within_unit_interval() {
        let points = curve(&[dec!(50), dec!(0), dec!(80), dec!(40)]);
        let result = MetricsCalculator::calculate(Vec::new(), points, dec!(50), dec!(40));
        assert!(result.max_drawdown >= 0.0);
        assert!(result.max_drawdown <= 1.0);
    }

    #[test]
    fn test_sharpe_absent_for_degenerate_curves() {
        // fewer than two samples
        let single = curve(&[dec!(100)]);
        let result = MetricsCalculator::calculate(Vec::new(), single, dec!(100), dec!(100));
        assert!(result.sharpe_ratio.is_none());

        // flat curve: zero variance
        let flat = curve(&[dec!(100), dec!(100), dec!(100)]);
        let result = MetricsCalculator::calculate(Vec::new(), flat, dec!(100), dec!(100));
        assert!(result.sharpe_ratio.is_none());
    }

    #[test]
    fn test_sharpe_annualization() {
        // returns 0.10 and 0.05: mean 0.075, population stdev 0.025
        let points = curve(&[dec!(100), dec!(110), dec!(115.5)]);
        let result = MetricsCalculator::calculate(Vec::new(), points, dec!(100), dec!(115.5));
        let sharpe = result.sharpe_ratio.unwrap();
        assert!((sharpe - 3.0 * PERIODS_PER_YEAR.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric_returns_give_zero_sharpe() {
        // +10% then -10%: mean zero, stdev 0.1
        let points = curve(&[dec!(100), dec!(110), dec!(99)]);
        let result = MetricsCalculator::calculate(Vec::new(), points, dec!(100), dec!(99));
        let sharpe = result.sharpe_ratio.unwrap();
        assert!(sharpe.abs() < 1e-12);
    }

    #[test]
    fn test_summary_renders_absent_sharpe() {
        let result =
            MetricsCalculator::calculate(Vec::new(), Vec::new(), dec!(1000), dec!(1000));
        assert!(result.summary().contains("Sharpe Ratio: n/a"));
    }
}
