//! # Run a backtest over a spot-history CSV
//! option-backtest run --data data/nifty_daily.csv
//!
//! # Custom capital and trigger threshold, JSON result export
//! option-backtest run --data data/nifty_daily.csv --capital 500000 \
//!     --threshold 0.02 --json results/run.json

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use option_backtest::data::load_spot_history;
use option_backtest::strategy::{MomentumConfig, MomentumStrategy};
use option_backtest::{BacktestConfig, BacktestEngine};

#[derive(Parser)]
#[command(name = "option-backtest")]
#[command(about = "Option-buying backtest engine with heuristic decay pricing")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the momentum strategy over a spot-history CSV
    Run {
        /// Path to a CSV file with `timestamp` and `spot` columns
        #[arg(short, long)]
        data: PathBuf,

        /// Starting capital
        #[arg(long, default_value = "100000")]
        capital: Decimal,

        /// Fractional spot move that triggers a buy (0.01 = 1%)
        #[arg(long, default_value_t = 0.01)]
        threshold: f64,

        /// Write the full result as JSON to this path instead of printing
        /// the summary
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            data,
            capital,
            threshold,
            json,
        } => {
            let bars = load_spot_history(&data)
                .with_context(|| format!("loading {}", data.display()))?;

            let config = BacktestConfig {
                initial_capital: capital,
                ..BacktestConfig::default()
            };
            let mut engine = BacktestEngine::new(config);
            let mut strategy = MomentumStrategy::new(MomentumConfig {
                threshold,
                ..MomentumConfig::default()
            });

            let result = engine.run(&bars, &mut strategy)?;

            match json {
                Some(path) => {
                    fs::write(&path, serde_json::to_string_pretty(&result)?)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Result written to {}", path.display());
                }
                None => println!("{}", result.summary()),
            }
        }
    }

    Ok(())
}
