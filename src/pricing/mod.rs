//! Heuristic option valuation.
//!
//! These helpers are deliberate approximations, not a pricing model: they
//! exist so the ledger can mark positions without market quotes. They are
//! isolated here so a real model can replace them without touching ledger
//! logic.

pub mod heuristics;

pub use heuristics::{intrinsic_value, theta_decay, time_value};
