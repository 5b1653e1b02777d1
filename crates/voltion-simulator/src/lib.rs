// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of VoltION.

//! VoltION Schedule Simulator
//!
//! Runs the slot optimization engine against synthetic price scenarios or
//! exported price data and renders the resulting schedules as tables or CSV.
//! Useful for threshold tuning and regression checks without a live host.

pub mod cli;
pub mod price_scenarios;

pub use cli::{Cli, Commands};
pub use price_scenarios::{PRICE_PRESETS, PriceScenario, PriceScenarioPreset};
