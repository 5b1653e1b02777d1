// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of VoltION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! VoltION Slot Optimization Engine
//!
//! This crate schedules battery charge/discharge actions against a day-ahead
//! price curve: sell into the expensive slots, buy the cheap ones, never dip
//! below the configured reserve.
//!
//! ## Features
//!
//! - **Slot Selection**: Greedy price-ordered discharge and charging picks
//! - **Battery Projection**: Chronological feasibility walk with solar
//!   recharge between price peaks
//! - **Slot Combination**: Contiguous slots merged into host-facing periods
//! - **Arbitrage Detection**: Charge-then-discharge pair search with
//!   efficiency-adjusted profit
//! - **Result Caching**: TTL memoization of whole optimizer passes
//!
//! The greedy selection plus feasibility projection is a deliberate
//! heuristic: outputs are good schedules, not provably optimal ones. The
//! engine is purely computational - no I/O, no clocks beyond cache aging,
//! and every entry point returns a well-typed (possibly empty) result
//! rather than an error.

pub mod cache;
pub mod config;
pub mod optimizer;
pub mod pricing;

pub use cache::{CacheKey, ResultCache};
pub use config::TradingConfig;
pub use optimizer::{
    ArbitrageRequest, ChargeRequest, DischargeRequest, MaxDuration, TradeOptimizer, economics,
    is_slot_active,
};
pub use pricing::{
    DEFAULT_SLOT_DURATION_HOURS, merge_day_ahead, normalize_price_points, slot_duration_hours,
};
