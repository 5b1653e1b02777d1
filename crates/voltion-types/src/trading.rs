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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Half-open time window `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window length in hours
    #[must_use]
    pub fn duration_hours(&self) -> f32 {
        (self.end - self.start).num_seconds() as f32 / 3600.0
    }
}

/// A profitable charge-then-discharge pair found in one price curve.
///
/// Profit is already adjusted for round-trip efficiency; `roi_percent` is 0
/// when the charge price is 0 (free energy has no meaningful cost base).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    /// When to buy
    pub charge_window: TimeWindow,

    /// When to sell
    pub discharge_window: TimeWindow,

    /// Purchase price (CZK/kWh)
    pub charge_price_czk_per_kwh: f32,

    /// Sale price (CZK/kWh)
    pub discharge_price_czk_per_kwh: f32,

    /// Energy cycled through the battery for this pair (kWh)
    pub energy_kwh: f32,

    /// Efficiency-adjusted revenue minus cost (CZK)
    pub profit_czk: f32,

    /// Profit relative to cost (%)
    pub roi_percent: f32,
}
