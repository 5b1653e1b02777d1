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

//! Host-side bundle of trading thresholds.
//!
//! The engine takes explicit parameters on every call; `TradingConfig` is
//! simply the set of values a host keeps configured between calls, with
//! serde defaults so a partial config file still yields a working setup.

use serde::{Deserialize, Serialize};

use crate::optimizer::MaxDuration;

/// Trading thresholds a host passes into each engine call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    /// Minimum price at which exporting makes sense at all (CZK/kWh)
    #[serde(default = "default_min_export_price")]
    pub min_export_price_czk: f32,

    /// Price floor for forced discharge slots (CZK/kWh)
    /// Default: 0.3
    #[serde(default = "default_min_forced_sell_price")]
    pub min_forced_sell_price_czk: f32,

    /// Only charge from grid at or below this price (CZK/kWh)
    /// Default: 0.0, meaning free or negative prices only
    #[serde(default = "default_max_force_charge_price")]
    pub max_force_charge_price_czk: f32,

    /// Daily cap on forced discharge duration (hours, 0 = uncapped)
    #[serde(default = "default_forced_discharge_hours")]
    pub forced_discharge_hours: f32,

    /// Daily cap on forced charging duration (hours)
    #[serde(default = "default_force_charging_hours")]
    pub force_charging_hours: f32,

    /// State of charge forced charging aims for (%)
    #[serde(default = "default_charge_target")]
    pub charge_target_percent: f32,

    /// Discharge floor when the host has no explicit reserve configured (%)
    #[serde(default = "default_min_battery_level")]
    pub min_battery_level_percent: f32,

    /// How long optimization results stay cached (seconds)
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl TradingConfig {
    /// Discharge duration cap as the engine's explicit variant type.
    #[must_use]
    pub fn discharge_duration(&self) -> MaxDuration {
        MaxDuration::from_hours(self.forced_discharge_hours)
    }
}

// Default value functions for serde
fn default_min_export_price() -> f32 {
    0.0125
}
fn default_min_forced_sell_price() -> f32 {
    0.3
}
fn default_max_force_charge_price() -> f32 {
    0.0
}
fn default_forced_discharge_hours() -> f32 {
    2.0
}
fn default_force_charging_hours() -> f32 {
    1.0
}
fn default_charge_target() -> f32 {
    70.0
}
fn default_min_battery_level() -> f32 {
    25.0
}
fn default_cache_ttl() -> u64 {
    300
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            min_export_price_czk: 0.0125,
            min_forced_sell_price_czk: 0.3,
            max_force_charge_price_czk: 0.0,
            forced_discharge_hours: 2.0,
            force_charging_hours: 1.0,
            charge_target_percent: 70.0,
            min_battery_level_percent: 25.0,
            cache_ttl_secs: 300,
        }
    }
}
