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

use serde::{Deserialize, Serialize};

/// Battery parameters supplied by the host for one optimization cycle.
///
/// The host maps its own entity values into this struct; the engine never
/// reads hardware state itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryParameters {
    /// Usable battery capacity (kWh)
    pub capacity_kwh: f32,

    /// Current state of charge (%)
    pub level_percent: f32,

    /// Maximum discharge rate (kW)
    pub discharge_rate_kw: f32,

    /// Maximum charge rate (kW)
    pub charge_rate_kw: f32,

    /// State of charge the battery must never be discharged below (%)
    pub min_reserve_percent: f32,

    /// Round-trip efficiency (%), applied to arbitrage revenue
    pub round_trip_efficiency_percent: f32,
}

impl BatteryParameters {
    /// Energy currently stored in the battery (kWh)
    #[must_use]
    pub fn available_energy_kwh(&self) -> f32 {
        self.capacity_kwh * self.level_percent / 100.0
    }

    /// Energy below which the battery must not be discharged (kWh)
    #[must_use]
    pub fn reserve_energy_kwh(&self) -> f32 {
        self.capacity_kwh * self.min_reserve_percent / 100.0
    }

    /// Energy available for export above the reserve (kWh), floored at zero
    #[must_use]
    pub fn tradable_energy_kwh(&self) -> f32 {
        (self.available_energy_kwh() - self.reserve_energy_kwh()).max(0.0)
    }

    /// Copy with out-of-range inputs clamped to safe values.
    ///
    /// Negative capacity and rates become 0; percentages are clamped to
    /// 0-100. Bad host data degrades to an empty schedule, never a panic.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            capacity_kwh: self.capacity_kwh.max(0.0),
            level_percent: self.level_percent.clamp(0.0, 100.0),
            discharge_rate_kw: self.discharge_rate_kw.max(0.0),
            charge_rate_kw: self.charge_rate_kw.max(0.0),
            min_reserve_percent: self.min_reserve_percent.clamp(0.0, 100.0),
            round_trip_efficiency_percent: self.round_trip_efficiency_percent.clamp(0.0, 100.0),
        }
    }
}

impl Default for BatteryParameters {
    fn default() -> Self {
        Self {
            capacity_kwh: 10.0,
            level_percent: 50.0,
            discharge_rate_kw: 5.0,
            charge_rate_kw: 5.0,
            min_reserve_percent: 10.0,
            round_trip_efficiency_percent: 70.0,
        }
    }
}
