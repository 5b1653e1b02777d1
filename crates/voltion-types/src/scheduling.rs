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

/// Direction of energy flow for a selected slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    /// Export battery energy to the grid
    Discharge,
    /// Import grid energy into the battery
    Charge,
}

/// One selected slot of a discharge or charge schedule.
///
/// Records are ephemeral: each optimization cycle builds them fresh from the
/// caller-supplied price array and battery parameters. When consecutive slots
/// are combined, one record covers the whole period and `slot_count` tells
/// how many source slots it merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotSelection {
    /// Period start
    pub start: DateTime<Utc>,

    /// Period end
    pub end: DateTime<Utc>,

    /// Discharge or charge
    pub kind: SlotKind,

    /// Energy moved during this period (kWh)
    pub energy_kwh: f32,

    /// Spot price; energy-weighted average when slots were merged (CZK/kWh)
    pub price_czk_per_kwh: f32,

    /// Expected sale revenue for a discharge period (CZK)
    pub revenue_czk: f32,

    /// Expected purchase cost for a charge period (CZK)
    pub cost_czk: f32,

    /// Projected battery energy entering this period (kWh)
    pub battery_before_kwh: f32,

    /// Projected battery energy leaving this period (kWh)
    pub battery_after_kwh: f32,

    /// True when the reserve floor truncated this period below its
    /// rate-implied energy
    pub partial_discharge: bool,

    /// Number of source slots merged into this record (1 unless combined)
    pub slot_count: usize,
}

impl SlotSelection {
    /// Period length in hours
    #[must_use]
    pub fn duration_hours(&self) -> f32 {
        (self.end - self.start).num_seconds() as f32 / 3600.0
    }

    /// Whether `time` falls inside this period (start inclusive, end exclusive)
    #[must_use]
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.start <= time && time < self.end
    }
}
