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

// ============= Pricing Types =============

/// One entry of a day-ahead price export, exactly as the upstream feed
/// delivers it.
///
/// All fields are optional because real exports occasionally carry entries
/// with a missing timestamp or price; normalization skips those instead of
/// rejecting the whole array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPricePoint {
    /// Interval start, RFC 3339, with or without a UTC offset
    #[serde(default)]
    pub start: Option<String>,

    /// Interval end, RFC 3339, with or without a UTC offset
    #[serde(default)]
    pub end: Option<String>,

    /// Price for the interval (CZK/kWh)
    #[serde(default)]
    pub value: Option<f32>,
}

/// A normalized spot-price slot.
///
/// Slots in one array share a uniform duration; the duration is inferred
/// from the first two entries when the array is normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSlot {
    /// Slot start
    pub start: DateTime<Utc>,

    /// Slot end
    pub end: DateTime<Utc>,

    /// Spot price for this slot (CZK/kWh)
    pub price_czk_per_kwh: f32,
}

impl PriceSlot {
    /// Create a slot from explicit bounds and price
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, price_czk_per_kwh: f32) -> Self {
        Self {
            start,
            end,
            price_czk_per_kwh,
        }
    }

    /// Slot length in hours
    #[must_use]
    pub fn duration_hours(&self) -> f32 {
        (self.end - self.start).num_seconds() as f32 / 3600.0
    }
}
