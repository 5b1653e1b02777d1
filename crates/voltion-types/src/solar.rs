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

/// Expected solar generation for one forecast interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarForecastPoint {
    /// Interval start
    pub time: DateTime<Utc>,

    /// Expected generation during the interval (kWh)
    pub generation_kwh: f32,
}

/// Per-interval solar generation forecast, same time basis as the price
/// array.
///
/// The forecast is optional everywhere it is consumed; an empty forecast
/// means zero expected recharge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolarForecast {
    pub points: Vec<SolarForecastPoint>,
}

impl SolarForecast {
    pub fn from_points(points: Vec<SolarForecastPoint>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Total forecast generation for intervals starting in `[start, end)` (kWh).
    ///
    /// Intervals outside the window contribute nothing; a forecast that does
    /// not cover the window at all simply sums to zero.
    #[must_use]
    pub fn generation_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> f32 {
        if end <= start {
            return 0.0;
        }

        self.points
            .iter()
            .filter(|point| point.time >= start && point.time < end)
            .map(|point| point.generation_kwh.max(0.0))
            .sum()
    }
}
