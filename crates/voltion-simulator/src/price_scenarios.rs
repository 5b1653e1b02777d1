// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of VoltION.

//! Price scenario definitions for schedule simulation.
//!
//! This module provides pre-defined day-ahead curves that represent
//! typical market conditions:
//!
//! - **Usual Day**: Cheap overnight, elevated day, noon dip, evening peak
//! - **Volatile**: Large price swings with clear arbitrage windows
//! - **Negative Prices**: Midday renewable surplus pushes prices below zero

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use voltion_types::RawPricePoint;

/// Price scenario types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PriceScenario {
    /// "Usual day" - cheap overnight, elevated day, noon dip, evening peak
    UsualDay,

    /// Volatile prices with significant swings (0.5-8 CZK range)
    Volatile,

    /// Contains negative price periods (typically midday)
    NegativePrices,

    /// Custom price curve with explicit prices
    Custom {
        /// 96 prices, one per 15-minute block (CZK/kWh)
        prices: Vec<f32>,
    },
}

impl PriceScenario {
    /// Get the human-readable name of this scenario
    pub fn name(&self) -> &str {
        match self {
            Self::UsualDay => "Usual Day",
            Self::Volatile => "Volatile Prices",
            Self::NegativePrices => "Negative Prices",
            Self::Custom { .. } => "Custom",
        }
    }

    /// Get a description of this scenario
    pub fn description(&self) -> &str {
        match self {
            Self::UsualDay => {
                "Cheap overnight (0-6), elevated day (6-12, 14-17), noon dip (12-14), evening peak (17-20)"
            }
            Self::Volatile => {
                "Large price swings throughout the day, testing arbitrage opportunities"
            }
            Self::NegativePrices => {
                "Contains negative price periods during midday (high renewable generation)"
            }
            Self::Custom { .. } => "User-defined custom price curve",
        }
    }

    /// Generate 96 raw feed points for a day
    pub fn generate_points(&self, date: NaiveDate) -> Vec<RawPricePoint> {
        match self {
            Self::UsualDay => generate_usual_day(date),
            Self::Volatile => generate_volatile(date),
            Self::NegativePrices => generate_negative(date),
            Self::Custom { prices } => points_from_prices(date, prices),
        }
    }
}

/// Price scenario preset with metadata
#[derive(Debug, Clone)]
pub struct PriceScenarioPreset {
    /// Unique identifier
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Description
    pub description: &'static str,
    /// The scenario
    pub scenario: PriceScenario,
}

/// Available price scenario presets
pub const PRICE_PRESETS: &[PriceScenarioPreset] = &[
    PriceScenarioPreset {
        id: "usual_day",
        name: "Usual Day",
        description: "Cheap overnight (0-6), elevated day, noon dip (12-14), evening peak (17-20)",
        scenario: PriceScenario::UsualDay,
    },
    PriceScenarioPreset {
        id: "volatile",
        name: "Volatile",
        description: "Large price swings throughout the day, testing arbitrage opportunities",
        scenario: PriceScenario::Volatile,
    },
    PriceScenarioPreset {
        id: "negative",
        name: "Negative Prices",
        description: "Includes negative price periods during midday (high renewable generation)",
        scenario: PriceScenario::NegativePrices,
    },
];

/// Convert a per-block price array into raw feed points
fn points_from_prices(date: NaiveDate, prices: &[f32]) -> Vec<RawPricePoint> {
    let base_time = date.and_hms_opt(0, 0, 0).unwrap();
    let base_dt = Utc.from_utc_datetime(&base_time);

    prices
        .iter()
        .enumerate()
        .map(|(i, &price)| {
            let start = base_dt + Duration::minutes(i as i64 * 15);
            RawPricePoint {
                start: Some(start.to_rfc3339()),
                end: Some((start + Duration::minutes(15)).to_rfc3339()),
                value: Some(price),
            }
        })
        .collect()
}

/// Generate "Usual Day" price pattern
///
/// Pattern:
/// - 00:00-06:00: 1.50 CZK (cheap overnight)
/// - 06:00-12:00: 3.50 CZK (morning elevated)
/// - 12:00-14:00: 2.80 CZK (noon dip - solar surplus)
/// - 14:00-17:00: 3.20 CZK (afternoon)
/// - 17:00-20:00: 4.50 CZK (evening peak)
/// - 20:00-24:00: 2.50 CZK (late evening decline)
fn generate_usual_day(date: NaiveDate) -> Vec<RawPricePoint> {
    let mut rng = rand::thread_rng();

    let prices: Vec<f32> = (0..96)
        .map(|i| {
            let hour = i / 4;
            let base_price = match hour {
                0..=5 => 1.50,
                6..=11 => 3.50,
                12..=13 => 2.80,
                14..=16 => 3.20,
                17..=19 => 4.50,
                _ => 2.50,
            };

            // Small random noise (+/- 10%)
            let noise = rng.gen_range(-0.10..0.10);
            base_price * (1.0 + noise)
        })
        .collect();

    points_from_prices(date, &prices)
}

/// Generate "Volatile" price pattern
///
/// Swings between 0.5 and 8.2 CZK: deep overnight valley, morning spike,
/// midday solar dip, extreme evening peak.
fn generate_volatile(date: NaiveDate) -> Vec<RawPricePoint> {
    // Format: (start_block, end_block, low_price, high_price)
    let base_pattern: [(usize, usize, f32, f32); 12] = [
        (0, 8, 0.9, 1.5),   // 00:00-02:00 night
        (8, 16, 0.5, 0.9),  // 02:00-04:00 deep valley
        (16, 24, 1.8, 2.6), // 04:00-06:00 ramp
        (24, 32, 5.5, 6.8), // 06:00-08:00 morning spike
        (32, 40, 3.2, 4.0), // 08:00-10:00 pullback
        (40, 52, 1.4, 2.1), // 10:00-13:00 solar dip
        (52, 60, 2.4, 3.1), // 13:00-15:00 recovery
        (60, 68, 4.5, 5.4), // 15:00-17:00 ramp
        (68, 76, 7.2, 8.2), // 17:00-19:00 extreme peak
        (76, 84, 5.0, 6.0), // 19:00-21:00 decline
        (84, 92, 2.2, 3.0), // 21:00-23:00 evening
        (92, 96, 1.2, 1.8), // 23:00-24:00 late night
    ];

    let mut rng = rand::thread_rng();

    let prices: Vec<f32> = (0..96)
        .map(|i| {
            let (low, high) = base_pattern
                .iter()
                .find(|&&(start, end, _, _)| i >= start && i < end)
                .map(|&(_, _, low, high)| (low, high))
                .unwrap_or((2.0, 3.0));

            rng.gen_range(low..high)
        })
        .collect();

    points_from_prices(date, &prices)
}

/// Generate "Negative Prices" pattern
///
/// Contains negative prices during midday (11:00-14:00) simulating
/// high renewable generation periods
fn generate_negative(date: NaiveDate) -> Vec<RawPricePoint> {
    let mut rng = rand::thread_rng();

    let prices: Vec<f32> = (0..96)
        .map(|i| {
            let hour = i / 4;
            let base_price: f32 = match hour {
                0..=5 => 1.20,
                6..=10 => 2.80,
                11..=13 => -0.60, // NEGATIVE - solar surplus
                14..=16 => 2.20,
                17..=20 => 4.20,
                _ => 2.00,
            };

            // Smaller noise around negative prices
            let noise_range: f32 = if base_price < 0.0 { 0.3 } else { 0.15 };
            let noise: f32 = rng.gen_range(-noise_range..noise_range);
            base_price + base_price.abs() * noise
        })
        .collect();

    points_from_prices(date, &prices)
}
