// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of VoltION.

//! Data loaders for turning various sources into optimizer inputs.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use std::path::Path;

use crate::price_scenarios::{PRICE_PRESETS, PriceScenario};
use voltion_types::{RawPricePoint, SolarForecast, SolarForecastPoint};

/// One simulated day of optimizer inputs
#[derive(Debug, Clone)]
pub struct PriceDay {
    /// Day the curve covers
    pub date: NaiveDate,

    /// Display name of the source
    pub source_name: String,

    /// Today's raw curve
    pub today: Vec<RawPricePoint>,

    /// Tomorrow's curve when available
    pub tomorrow: Option<Vec<RawPricePoint>>,

    /// Solar forecast when available
    pub solar: Option<SolarForecast>,
}

/// Trait for loading data from various sources into `PriceDay` form
pub trait DataLoader {
    /// Load data for the specified date (if applicable)
    fn load(&self, date: Option<NaiveDate>) -> Result<PriceDay>;
}

/// Resolve a scenario id from the CLI to a preset
pub fn find_scenario(id: &str) -> Result<PriceScenario> {
    PRICE_PRESETS
        .iter()
        .find(|preset| preset.id == id)
        .map(|preset| preset.scenario.clone())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown scenario '{}'; available: usual_day, volatile, negative",
                id
            )
        })
}

/// Synthetic solar generation profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolarProfile {
    /// No generation
    None,
    /// Spring/fall day (~12 kWh, 07:00-18:00)
    Moderate,
    /// Summer day (~24 kWh, 05:00-21:00)
    High,
}

/// ~12 kWh spread over 07:00-18:00
const MODERATE_HOURLY: [f32; 11] = [0.3, 0.7, 1.1, 1.5, 1.7, 1.8, 1.7, 1.5, 1.1, 0.4, 0.2];

/// ~24 kWh spread over 05:00-21:00
const HIGH_HOURLY: [f32; 16] = [
    0.3, 0.8, 1.3, 1.8, 2.2, 2.5, 2.6, 2.6, 2.5, 2.2, 1.8, 1.4, 1.0, 0.6, 0.3, 0.1,
];

impl SolarProfile {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "none" => Some(Self::None),
            "moderate" => Some(Self::Moderate),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Hourly forecast for `date`, `None` for the flat profile
    pub fn forecast(&self, date: NaiveDate) -> Option<SolarForecast> {
        let (first_hour, hourly): (u32, &[f32]) = match self {
            Self::None => return None,
            Self::Moderate => (7, &MODERATE_HOURLY),
            Self::High => (5, &HIGH_HOURLY),
        };

        let base_time = date.and_hms_opt(0, 0, 0)?;
        let base_dt = Utc.from_utc_datetime(&base_time);

        let points = hourly
            .iter()
            .enumerate()
            .map(|(offset, &generation_kwh)| SolarForecastPoint {
                time: base_dt + Duration::hours(i64::from(first_hour) + offset as i64),
                generation_kwh,
            })
            .collect();

        Some(SolarForecast::from_points(points))
    }
}

/// Loader for synthetic data using built-in scenarios
pub struct SyntheticLoader {
    pub scenario: PriceScenario,
    pub solar: SolarProfile,
    pub with_tomorrow: bool,
}

impl DataLoader for SyntheticLoader {
    fn load(&self, date: Option<NaiveDate>) -> Result<PriceDay> {
        let date = date.unwrap_or_else(|| Utc::now().date_naive());
        let today = self.scenario.generate_points(date);
        let tomorrow = self
            .with_tomorrow
            .then(|| self.scenario.generate_points(date + Duration::days(1)));

        Ok(PriceDay {
            date,
            source_name: self.scenario.name().to_owned(),
            today,
            tomorrow,
            solar: self.solar.forecast(date),
        })
    }
}

/// Loader for JSON price export files
pub struct JsonExportLoader {
    json_path: String,
}

impl JsonExportLoader {
    pub fn new(json_path: String) -> Self {
        Self { json_path }
    }
}

#[derive(Debug, Deserialize)]
struct PriceExport {
    today: Vec<RawPricePoint>,

    #[serde(default)]
    tomorrow: Option<Vec<RawPricePoint>>,

    #[serde(default)]
    solar_forecast: Option<Vec<SolarForecastPoint>>,
}

impl DataLoader for JsonExportLoader {
    fn load(&self, _date: Option<NaiveDate>) -> Result<PriceDay> {
        let content = std::fs::read_to_string(&self.json_path)
            .with_context(|| format!("Failed to read JSON file: {}", self.json_path))?;

        let export: PriceExport = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON file: {}", self.json_path))?;

        // The export's first parseable start stamp names the day
        let date = export
            .today
            .first()
            .and_then(|point| point.start.as_deref())
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc).date_naive())
            .unwrap_or_else(|| Utc::now().date_naive());

        Ok(PriceDay {
            date,
            source_name: format!(
                "JSON Export ({})",
                Path::new(&self.json_path)
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            ),
            today: export.today,
            tomorrow: export.tomorrow.filter(|points| !points.is_empty()),
            solar: export
                .solar_forecast
                .filter(|points| !points.is_empty())
                .map(SolarForecast::from_points),
        })
    }
}
