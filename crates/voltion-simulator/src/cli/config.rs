// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of VoltION.

//! Simulator configuration loaded from TOML.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;
use voltion_core::TradingConfig;
use voltion_types::BatteryParameters;

/// Simulator settings: the battery under test plus trading thresholds.
///
/// Both sections are optional and every field has a default, so a minimal
/// file only needs the values being tuned. CLI flags override the file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimulatorConfig {
    #[serde(default)]
    pub battery: BatterySection,

    #[serde(default)]
    pub trading: TradingConfig,
}

/// `[battery]` section of the simulator config
#[derive(Debug, Clone, Deserialize)]
pub struct BatterySection {
    /// Usable battery capacity (kWh)
    #[serde(default = "default_capacity_kwh")]
    pub capacity_kwh: f32,

    /// Starting state of charge (%)
    #[serde(default = "default_level_percent")]
    pub level_percent: f32,

    /// Maximum discharge rate (kW)
    #[serde(default = "default_rate_kw")]
    pub discharge_rate_kw: f32,

    /// Maximum charge rate (kW)
    #[serde(default = "default_rate_kw")]
    pub charge_rate_kw: f32,

    /// State of charge the schedule must never go below (%)
    #[serde(default = "default_min_reserve_percent")]
    pub min_reserve_percent: f32,

    /// Round-trip efficiency (%)
    #[serde(default = "default_efficiency_percent")]
    pub round_trip_efficiency_percent: f32,
}

fn default_capacity_kwh() -> f32 {
    10.0
}

fn default_level_percent() -> f32 {
    50.0
}

fn default_rate_kw() -> f32 {
    5.0
}

fn default_min_reserve_percent() -> f32 {
    10.0
}

fn default_efficiency_percent() -> f32 {
    70.0
}

impl Default for BatterySection {
    fn default() -> Self {
        Self {
            capacity_kwh: default_capacity_kwh(),
            level_percent: default_level_percent(),
            discharge_rate_kw: default_rate_kw(),
            charge_rate_kw: default_rate_kw(),
            min_reserve_percent: default_min_reserve_percent(),
            round_trip_efficiency_percent: default_efficiency_percent(),
        }
    }
}

impl BatterySection {
    /// Convert the section into the engine's battery type
    pub fn to_parameters(&self) -> BatteryParameters {
        BatteryParameters {
            capacity_kwh: self.capacity_kwh,
            level_percent: self.level_percent,
            discharge_rate_kw: self.discharge_rate_kw,
            charge_rate_kw: self.charge_rate_kw,
            min_reserve_percent: self.min_reserve_percent,
            round_trip_efficiency_percent: self.round_trip_efficiency_percent,
        }
    }
}

impl SimulatorConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: Self =
            toml::from_str(&content).with_context(|| "Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.battery.capacity_kwh <= 0.0 {
            bail!("battery.capacity_kwh must be positive");
        }
        if !(0.0..=100.0).contains(&self.battery.level_percent) {
            bail!("battery.level_percent must be between 0 and 100");
        }
        if !(0.0..=100.0).contains(&self.battery.min_reserve_percent) {
            bail!("battery.min_reserve_percent must be between 0 and 100");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_full_config_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("simulator.toml");
        std::fs::write(
            &path,
            r#"
            [battery]
            capacity_kwh = 15.0
            level_percent = 40.0
            discharge_rate_kw = 7.0
            charge_rate_kw = 6.0
            min_reserve_percent = 20.0
            round_trip_efficiency_percent = 85.0

            [trading]
            min_forced_sell_price_czk = 3.5
            max_force_charge_price_czk = 1.2
            "#,
        )
        .unwrap();

        let config = SimulatorConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.battery.capacity_kwh, 15.0);
        assert_eq!(config.battery.min_reserve_percent, 20.0);
        assert_eq!(config.trading.min_forced_sell_price_czk, 3.5);
        assert_eq!(config.trading.max_force_charge_price_czk, 1.2);

        let battery = config.battery.to_parameters();
        assert_eq!(battery.discharge_rate_kw, 7.0);
        assert_eq!(battery.round_trip_efficiency_percent, 85.0);
    }

    #[test]
    fn test_partial_sections_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("simulator.toml");
        std::fs::write(
            &path,
            r#"
            [battery]
            level_percent = 25.0
            "#,
        )
        .unwrap();

        let config = SimulatorConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.battery.level_percent, 25.0);
        assert_eq!(config.battery.capacity_kwh, 10.0);
        assert_eq!(config.trading.charge_target_percent, 70.0);
        assert_eq!(config.trading.cache_ttl_secs, 300);
    }

    #[test]
    fn test_invalid_capacity_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("simulator.toml");
        std::fs::write(
            &path,
            r#"
            [battery]
            capacity_kwh = -5.0
            "#,
        )
        .unwrap();

        let error = SimulatorConfig::from_file(path.to_str().unwrap()).unwrap_err();
        assert!(error.to_string().contains("capacity_kwh"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(SimulatorConfig::from_file("/nonexistent/simulator.toml").is_err());
    }
}
