// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of VoltION.

//! CLI module for the schedule simulator command-line interface.

pub mod args;
pub mod config;
pub mod data_loaders;
pub mod formatters;

pub use args::{ArbitrageArgs, ChargeArgs, Cli, Commands, ScheduleArgs};
pub use config::SimulatorConfig;
pub use data_loaders::{DataLoader, JsonExportLoader, PriceDay, SolarProfile, SyntheticLoader};
pub use formatters::{CsvFormatter, TableFormatter};
