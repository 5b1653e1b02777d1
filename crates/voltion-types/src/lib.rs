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

pub mod battery;
pub mod pricing;
pub mod scheduling;
pub mod solar;
pub mod trading;

// Re-export common types for convenience
pub use battery::BatteryParameters;
pub use pricing::{PriceSlot, RawPricePoint};
pub use scheduling::{SlotKind, SlotSelection};
pub use solar::{SolarForecast, SolarForecastPoint};
pub use trading::{ArbitrageOpportunity, TimeWindow};
