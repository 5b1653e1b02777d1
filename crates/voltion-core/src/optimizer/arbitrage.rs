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

//! Buy-low/sell-high pair search over the price curve.
//!
//! Considers every ordered pair of slots where charging finishes before the
//! discharge starts, pricing in the round-trip efficiency loss. Quadratic in
//! slot count, which stays trivial at 96-192 slots per horizon.

use std::cmp::Ordering;

use tracing::debug;
use voltion_types::{ArbitrageOpportunity, BatteryParameters, PriceSlot, TimeWindow};

/// Scan ordered slot pairs for profitable charge-then-discharge cycles.
///
/// Transferable energy per pair is the lesser of what the charge and
/// discharge windows can move at their rates. Revenue is reduced by the
/// round-trip efficiency; pairs below `min_profit_czk` are not reported.
/// Results are sorted by profit, ties by earliest charge start.
pub fn find_opportunities(
    slots: &[PriceSlot],
    battery: &BatteryParameters,
    min_profit_czk: f32,
) -> Vec<ArbitrageOpportunity> {
    let battery = battery.clamped();
    let efficiency = battery.round_trip_efficiency_percent / 100.0;

    if slots.len() < 2 || battery.charge_rate_kw <= 0.0 || battery.discharge_rate_kw <= 0.0 {
        return Vec::new();
    }

    let mut opportunities = Vec::new();

    for charge in slots {
        for discharge in slots {
            if charge.start >= discharge.start {
                continue;
            }

            let energy_kwh = (battery.charge_rate_kw * charge.duration_hours())
                .min(battery.discharge_rate_kw * discharge.duration_hours());
            if energy_kwh <= 0.0 {
                continue;
            }

            let cost = energy_kwh * charge.price_czk_per_kwh;
            let revenue = energy_kwh * discharge.price_czk_per_kwh * efficiency;
            let profit = revenue - cost;

            if profit < min_profit_czk {
                continue;
            }

            let roi_percent = if cost > 0.0 { profit / cost * 100.0 } else { 0.0 };

            opportunities.push(ArbitrageOpportunity {
                charge_window: TimeWindow::new(charge.start, charge.end),
                discharge_window: TimeWindow::new(discharge.start, discharge.end),
                charge_price_czk_per_kwh: charge.price_czk_per_kwh,
                discharge_price_czk_per_kwh: discharge.price_czk_per_kwh,
                energy_kwh,
                profit_czk: profit,
                roi_percent,
            });
        }
    }

    opportunities.sort_by(|a, b| {
        b.profit_czk
            .partial_cmp(&a.profit_czk)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.charge_window.start.cmp(&b.charge_window.start))
    });

    debug!(
        "Found {} arbitrage opportunities above {:.2} CZK profit",
        opportunities.len(),
        min_profit_czk
    );
    opportunities
}
