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

//! Greedy price-ordered slot selection.
//!
//! Discharge picks the most expensive qualifying slots first, charging the
//! cheapest; both stop at their energy budget. Greedy selection is a
//! deliberate heuristic, not a global optimum - see the crate docs.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;
use voltion_types::{BatteryParameters, PriceSlot, SlotKind, SlotSelection};

/// Cap on the total duration of a selection.
///
/// Hosts historically configured "0 hours" to mean "no cap"; that sentinel
/// stays at the host boundary and maps onto an explicit variant here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MaxDuration {
    /// No duration cap; only the energy budget limits selection.
    Unlimited,
    /// At most this many hours in total.
    Bounded(f32),
}

impl MaxDuration {
    /// Map the host-side hours value onto the explicit variant; zero or
    /// negative means uncapped.
    #[must_use]
    pub fn from_hours(hours: f32) -> Self {
        if hours > 0.0 {
            Self::Bounded(hours)
        } else {
            Self::Unlimited
        }
    }

    pub(crate) fn admits(self, total_hours: f32, slot_hours: f32) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Bounded(cap) => total_hours + slot_hours <= cap,
        }
    }
}

/// Pick discharge slots, highest price first, within the tradable budget.
///
/// The budget is the energy above the reserve; the slot that would cross it
/// is truncated and flagged as a partial discharge. Returned slots are
/// re-sorted by start time. Battery trajectory fields are left at zero;
/// the projector fills them.
pub fn select_discharge_slots(
    slots: &[PriceSlot],
    min_sell_price_czk: f32,
    battery: &BatteryParameters,
    slot_duration_hours: f32,
    max_slots: Option<usize>,
    max_duration: MaxDuration,
) -> Vec<SlotSelection> {
    let battery = battery.clamped();
    let budget = battery.tradable_energy_kwh();
    let energy_per_slot = battery.discharge_rate_kw * slot_duration_hours;

    if budget <= 0.0 || energy_per_slot <= 0.0 {
        debug!(
            "Nothing to discharge: budget {:.2} kWh, per-slot {:.2} kWh",
            budget, energy_per_slot
        );
        return Vec::new();
    }

    let mut candidates: Vec<&PriceSlot> = slots
        .iter()
        .filter(|slot| slot.price_czk_per_kwh >= min_sell_price_czk)
        .collect();
    candidates.sort_by(|a, b| {
        b.price_czk_per_kwh
            .partial_cmp(&a.price_czk_per_kwh)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.start.cmp(&b.start))
    });

    let slot_cap = max_slots.unwrap_or(usize::MAX);
    let mut selected = Vec::new();
    let mut committed = 0.0_f32;
    let mut total_hours = 0.0_f32;

    for slot in candidates {
        if selected.len() >= slot_cap {
            break;
        }
        if !max_duration.admits(total_hours, slot_duration_hours) {
            break;
        }
        let remaining = budget - committed;
        if remaining <= 0.0 {
            break;
        }

        let energy = energy_per_slot.min(remaining);
        selected.push(discharge_selection(slot, energy, energy < energy_per_slot));
        committed += energy;
        total_hours += slot_duration_hours;
    }

    selected.sort_by_key(|selection| selection.start);
    debug!(
        "Selected {} discharge slots committing {:.2} of {:.2} kWh",
        selected.len(),
        committed,
        budget
    );
    selected
}

/// Pick charging slots, cheapest first, until the target level is reached.
///
/// The final slot is truncated so the target is not overshot. Already at or
/// above target yields an empty list.
pub fn select_charging_slots(
    slots: &[PriceSlot],
    max_charge_price_czk: f32,
    battery: &BatteryParameters,
    target_level_percent: f32,
    slot_duration_hours: f32,
    max_slots: Option<usize>,
) -> Vec<SlotSelection> {
    let battery = battery.clamped();
    let target = target_level_percent.clamp(0.0, 100.0);
    let needed = (target - battery.level_percent) / 100.0 * battery.capacity_kwh;
    let energy_per_slot = battery.charge_rate_kw * slot_duration_hours;

    if needed <= 0.0 {
        debug!(
            "Battery at {:.1}%, target {:.1}%; no charging needed",
            battery.level_percent, target
        );
        return Vec::new();
    }
    if energy_per_slot <= 0.0 {
        return Vec::new();
    }

    let mut candidates: Vec<&PriceSlot> = slots
        .iter()
        .filter(|slot| slot.price_czk_per_kwh <= max_charge_price_czk)
        .collect();
    candidates.sort_by(|a, b| {
        a.price_czk_per_kwh
            .partial_cmp(&b.price_czk_per_kwh)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.start.cmp(&b.start))
    });

    let slot_cap = max_slots.unwrap_or(usize::MAX);
    let mut selected = Vec::new();
    let mut committed = 0.0_f32;

    for slot in candidates {
        if selected.len() >= slot_cap {
            break;
        }
        let remaining = needed - committed;
        if remaining <= 0.0 {
            break;
        }

        selected.push(charge_selection(slot, energy_per_slot.min(remaining)));
        committed += energy_per_slot.min(remaining);
    }

    selected.sort_by_key(|selection| selection.start);
    debug!(
        "Selected {} charging slots for {:.2} kWh toward {:.1}%",
        selected.len(),
        committed,
        target
    );
    selected
}

pub(crate) fn discharge_selection(
    slot: &PriceSlot,
    energy_kwh: f32,
    partial_discharge: bool,
) -> SlotSelection {
    SlotSelection {
        start: slot.start,
        end: slot.end,
        kind: SlotKind::Discharge,
        energy_kwh,
        price_czk_per_kwh: slot.price_czk_per_kwh,
        revenue_czk: energy_kwh * slot.price_czk_per_kwh,
        cost_czk: 0.0,
        battery_before_kwh: 0.0,
        battery_after_kwh: 0.0,
        partial_discharge,
        slot_count: 1,
    }
}

fn charge_selection(slot: &PriceSlot, energy_kwh: f32) -> SlotSelection {
    SlotSelection {
        start: slot.start,
        end: slot.end,
        kind: SlotKind::Charge,
        energy_kwh,
        price_czk_per_kwh: slot.price_czk_per_kwh,
        revenue_czk: 0.0,
        cost_czk: energy_kwh * slot.price_czk_per_kwh,
        battery_before_kwh: 0.0,
        battery_after_kwh: 0.0,
        partial_discharge: false,
        slot_count: 1,
    }
}
