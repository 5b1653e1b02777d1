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

//! Merging of time-contiguous selections into reported periods.
//!
//! Hosts render one switch action per period, so four adjacent 15-minute
//! picks become a single hour-long discharge. Contiguity is exact timestamp
//! equality; a one-second gap keeps slots apart.

use tracing::debug;
use voltion_types::{BatteryParameters, SlotKind, SlotSelection};

/// Merge maximal contiguous same-kind runs into single records.
///
/// Selections are expected to carry the projected battery trajectory (the
/// optimizer facade always projects before combining). Discharge runs
/// re-check the reserve boundary while merging: the merge stops at the last
/// slot the trajectory can support, truncating it if needed, and a run whose
/// first slot already sits at the reserve is dropped.
pub fn combine_slots(
    selections: &[SlotSelection],
    battery: &BatteryParameters,
) -> Vec<SlotSelection> {
    if selections.is_empty() {
        return Vec::new();
    }

    let reserve_kwh = battery.clamped().reserve_energy_kwh();

    let mut ordered: Vec<&SlotSelection> = selections.iter().collect();
    ordered.sort_by_key(|selection| selection.start);

    let mut combined = Vec::new();
    let mut run: Vec<&SlotSelection> = vec![ordered[0]];

    for slot in &ordered[1..] {
        let previous = run[run.len() - 1];
        if slot.start == previous.end && slot.kind == previous.kind {
            run.push(slot);
        } else {
            combined.extend(merge_run(&run, reserve_kwh));
            run.clear();
            run.push(slot);
        }
    }
    combined.extend(merge_run(&run, reserve_kwh));

    debug!(
        "Combined {} slots into {} consecutive periods (reserve {:.2} kWh)",
        selections.len(),
        combined.len(),
        reserve_kwh
    );
    combined
}

fn merge_run(run: &[&SlotSelection], reserve_kwh: f32) -> Option<SlotSelection> {
    match run[0].kind {
        SlotKind::Discharge => merge_discharge_run(run, reserve_kwh),
        SlotKind::Charge => Some(merge_charge_run(run)),
    }
}

/// Walk the run against the reserve, keeping slots while the trajectory
/// supports them. Returns `None` when not even the first slot is feasible.
fn merge_discharge_run(run: &[&SlotSelection], reserve_kwh: f32) -> Option<SlotSelection> {
    let first = run[0];
    let mut current = first.battery_before_kwh;
    let mut total_energy = 0.0_f32;
    let mut total_revenue = 0.0_f32;
    let mut partial = false;
    let mut included = 0_usize;

    for slot in run {
        let headroom = current - reserve_kwh;
        if headroom <= 0.0 {
            break;
        }

        let energy = slot.energy_kwh.min(headroom);
        let truncated = energy < slot.energy_kwh;
        total_energy += energy;
        total_revenue += if truncated {
            energy * slot.price_czk_per_kwh
        } else {
            slot.revenue_czk
        };
        partial = partial || truncated || slot.partial_discharge;
        current -= energy;
        included += 1;

        if truncated {
            break;
        }
    }

    if included == 0 {
        debug!(
            "Dropping merged period starting {}: battery already at reserve",
            first.start
        );
        return None;
    }
    // Stopping short of the full run means the tail crossed the reserve.
    partial = partial || included < run.len();

    let last = run[included - 1];
    Some(SlotSelection {
        start: first.start,
        end: last.end,
        kind: SlotKind::Discharge,
        energy_kwh: total_energy,
        price_czk_per_kwh: weighted_price(&run[..included], total_energy, total_revenue),
        revenue_czk: total_revenue,
        cost_czk: 0.0,
        battery_before_kwh: first.battery_before_kwh,
        battery_after_kwh: current,
        partial_discharge: partial,
        slot_count: included,
    })
}

fn merge_charge_run(run: &[&SlotSelection]) -> SlotSelection {
    let first = run[0];
    let last = run[run.len() - 1];
    let total_energy: f32 = run.iter().map(|slot| slot.energy_kwh).sum();
    let total_cost: f32 = run.iter().map(|slot| slot.cost_czk).sum();

    let price = if total_energy > 0.0 {
        total_cost / total_energy
    } else {
        run.iter().map(|slot| slot.price_czk_per_kwh).sum::<f32>() / run.len() as f32
    };

    SlotSelection {
        start: first.start,
        end: last.end,
        kind: SlotKind::Charge,
        energy_kwh: total_energy,
        price_czk_per_kwh: price,
        revenue_czk: 0.0,
        cost_czk: total_cost,
        battery_before_kwh: first.battery_before_kwh,
        battery_after_kwh: last.battery_after_kwh,
        partial_discharge: false,
        slot_count: run.len(),
    }
}

/// Energy-weighted average price; equal-energy runs degrade to a plain mean.
fn weighted_price(included: &[&SlotSelection], total_energy: f32, total_revenue: f32) -> f32 {
    if total_energy > 0.0 {
        total_revenue / total_energy
    } else {
        included
            .iter()
            .map(|slot| slot.price_czk_per_kwh)
            .sum::<f32>()
            / included.len() as f32
    }
}
