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

//! Chronological battery-state projection across discharge selections.
//!
//! Walks the selections in time order with a running energy level, applies
//! solar recharge in the gaps, and enforces the reserve: a slot the battery
//! cannot fully serve is truncated to the remainder above the reserve, or
//! dropped when nothing remains. This is what makes two price peaks
//! separated by a sunny gap both schedulable in one day.

use chrono::{DateTime, Utc};
use tracing::debug;
use voltion_types::{BatteryParameters, SlotSelection, SolarForecast};

/// Project the battery level through `selections`, returning the feasible
/// subset with `battery_before_kwh`/`battery_after_kwh` filled in.
///
/// Each record's `energy_kwh` is its requested discharge; truncation marks
/// `partial_discharge` and recomputes revenue. Input order does not matter,
/// the walk always runs in start-time order. Ending a slot exactly on the
/// reserve is feasible.
pub fn project_battery_states(
    selections: &[SlotSelection],
    initial_energy_kwh: f32,
    battery: &BatteryParameters,
    solar_forecast: Option<&SolarForecast>,
) -> Vec<SlotSelection> {
    let battery = battery.clamped();
    let reserve = battery.reserve_energy_kwh();
    let mut current = initial_energy_kwh.clamp(0.0, battery.capacity_kwh);

    let mut ordered: Vec<&SlotSelection> = selections.iter().collect();
    ordered.sort_by_key(|selection| selection.start);

    let mut projected = Vec::with_capacity(ordered.len());
    let mut previous_end: Option<DateTime<Utc>> = None;

    for slot in ordered {
        // Recharge accrues over the gap to the previous candidate whether or
        // not that candidate turned out to be feasible.
        if let (Some(forecast), Some(prev_end)) = (solar_forecast, previous_end) {
            if slot.start > prev_end {
                let generated = forecast.generation_between(prev_end, slot.start);
                if generated > 0.0 {
                    current = (current + generated).min(battery.capacity_kwh);
                    debug!(
                        "Solar recharge +{:.2} kWh between {} and {} (battery at {:.2} kWh)",
                        generated, prev_end, slot.start, current
                    );
                }
            }
        }
        previous_end = Some(slot.end);

        let headroom = current - reserve;
        if headroom <= 0.0 {
            debug!(
                "Dropping slot {}: battery {:.2} kWh at or below reserve {:.2} kWh",
                slot.start, current, reserve
            );
            continue;
        }

        let energy = slot.energy_kwh.min(headroom);
        if energy <= 0.0 {
            continue;
        }

        let mut adjusted = slot.clone();
        adjusted.energy_kwh = energy;
        adjusted.revenue_czk = energy * slot.price_czk_per_kwh;
        adjusted.partial_discharge = slot.partial_discharge || energy < slot.energy_kwh;
        adjusted.battery_before_kwh = current;
        current -= energy;
        adjusted.battery_after_kwh = current;

        debug!(
            "Slot {} feasible: {:.2} -> {:.2} kWh (discharge {:.2} kWh)",
            slot.start, adjusted.battery_before_kwh, adjusted.battery_after_kwh, energy
        );
        projected.push(adjusted);
    }

    projected
}

/// Fill the battery trajectory for a charging run, clamping at capacity.
///
/// Charging has no reserve interaction; this is pure bookkeeping so hosts
/// can render the expected level curve.
pub fn assign_charging_trajectory(
    selections: &mut [SlotSelection],
    initial_energy_kwh: f32,
    capacity_kwh: f32,
) {
    let capacity = capacity_kwh.max(0.0);
    let mut current = initial_energy_kwh.clamp(0.0, capacity);

    for selection in selections.iter_mut() {
        selection.battery_before_kwh = current;
        current = (current + selection.energy_kwh).min(capacity);
        selection.battery_after_kwh = current;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use voltion_types::{SlotKind, SolarForecastPoint};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, hour, minute, 0).unwrap()
    }

    fn discharge_request(hour: u32, energy_kwh: f32, price: f32) -> SlotSelection {
        let start = at(hour, 0);
        SlotSelection {
            start,
            end: start + Duration::hours(1),
            kind: SlotKind::Discharge,
            energy_kwh,
            price_czk_per_kwh: price,
            revenue_czk: energy_kwh * price,
            cost_czk: 0.0,
            battery_before_kwh: 0.0,
            battery_after_kwh: 0.0,
            partial_discharge: false,
            slot_count: 1,
        }
    }

    fn midday_forecast() -> SolarForecast {
        SolarForecast::from_points(vec![
            SolarForecastPoint {
                time: at(11, 0),
                generation_kwh: 1.2,
            },
            SolarForecastPoint {
                time: at(13, 0),
                generation_kwh: 0.8,
            },
        ])
    }

    fn create_test_battery() -> BatteryParameters {
        BatteryParameters {
            capacity_kwh: 10.0,
            level_percent: 50.0,
            discharge_rate_kw: 5.0,
            charge_rate_kw: 5.0,
            min_reserve_percent: 10.0,
            round_trip_efficiency_percent: 70.0,
        }
    }

    #[test]
    fn test_solar_gap_makes_both_peaks_feasible() {
        // 5 kWh to start, 1 kWh reserve, two 3 kWh peaks with 2 kWh of solar
        // between them: 5 -> 2, recharge to 4, 4 -> 1 (exactly the reserve).
        let peaks = vec![
            discharge_request(9, 3.0, 4.0),
            discharge_request(15, 3.0, 5.0),
        ];

        let projected = project_battery_states(
            &peaks,
            5.0,
            &create_test_battery(),
            Some(&midday_forecast()),
        );

        assert_eq!(projected.len(), 2);
        assert_eq!(projected[0].battery_before_kwh, 5.0);
        assert_eq!(projected[0].battery_after_kwh, 2.0);
        assert_eq!(projected[1].battery_before_kwh, 4.0);
        assert_eq!(projected[1].battery_after_kwh, 1.0);
        assert!(projected.iter().all(|s| !s.partial_discharge));
    }

    #[test]
    fn test_oversized_peak_truncates_at_reserve() {
        let peaks = vec![
            discharge_request(9, 3.0, 4.0),
            discharge_request(15, 4.0, 5.0),
        ];

        let projected = project_battery_states(
            &peaks,
            5.0,
            &create_test_battery(),
            Some(&midday_forecast()),
        );

        assert_eq!(projected.len(), 2);
        let second = &projected[1];
        assert!((second.energy_kwh - 3.0).abs() < 1e-6);
        assert!(second.partial_discharge);
        assert_eq!(second.battery_after_kwh, 1.0);
        assert!((second.revenue_czk - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_slot_at_reserve_dropped_until_solar_refills() {
        let peaks = vec![
            discharge_request(9, 3.0, 4.0),
            discharge_request(15, 3.0, 5.0),
        ];

        let projected = project_battery_states(
            &peaks,
            1.0,
            &create_test_battery(),
            Some(&midday_forecast()),
        );

        // Morning peak starts at the reserve and is skipped; the recharge
        // only supports a partial afternoon discharge.
        assert_eq!(projected.len(), 1);
        assert_eq!(projected[0].start, at(15, 0));
        assert_eq!(projected[0].battery_before_kwh, 3.0);
        assert!((projected[0].energy_kwh - 2.0).abs() < 1e-6);
        assert!(projected[0].partial_discharge);
    }

    #[test]
    fn test_level_declines_monotonically_without_forecast() {
        let slots = vec![
            discharge_request(8, 1.25, 3.0),
            discharge_request(9, 1.25, 3.0),
            discharge_request(10, 1.25, 3.0),
        ];

        let projected = project_battery_states(&slots, 5.0, &create_test_battery(), None);

        assert_eq!(projected.len(), 3);
        assert_eq!(projected[0].battery_before_kwh, 5.0);
        assert_eq!(projected[2].battery_after_kwh, 1.25);
        assert!(
            projected
                .windows(2)
                .all(|pair| pair[1].battery_before_kwh == pair[0].battery_after_kwh)
        );
    }

    #[test]
    fn test_recharge_never_exceeds_capacity() {
        let bright = SolarForecast::from_points(vec![SolarForecastPoint {
            time: at(12, 0),
            generation_kwh: 6.0,
        }]);
        let peaks = vec![
            discharge_request(9, 0.5, 4.0),
            discharge_request(15, 3.0, 5.0),
        ];

        let projected =
            project_battery_states(&peaks, 9.5, &create_test_battery(), Some(&bright));

        assert_eq!(projected[1].battery_before_kwh, 10.0);
    }

    #[test]
    fn test_unsorted_input_walked_in_time_order() {
        let peaks = vec![
            discharge_request(15, 3.0, 5.0),
            discharge_request(9, 3.0, 4.0),
        ];

        let projected = project_battery_states(
            &peaks,
            5.0,
            &create_test_battery(),
            Some(&midday_forecast()),
        );

        assert_eq!(projected[0].start, at(9, 0));
        assert_eq!(projected[0].battery_before_kwh, 5.0);
        assert_eq!(projected[1].battery_before_kwh, 4.0);
    }

    #[test]
    fn test_charging_trajectory_accumulates_toward_capacity() {
        let start = at(2, 0);
        let mut selections = vec![
            SlotSelection {
                start,
                end: start + Duration::minutes(15),
                kind: SlotKind::Charge,
                energy_kwh: 1.25,
                price_czk_per_kwh: 0.0,
                revenue_czk: 0.0,
                cost_czk: 0.0,
                battery_before_kwh: 0.0,
                battery_after_kwh: 0.0,
                partial_discharge: false,
                slot_count: 1,
            },
            SlotSelection {
                start: start + Duration::minutes(15),
                end: start + Duration::minutes(30),
                kind: SlotKind::Charge,
                energy_kwh: 0.75,
                price_czk_per_kwh: 0.0,
                revenue_czk: 0.0,
                cost_czk: 0.0,
                battery_before_kwh: 0.0,
                battery_after_kwh: 0.0,
                partial_discharge: false,
                slot_count: 1,
            },
        ];

        assign_charging_trajectory(&mut selections, 5.0, 10.0);

        assert_eq!(selections[0].battery_before_kwh, 5.0);
        assert_eq!(selections[0].battery_after_kwh, 6.25);
        assert_eq!(selections[1].battery_after_kwh, 7.0);
    }
}
