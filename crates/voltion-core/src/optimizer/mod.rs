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

//! The optimizer facade: selection, projection, combination and arbitrage
//! behind cached entry points.
//!
//! Hosts call [`TradeOptimizer`] once per polling cycle with fresh price
//! curves and the current battery state. Every entry point returns a
//! well-typed (possibly empty) list; nothing here errors out to the caller.

pub mod arbitrage;
pub mod combiner;
pub mod projector;
pub mod selector;

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use voltion_types::{
    ArbitrageOpportunity, BatteryParameters, RawPricePoint, SlotSelection, SolarForecast,
};

pub use selector::MaxDuration;

use crate::cache::{CacheKey, ResultCache};
use crate::config::TradingConfig;
use crate::pricing;

/// Inputs for one discharge-scheduling pass.
#[derive(Debug, Clone, Copy)]
pub struct DischargeRequest<'a> {
    /// Today's raw price curve.
    pub today: &'a [RawPricePoint],

    /// Tomorrow's curve once published; merged after today's last slot.
    pub tomorrow: Option<&'a [RawPricePoint]>,

    pub battery: &'a BatteryParameters,

    /// Slots priced below this never discharge.
    pub min_sell_price_czk: f32,

    /// Cap on the number of selected slots.
    pub max_slots: Option<usize>,

    /// Cap on the total selected duration.
    pub max_duration: MaxDuration,

    /// Enables multi-peak planning across solar recharge gaps.
    pub solar_forecast: Option<&'a SolarForecast>,
}

/// Inputs for one charge-scheduling pass.
#[derive(Debug, Clone, Copy)]
pub struct ChargeRequest<'a> {
    pub today: &'a [RawPricePoint],

    pub tomorrow: Option<&'a [RawPricePoint]>,

    pub battery: &'a BatteryParameters,

    /// Only slots at or below this price charge from the grid.
    pub max_charge_price_czk: f32,

    /// State of charge to reach (%).
    pub target_level_percent: f32,

    pub max_slots: Option<usize>,

    /// Expected generation; reduces how much grid charging gets scheduled.
    pub solar_forecast: Option<&'a SolarForecast>,
}

/// Inputs for an arbitrage scan.
#[derive(Debug, Clone, Copy)]
pub struct ArbitrageRequest<'a> {
    pub today: &'a [RawPricePoint],

    pub tomorrow: Option<&'a [RawPricePoint]>,

    pub battery: &'a BatteryParameters,

    /// Pairs below this profit are not reported.
    pub min_profit_czk: f32,
}

/// True when `now` falls inside any selection's `[start, end)` window.
///
/// Hosts drive their forced-discharge / forced-charge switch from this.
#[must_use]
pub fn is_slot_active(selections: &[SlotSelection], now: DateTime<Utc>) -> bool {
    selections.iter().any(|selection| selection.contains(now))
}

/// Facade composing normalization, selection, projection and combination,
/// with per-operation TTL caching.
///
/// Cache keys are built from scalar parameters (battery figures, thresholds,
/// curve lengths), so a re-poll that delivers an identical-shape curve
/// within the TTL is served from cache. A TTL of zero disables caching.
pub struct TradeOptimizer {
    cache_ttl: Duration,
    selection_cache: Mutex<ResultCache<Vec<SlotSelection>>>,
    opportunity_cache: Mutex<ResultCache<Vec<ArbitrageOpportunity>>>,
}

impl TradeOptimizer {
    #[must_use]
    pub fn new(cache_ttl_secs: u64) -> Self {
        Self {
            cache_ttl: Duration::seconds(cache_ttl_secs as i64),
            selection_cache: Mutex::new(ResultCache::new()),
            opportunity_cache: Mutex::new(ResultCache::new()),
        }
    }

    #[must_use]
    pub fn from_config(config: &TradingConfig) -> Self {
        Self::new(config.cache_ttl_secs)
    }

    /// Schedule discharge slots for the given horizon.
    pub fn discharge_schedule(&self, request: &DischargeRequest<'_>) -> Vec<SlotSelection> {
        let key = CacheKey::new(
            "discharge_schedule",
            &(
                request.today.len(),
                request.tomorrow.map(<[RawPricePoint]>::len),
                request.min_sell_price_czk,
                request.battery.capacity_kwh,
                request.battery.level_percent,
                request.battery.discharge_rate_kw,
                request.battery.min_reserve_percent,
                request.max_slots,
                request.max_duration,
                request.solar_forecast.map(SolarForecast::len),
            ),
        );

        self.selection_cache
            .lock()
            .get_or_compute(key, self.cache_ttl, || compute_discharge(request))
    }

    /// Schedule charging slots toward the requested level.
    pub fn charging_schedule(&self, request: &ChargeRequest<'_>) -> Vec<SlotSelection> {
        let key = CacheKey::new(
            "charging_schedule",
            &(
                request.today.len(),
                request.tomorrow.map(<[RawPricePoint]>::len),
                request.max_charge_price_czk,
                request.battery.capacity_kwh,
                request.battery.level_percent,
                request.battery.charge_rate_kw,
                request.target_level_percent,
                request.max_slots,
                request.solar_forecast.map(SolarForecast::len),
            ),
        );

        self.selection_cache
            .lock()
            .get_or_compute(key, self.cache_ttl, || compute_charging(request))
    }

    /// Scan the horizon for charge-then-discharge opportunities.
    pub fn arbitrage_opportunities(
        &self,
        request: &ArbitrageRequest<'_>,
    ) -> Vec<ArbitrageOpportunity> {
        let key = CacheKey::new(
            "arbitrage_opportunities",
            &(
                request.today.len(),
                request.tomorrow.map(<[RawPricePoint]>::len),
                request.battery.capacity_kwh,
                request.battery.charge_rate_kw,
                request.battery.discharge_rate_kw,
                request.battery.round_trip_efficiency_percent,
                request.min_profit_czk,
            ),
        );

        self.opportunity_cache
            .lock()
            .get_or_compute(key, self.cache_ttl, || compute_arbitrage(request))
    }

    /// Drop all cached results, forcing fresh computation on the next call.
    pub fn clear_cache(&self) {
        self.selection_cache.lock().clear();
        self.opportunity_cache.lock().clear();
    }
}

impl Default for TradeOptimizer {
    /// Five-minute TTL, matching the host default.
    fn default() -> Self {
        Self::new(300)
    }
}

fn compute_discharge(request: &DischargeRequest<'_>) -> Vec<SlotSelection> {
    let battery = request.battery.clamped();
    let slots = merged_horizon(request.today, request.tomorrow);
    if slots.is_empty() {
        warn!("No price data available for discharge slot selection");
        return Vec::new();
    }

    let slot_duration = pricing::slot_duration_hours(&slots);
    let available = battery.available_energy_kwh();

    let projected = if let Some(forecast) = request.solar_forecast.filter(|f| !f.is_empty()) {
        // Multi-peak path: project every qualifying slot at full rate, then
        // keep the most valuable feasible ones. The static budget would
        // forfeit energy that solar puts back between peaks.
        let energy_per_slot = battery.discharge_rate_kw * slot_duration;
        if energy_per_slot <= 0.0 {
            return Vec::new();
        }

        let candidates: Vec<SlotSelection> = slots
            .iter()
            .filter(|slot| slot.price_czk_per_kwh >= request.min_sell_price_czk)
            .map(|slot| selector::discharge_selection(slot, energy_per_slot, false))
            .collect();
        let feasible =
            projector::project_battery_states(&candidates, available, &battery, Some(forecast));
        debug!(
            "Projected {} of {} qualifying slots as feasible with solar recharge",
            feasible.len(),
            candidates.len()
        );
        cap_by_value(feasible, request.max_slots, request.max_duration, slot_duration)
    } else {
        let selected = selector::select_discharge_slots(
            &slots,
            request.min_sell_price_czk,
            &battery,
            slot_duration,
            request.max_slots,
            request.max_duration,
        );
        projector::project_battery_states(&selected, available, &battery, None)
    };

    combiner::combine_slots(&projected, &battery)
}

fn compute_charging(request: &ChargeRequest<'_>) -> Vec<SlotSelection> {
    let battery = request.battery.clamped();
    let slots = merged_horizon(request.today, request.tomorrow);
    if slots.is_empty() {
        warn!("No price data available for charging slot selection");
        return Vec::new();
    }

    let slot_duration = pricing::slot_duration_hours(&slots);

    let mut target = request.target_level_percent;
    if let Some(forecast) = request.solar_forecast.filter(|f| !f.is_empty()) {
        if battery.capacity_kwh > 0.0 {
            let horizon_generation =
                forecast.generation_between(slots[0].start, slots[slots.len() - 1].end);
            let solar_level_gain = horizon_generation / battery.capacity_kwh * 100.0;

            if battery.level_percent + solar_level_gain >= target {
                info!(
                    "Solar forecast covers the charge target ({:.1}% + {:.1}%); skipping grid charging",
                    battery.level_percent, solar_level_gain
                );
                return Vec::new();
            }
            target -= solar_level_gain;
            debug!("Solar forecast lowers the charge target to {:.1}%", target);
        }
    }

    let mut selected = selector::select_charging_slots(
        &slots,
        request.max_charge_price_czk,
        &battery,
        target,
        slot_duration,
        request.max_slots,
    );
    projector::assign_charging_trajectory(
        &mut selected,
        battery.available_energy_kwh(),
        battery.capacity_kwh,
    );
    combiner::combine_slots(&selected, &battery)
}

fn compute_arbitrage(request: &ArbitrageRequest<'_>) -> Vec<ArbitrageOpportunity> {
    let slots = merged_horizon(request.today, request.tomorrow);
    if slots.is_empty() {
        warn!("No price data available for arbitrage analysis");
        return Vec::new();
    }
    arbitrage::find_opportunities(&slots, request.battery, request.min_profit_czk)
}

fn merged_horizon(
    today: &[RawPricePoint],
    tomorrow: Option<&[RawPricePoint]>,
) -> Vec<voltion_types::PriceSlot> {
    let today = pricing::normalize_price_points(today);
    let tomorrow = tomorrow
        .map(pricing::normalize_price_points)
        .unwrap_or_default();
    pricing::merge_day_ahead(today, tomorrow)
}

// Price-ordered cap pass for the solar path; selection happened implicitly
// by projecting every candidate, so the caps apply afterwards.
fn cap_by_value(
    feasible: Vec<SlotSelection>,
    max_slots: Option<usize>,
    max_duration: MaxDuration,
    slot_duration_hours: f32,
) -> Vec<SlotSelection> {
    let mut by_price = feasible;
    by_price.sort_by(|a, b| {
        b.price_czk_per_kwh
            .partial_cmp(&a.price_czk_per_kwh)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.start.cmp(&b.start))
    });

    let slot_cap = max_slots.unwrap_or(usize::MAX);
    let mut kept = Vec::new();
    let mut total_hours = 0.0_f32;

    for slot in by_price {
        if kept.len() >= slot_cap {
            break;
        }
        if !max_duration.admits(total_hours, slot_duration_hours) {
            break;
        }
        total_hours += slot_duration_hours;
        kept.push(slot);
    }

    kept.sort_by_key(|selection| selection.start);
    kept
}

// ============= Schedule Economics =============

pub mod economics {
    //! Pure helpers for summarizing a schedule's totals.

    use voltion_types::SlotSelection;

    #[must_use]
    pub fn total_energy_kwh(selections: &[SlotSelection]) -> f32 {
        selections.iter().map(|s| s.energy_kwh).sum()
    }

    #[must_use]
    pub fn total_revenue_czk(selections: &[SlotSelection]) -> f32 {
        selections.iter().map(|s| s.revenue_czk).sum()
    }

    #[must_use]
    pub fn total_cost_czk(selections: &[SlotSelection]) -> f32 {
        selections.iter().map(|s| s.cost_czk).sum()
    }

    /// Revenue minus cost across the whole schedule.
    #[must_use]
    pub fn net_profit_czk(selections: &[SlotSelection]) -> f32 {
        total_revenue_czk(selections) - total_cost_czk(selections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use voltion_types::SolarForecastPoint;

    fn raw_day(prices: &[f32]) -> Vec<RawPricePoint> {
        let base = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, price)| {
                let start = base + Duration::minutes(15 * i as i64);
                RawPricePoint {
                    start: Some(start.to_rfc3339()),
                    end: Some((start + Duration::minutes(15)).to_rfc3339()),
                    value: Some(*price),
                }
            })
            .collect()
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
    fn test_end_to_end_discharge_merges_evening_peak() {
        // Flat cheap day with four contiguous expensive quarter-hours.
        let mut prices = vec![0.5_f32; 16];
        prices[8] = 4.0;
        prices[9] = 4.0;
        prices[10] = 4.0;
        prices[11] = 4.0;
        let today = raw_day(&prices);
        let battery = create_test_battery();

        let optimizer = TradeOptimizer::new(0);
        let schedule = optimizer.discharge_schedule(&DischargeRequest {
            today: &today,
            tomorrow: None,
            battery: &battery,
            min_sell_price_czk: 1.0,
            max_slots: None,
            max_duration: MaxDuration::Unlimited,
            solar_forecast: None,
        });

        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].slot_count, 4);
        assert!((schedule[0].energy_kwh - 4.0).abs() < 1e-6);
        assert!(schedule[0].partial_discharge);
        assert_eq!(schedule[0].battery_after_kwh, 1.0);
    }

    #[test]
    fn test_solar_gap_unlocks_second_peak() {
        // Morning and evening peaks of 3 kWh each around a sunny gap; the
        // static 4 kWh budget alone could not serve both in full.
        let base = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        let mut prices = vec![0.1_f32; 24];
        prices[9] = 3.0;
        prices[18] = 3.5;
        let today: Vec<RawPricePoint> = prices
            .iter()
            .enumerate()
            .map(|(i, price)| {
                let start = base + Duration::hours(i as i64);
                RawPricePoint {
                    start: Some(start.to_rfc3339()),
                    end: Some((start + Duration::hours(1)).to_rfc3339()),
                    value: Some(*price),
                }
            })
            .collect();
        let battery = BatteryParameters {
            discharge_rate_kw: 3.0,
            ..create_test_battery()
        };
        let forecast = SolarForecast::from_points(vec![
            SolarForecastPoint {
                time: base + Duration::hours(12),
                generation_kwh: 1.0,
            },
            SolarForecastPoint {
                time: base + Duration::hours(13),
                generation_kwh: 1.0,
            },
        ]);

        let optimizer = TradeOptimizer::new(0);
        let schedule = optimizer.discharge_schedule(&DischargeRequest {
            today: &today,
            tomorrow: None,
            battery: &battery,
            min_sell_price_czk: 1.0,
            max_slots: None,
            max_duration: MaxDuration::Unlimited,
            solar_forecast: Some(&forecast),
        });

        assert_eq!(schedule.len(), 2);
        assert!((schedule[0].energy_kwh - 3.0).abs() < 1e-6);
        assert!((schedule[1].energy_kwh - 3.0).abs() < 1e-6);
        assert_eq!(schedule[1].battery_after_kwh, 1.0);
    }

    #[test]
    fn test_same_shape_curve_hits_cache_until_cleared() {
        let today_a = raw_day(&[0.5, 3.0, 0.5, 0.5]);
        // Same length, different peak position: the scalar key cannot tell
        // them apart, which is exactly the caching contract.
        let today_b = raw_day(&[3.0, 0.5, 0.5, 0.5]);
        let battery = create_test_battery();

        let optimizer = TradeOptimizer::new(300);
        let request_a = DischargeRequest {
            today: &today_a,
            tomorrow: None,
            battery: &battery,
            min_sell_price_czk: 1.0,
            max_slots: None,
            max_duration: MaxDuration::Unlimited,
            solar_forecast: None,
        };
        let request_b = DischargeRequest {
            today: &today_b,
            ..request_a
        };

        let first = optimizer.discharge_schedule(&request_a);
        let cached = optimizer.discharge_schedule(&request_b);
        assert_eq!(first[0].start, cached[0].start);

        optimizer.clear_cache();
        let fresh = optimizer.discharge_schedule(&request_b);
        assert_ne!(first[0].start, fresh[0].start);
    }

    #[test]
    fn test_identical_requests_idempotent() {
        let today = raw_day(&[0.5, 3.0, 2.0, 0.5, 4.0, 0.5]);
        let battery = create_test_battery();

        let cached = TradeOptimizer::new(300);
        let uncached = TradeOptimizer::new(0);
        let request = DischargeRequest {
            today: &today,
            tomorrow: None,
            battery: &battery,
            min_sell_price_czk: 1.0,
            max_slots: None,
            max_duration: MaxDuration::Unlimited,
            solar_forecast: None,
        };

        let a = cached.discharge_schedule(&request);
        let b = cached.discharge_schedule(&request);
        let c = uncached.discharge_schedule(&request);

        assert_eq!(a.len(), b.len());
        assert_eq!(a.len(), c.len());
        for (x, y) in a.iter().zip(c.iter()) {
            assert_eq!(x.start, y.start);
            assert!((x.energy_kwh - y.energy_kwh).abs() < 1e-6);
        }
    }

    #[test]
    fn test_charging_skips_grid_when_solar_covers_target() {
        let today = raw_day(&[0.0, 0.0, 0.0, 0.0]);
        let battery = create_test_battery();
        let base = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        let bright = SolarForecast::from_points(vec![SolarForecastPoint {
            time: base + Duration::minutes(30),
            generation_kwh: 3.0,
        }]);

        let optimizer = TradeOptimizer::new(0);
        let request = ChargeRequest {
            today: &today,
            tomorrow: None,
            battery: &battery,
            max_charge_price_czk: 0.0,
            target_level_percent: 70.0,
            max_slots: None,
            solar_forecast: Some(&bright),
        };

        assert!(optimizer.charging_schedule(&request).is_empty());

        let without_solar = ChargeRequest {
            solar_forecast: None,
            ..request
        };
        assert!(!optimizer.charging_schedule(&without_solar).is_empty());
    }

    #[test]
    fn test_active_slot_lookup_half_open() {
        let base = Utc.with_ymd_and_hms(2025, 7, 1, 17, 0, 0).unwrap();
        let today = raw_day(&[5.0]);
        let battery = create_test_battery();

        let optimizer = TradeOptimizer::new(0);
        let schedule = optimizer.discharge_schedule(&DischargeRequest {
            today: &today,
            tomorrow: None,
            battery: &battery,
            min_sell_price_czk: 1.0,
            max_slots: None,
            max_duration: MaxDuration::Unlimited,
            solar_forecast: None,
        });

        assert_eq!(schedule.len(), 1);
        let start = schedule[0].start;
        assert!(is_slot_active(&schedule, start));
        assert!(is_slot_active(&schedule, start + Duration::minutes(10)));
        assert!(!is_slot_active(&schedule, schedule[0].end));
        assert!(!is_slot_active(&[], base));
    }

    #[test]
    fn test_empty_price_array_empty_schedule() {
        let battery = create_test_battery();
        let optimizer = TradeOptimizer::new(0);

        let schedule = optimizer.discharge_schedule(&DischargeRequest {
            today: &[],
            tomorrow: None,
            battery: &battery,
            min_sell_price_czk: 0.0,
            max_slots: None,
            max_duration: MaxDuration::Unlimited,
            solar_forecast: None,
        });
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_schedule_economics_sums() {
        let today = raw_day(&[0.5, 3.0, 3.0, 0.5]);
        let battery = create_test_battery();
        let optimizer = TradeOptimizer::new(0);

        let schedule = optimizer.discharge_schedule(&DischargeRequest {
            today: &today,
            tomorrow: None,
            battery: &battery,
            min_sell_price_czk: 1.0,
            max_slots: None,
            max_duration: MaxDuration::Unlimited,
            solar_forecast: None,
        });

        let energy = economics::total_energy_kwh(&schedule);
        let revenue = economics::total_revenue_czk(&schedule);
        assert!((energy - 2.5).abs() < 1e-6);
        assert!((revenue - 7.5).abs() < 1e-5);
        assert_eq!(economics::total_cost_czk(&schedule), 0.0);
        assert!((economics::net_profit_czk(&schedule) - 7.5).abs() < 1e-5);
    }
}
