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

//! Normalization of raw day-ahead price exports into uniform slots.
//!
//! Upstream feeds deliver `{start, end, value}` records as strings; entries
//! can be missing fields or carry unparseable stamps. Everything here skips
//! bad records and keeps going - a partial curve is still a usable curve.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};
use voltion_types::{PriceSlot, RawPricePoint};

/// Fallback slot length when the array is too short to infer one (hours).
pub const DEFAULT_SLOT_DURATION_HOURS: f32 = 0.25;

/// Reasons a raw price entry cannot be turned into a usable slot.
#[derive(Debug, Error)]
pub enum PriceDataError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("unparseable timestamp `{0}`")]
    BadTimestamp(String),

    #[error("non-finite price value")]
    BadValue,
}

/// Parse an upstream timestamp, accepting both RFC 3339 and naive forms.
///
/// Some inverter integrations emit timezone-naive stamps; those are read as
/// UTC so mixed feeds stay comparable instead of failing the whole array.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, PriceDataError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }

    Err(PriceDataError::BadTimestamp(raw.to_string()))
}

fn convert_point(point: &RawPricePoint) -> Result<PriceSlot, PriceDataError> {
    let start = point
        .start
        .as_deref()
        .ok_or(PriceDataError::MissingField("start"))?;
    let end = point
        .end
        .as_deref()
        .ok_or(PriceDataError::MissingField("end"))?;
    let value = point.value.ok_or(PriceDataError::MissingField("value"))?;

    if !value.is_finite() {
        return Err(PriceDataError::BadValue);
    }

    Ok(PriceSlot::new(
        parse_timestamp(start)?,
        parse_timestamp(end)?,
        value,
    ))
}

/// Convert a raw price array into typed slots, skipping malformed entries.
pub fn normalize_price_points(raw: &[RawPricePoint]) -> Vec<PriceSlot> {
    let mut slots = Vec::with_capacity(raw.len());

    for (index, point) in raw.iter().enumerate() {
        match convert_point(point) {
            Ok(slot) => slots.push(slot),
            Err(error) => warn!("Skipping malformed price entry {}: {}", index, error),
        }
    }

    slots
}

/// Append tomorrow's slots to today's curve, keeping only slots that start
/// at or after today's last end so overlapping republications are dropped.
#[must_use]
pub fn merge_day_ahead(today: Vec<PriceSlot>, tomorrow: Vec<PriceSlot>) -> Vec<PriceSlot> {
    if today.is_empty() {
        return tomorrow;
    }

    let boundary = today[today.len() - 1].end;
    let mut combined = today;
    let before = combined.len();

    for slot in tomorrow {
        if slot.start >= boundary {
            combined.push(slot);
        }
    }

    debug!(
        "Merged day-ahead data: {} today + {} tomorrow slots",
        before,
        combined.len() - before
    );
    combined
}

/// Infer the uniform slot duration from the first two starts.
///
/// Falls back to 15 minutes when the array is too short or the stamps are
/// not strictly increasing.
#[must_use]
pub fn slot_duration_hours(slots: &[PriceSlot]) -> f32 {
    if slots.len() < 2 {
        return DEFAULT_SLOT_DURATION_HOURS;
    }

    let delta = slots[1].start - slots[0].start;
    let hours = delta.num_seconds() as f32 / 3600.0;
    if hours > 0.0 {
        hours
    } else {
        DEFAULT_SLOT_DURATION_HOURS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw(start: &str, end: &str, value: f32) -> RawPricePoint {
        RawPricePoint {
            start: Some(start.to_string()),
            end: Some(end.to_string()),
            value: Some(value),
        }
    }

    // `hour` may run past 23 to spill into the next day.
    fn slot(hour: i64, minute: i64, duration_minutes: i64, price: f32) -> PriceSlot {
        let start = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap()
            + chrono::Duration::minutes(hour * 60 + minute);
        PriceSlot::new(start, start + chrono::Duration::minutes(duration_minutes), price)
    }

    #[test]
    fn test_normalizes_rfc3339_entries() {
        let points = vec![
            raw("2025-07-01T10:00:00+00:00", "2025-07-01T10:15:00+00:00", 2.5),
            raw("2025-07-01T10:15:00+00:00", "2025-07-01T10:30:00+00:00", 3.0),
        ];

        let slots = normalize_price_points(&points);
        assert_eq!(slots.len(), 2);
        assert_eq!(
            slots[0].start,
            Utc.with_ymd_and_hms(2025, 7, 1, 10, 0, 0).unwrap()
        );
        assert_eq!(slots[1].price_czk_per_kwh, 3.0);
    }

    #[test]
    fn test_naive_timestamps_read_as_utc() {
        let points = vec![raw("2025-07-01 10:00:00", "2025-07-01 11:00:00", 1.8)];

        let slots = normalize_price_points(&points);
        assert_eq!(slots.len(), 1);
        assert_eq!(
            slots[0].end,
            Utc.with_ymd_and_hms(2025, 7, 1, 11, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_malformed_entries_skipped_not_fatal() {
        let points = vec![
            raw("2025-07-01T10:00:00+00:00", "2025-07-01T10:15:00+00:00", 2.5),
            RawPricePoint {
                start: None,
                end: Some("2025-07-01T10:30:00+00:00".to_string()),
                value: Some(1.0),
            },
            raw("not a timestamp", "2025-07-01T10:45:00+00:00", 1.0),
            RawPricePoint {
                start: Some("2025-07-01T10:45:00+00:00".to_string()),
                end: Some("2025-07-01T11:00:00+00:00".to_string()),
                value: Some(f32::NAN),
            },
            raw("2025-07-01T11:00:00+00:00", "2025-07-01T11:15:00+00:00", 4.0),
        ];

        let slots = normalize_price_points(&points);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].price_czk_per_kwh, 4.0);
    }

    #[test]
    fn test_merge_drops_overlapping_tomorrow_slots() {
        let today = vec![slot(22, 0, 60, 2.0), slot(23, 0, 60, 2.2)];
        // First entry republishes today's last hour and must be dropped.
        let tomorrow = vec![slot(23, 0, 60, 2.2), slot(24, 0, 60, 1.1)];

        let combined = merge_day_ahead(today, tomorrow);
        assert_eq!(combined.len(), 3);
        assert_eq!(combined[2].price_czk_per_kwh, 1.1);
    }

    #[test]
    fn test_merge_with_empty_today_keeps_tomorrow() {
        let tomorrow = vec![slot(0, 0, 15, 1.0)];
        let combined = merge_day_ahead(Vec::new(), tomorrow);
        assert_eq!(combined.len(), 1);
    }

    #[test]
    fn test_duration_inferred_from_first_two_starts() {
        let quarter = vec![slot(10, 0, 15, 1.0), slot(10, 15, 15, 1.0)];
        assert!((slot_duration_hours(&quarter) - 0.25).abs() < f32::EPSILON);

        let hourly = vec![slot(10, 0, 60, 1.0), slot(11, 0, 60, 1.0)];
        assert!((slot_duration_hours(&hourly) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_duration_fallback_for_short_or_unordered_arrays() {
        assert_eq!(slot_duration_hours(&[]), DEFAULT_SLOT_DURATION_HOURS);
        assert_eq!(
            slot_duration_hours(&[slot(10, 0, 15, 1.0)]),
            DEFAULT_SLOT_DURATION_HOURS
        );

        let unordered = vec![slot(10, 15, 15, 1.0), slot(10, 0, 15, 1.0)];
        assert_eq!(slot_duration_hours(&unordered), DEFAULT_SLOT_DURATION_HOURS);
    }
}
