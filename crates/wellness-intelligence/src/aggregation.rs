// ABOUTME: Daily bucketing of irregular raw telemetry samples by calendar date
// ABOUTME: Sum, mean, and sleep interval-duration policies with per-policy rounding
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw-sample aggregation into daily buckets.
//!
//! Samples arrive at irregular timestamps; each aggregation policy groups
//! them by UTC calendar date and reduces them to one value per day. An empty
//! sample set yields an empty map, never an error — downstream code treats a
//! missing metric map as zeros.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use wellness_core::constants::SLEEP_STAGE_CODES;
use wellness_core::RawSample;

/// Nanoseconds per minute, for interval-duration conversion
const NANOS_PER_MINUTE: f64 = 60.0 * 1_000_000_000.0;

/// How a metric's samples reduce into one value per calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationPolicy {
    /// Sum sample values, grouped by the date of the start timestamp,
    /// rounded to the nearest integer
    Sum,
    /// Arithmetic mean of sample values, grouped by the date of the start
    /// timestamp, rounded to 2 decimal places
    Mean,
    /// Sum of interval durations in minutes over recognized sleep stages,
    /// grouped by the date of the **end** timestamp, rounded to the nearest
    /// integer
    SleepIntervalSum,
}

/// Aggregate one metric's raw samples into daily buckets.
///
/// Returns a map from UTC calendar date to the aggregated value under the
/// given policy. Empty input yields an empty map.
#[must_use]
pub fn aggregate_daily(
    samples: &[RawSample],
    policy: AggregationPolicy,
) -> BTreeMap<NaiveDate, f64> {
    match policy {
        AggregationPolicy::Sum => sum_by_start_date(samples),
        AggregationPolicy::Mean => mean_by_start_date(samples),
        AggregationPolicy::SleepIntervalSum => sleep_minutes_by_end_date(samples),
    }
}

fn sum_by_start_date(samples: &[RawSample]) -> BTreeMap<NaiveDate, f64> {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for sample in samples {
        let date = sample.start_time().date_naive();
        *totals.entry(date).or_insert(0.0) += sample.value.as_f64();
    }
    for value in totals.values_mut() {
        *value = value.round();
    }
    totals
}

fn mean_by_start_date(samples: &[RawSample]) -> BTreeMap<NaiveDate, f64> {
    let mut sums: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
    for sample in samples {
        let date = sample.start_time().date_naive();
        let entry = sums.entry(date).or_insert((0.0, 0));
        entry.0 += sample.value.as_f64();
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(date, (sum, count))| (date, round_2dp(sum / f64::from(count))))
        .collect()
}

/// Sleep segments count only when their stage code is a recognized sleep
/// stage; each segment's minutes are attributed to the date it ended, so a
/// night spanning midnight lands on the morning date.
fn sleep_minutes_by_end_date(samples: &[RawSample]) -> BTreeMap<NaiveDate, f64> {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for sample in samples {
        let Some(stage) = sample.value.as_int() else {
            continue;
        };
        if !SLEEP_STAGE_CODES.contains(&stage) {
            continue;
        }
        let Some(end_nanos) = sample.end_nanos else {
            continue;
        };
        let end_date = chrono::DateTime::from_timestamp_nanos(end_nanos).date_naive();
        #[allow(clippy::cast_precision_loss)]
        let duration_minutes = (end_nanos - sample.start_nanos) as f64 / NANOS_PER_MINUTE;
        *totals.entry(end_date).or_insert(0.0) += duration_minutes;
    }
    for value in totals.values_mut() {
        *value = value.round();
    }
    totals
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
