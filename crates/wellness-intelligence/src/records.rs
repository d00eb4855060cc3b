// ABOUTME: Daily record assembly combining per-metric buckets into one record per date
// ABOUTME: Forward-fills body metrics and derives BMI with divide-by-zero guards
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily record builder.
//!
//! Combines the per-metric daily buckets produced by
//! [`crate::aggregation::aggregate_daily`] into an ascending sequence of
//! [`DailyRecord`]s, one per date in the union of all activity-metric dates.
//! Weight and height never create dates of their own; they forward-fill from
//! the most recent direct sample, or fall back to population placeholders.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use wellness_core::constants::body_defaults;
use wellness_core::DailyRecord;

/// Per-metric daily buckets feeding the record builder.
///
/// A metric whose raw feed was empty (or whose fetch failed) is simply an
/// empty map; its contribution degrades to zero for every date.
#[derive(Debug, Clone, Default)]
pub struct MetricDailyBuckets {
    /// Daily step totals
    pub steps: BTreeMap<NaiveDate, f64>,
    /// Daily calorie totals (kcal)
    pub calories: BTreeMap<NaiveDate, f64>,
    /// Daily active-minute totals
    pub active_minutes: BTreeMap<NaiveDate, f64>,
    /// Daily heart-minute totals
    pub heart_minutes: BTreeMap<NaiveDate, f64>,
    /// Daily sleep-minute totals
    pub sleep_minutes: BTreeMap<NaiveDate, f64>,
    /// Daily mean weight readings (kg)
    pub weight: BTreeMap<NaiveDate, f64>,
    /// Daily mean height readings (m)
    pub height: BTreeMap<NaiveDate, f64>,
}

impl MetricDailyBuckets {
    /// Dates that warrant a daily record: every date with at least one
    /// activity metric. Weight and height are excluded; a body reading on an
    /// otherwise empty day does not create a record.
    fn record_dates(&self) -> BTreeSet<NaiveDate> {
        let mut dates = BTreeSet::new();
        for map in [
            &self.steps,
            &self.calories,
            &self.active_minutes,
            &self.heart_minutes,
            &self.sleep_minutes,
        ] {
            dates.extend(map.keys().copied());
        }
        dates
    }
}

/// Build one [`DailyRecord`] per date, in ascending date order.
///
/// Returns an empty vector when no activity metric produced any date.
#[must_use]
pub fn build_daily_records(buckets: &MetricDailyBuckets) -> Vec<DailyRecord> {
    let dates = buckets.record_dates();

    let mut records = Vec::with_capacity(dates.len());
    for date in dates {
        let weight = last_known(&buckets.weight, date).unwrap_or(body_defaults::WEIGHT_KG);
        let height = last_known(&buckets.height, date).unwrap_or(body_defaults::HEIGHT_M);
        let weight = round_dp(weight, 1);
        let height = round_dp(height, 2);

        records.push(DailyRecord {
            date,
            steps: metric_u32(&buckets.steps, date),
            calories: metric_u32(&buckets.calories, date),
            active_minutes: metric_u32(&buckets.active_minutes, date),
            heart_minutes: metric_u32(&buckets.heart_minutes, date),
            sleep_minutes: metric_u32(&buckets.sleep_minutes, date),
            weight,
            height,
            bmi: bmi(weight, height),
        });
    }
    records
}

/// BMI = weight / height², rounded to 2 decimals. A non-positive height
/// yields 0.0 instead of dividing by zero.
#[must_use]
pub fn bmi(weight_kg: f64, height_m: f64) -> f64 {
    if height_m > 0.0 {
        round_dp(weight_kg / (height_m * height_m), 2)
    } else {
        0.0
    }
}

/// Most recent direct reading on or before `date`
fn last_known(map: &BTreeMap<NaiveDate, f64>, date: NaiveDate) -> Option<f64> {
    map.range(..=date).next_back().map(|(_, value)| *value)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn metric_u32(map: &BTreeMap<NaiveDate, f64>, date: NaiveDate) -> u32 {
    map.get(&date).copied().unwrap_or(0.0).max(0.0).round() as u32
}

fn round_dp(value: f64, decimals: u32) -> f64 {
    let factor = f64::from(10_u32.pow(decimals));
    (value * factor).round() / factor
}
