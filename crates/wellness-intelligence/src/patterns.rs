// ABOUTME: Frequent-pattern mining over daily goal-achievement flags
// ABOUTME: Apriori itemsets and lift-ranked association rules rendered as insights
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pattern miner.
//!
//! Each daily record reduces to four boolean goal flags; the flag table is
//! treated as a transaction set. With only four items the full itemset
//! lattice is tiny, so the apriori pass enumerates every non-empty flag
//! subset directly, keeps those above the support threshold, and derives
//! association rules ranked by lift.
//!
//! Ordering is deterministic: itemsets ascending by size then flag order,
//! antecedent subsets in bitmask order. Every failure mode degrades to a
//! single fallback message; mining never takes down the rest of a response.

use std::collections::HashMap;
use thiserror::Error;
use wellness_core::constants::mining::{
    GOOD_SLEEP_GOAL_FRACTION, MIN_ITEMSET_SUPPORT, MIN_RECORDS_FOR_MINING, MIN_RULE_LIFT,
};
use wellness_core::{DailyRecord, Goals};

/// Number of goal-achievement flags mined per day
const FLAG_COUNT: usize = 4;

/// Display names for the goal flags, in flag-bit order
const FLAG_NAMES: [&str; FLAG_COUNT] = [
    "Met Step Goal",
    "Met Calorie Goal",
    "Met Active Goal",
    "Good Sleep",
];

/// Fallback when no itemset clears the support threshold
const NO_FREQUENT_PATTERNS: &str =
    "Not enough consistent patterns found yet. Keep up your activities!";

/// Fallback when itemsets exist but no rule clears the lift threshold
const NO_STRONG_RULES: &str =
    "Found some frequent activities, but no strong connections between them yet.";

/// Fallback when mining itself failed
const MINING_FAILED: &str = "Could not analyze wellness patterns due to an error.";

/// Internal mining failures; surfaced to callers only as the generic
/// fallback message.
#[derive(Debug, Error)]
enum MiningError {
    #[error("support bookkeeping produced a zero denominator for itemset {0:#06b}")]
    DegenerateSupport(u8),
}

/// Mine goal-achievement association insights from the full record window.
///
/// Fewer than [`MIN_RECORDS_FOR_MINING`] records yields an empty list; every
/// other degenerate case yields exactly one fallback message.
#[must_use]
pub fn mine_wellness_patterns(records: &[DailyRecord], goals: &Goals) -> Vec<String> {
    if records.len() < MIN_RECORDS_FOR_MINING {
        return Vec::new();
    }
    match mine(records, goals) {
        Ok(insights) => insights,
        Err(error) => {
            tracing::warn!(%error, "pattern mining failed");
            vec![MINING_FAILED.to_owned()]
        }
    }
}

fn mine(records: &[DailyRecord], goals: &Goals) -> Result<Vec<String>, MiningError> {
    let transactions: Vec<u8> = records
        .iter()
        .map(|record| goal_flags(record, goals))
        .collect();

    // Support for every non-empty flag subset; the lattice has only 15.
    let supports: HashMap<u8, f64> = (1_u8..1 << FLAG_COUNT)
        .map(|mask| (mask, support(&transactions, mask)))
        .collect();

    let mut frequent: Vec<u8> = supports
        .iter()
        .filter(|(_, s)| **s >= MIN_ITEMSET_SUPPORT)
        .map(|(mask, _)| *mask)
        .collect();
    frequent.sort_by_key(|mask| (mask.count_ones(), *mask));

    if frequent.is_empty() {
        return Ok(vec![NO_FREQUENT_PATTERNS.to_owned()]);
    }

    let mut insights = Vec::new();
    for &itemset in frequent.iter().filter(|mask| mask.count_ones() >= 2) {
        for antecedent in 1_u8..1 << FLAG_COUNT {
            if antecedent & itemset != antecedent || antecedent == itemset {
                continue;
            }
            let consequent = itemset & !antecedent;
            let itemset_support = supports[&itemset];
            let antecedent_support = supports[&antecedent];
            let consequent_support = supports[&consequent];
            // Subsets of a frequent itemset are at least as frequent, so
            // these denominators are positive unless bookkeeping broke.
            if antecedent_support <= 0.0 || consequent_support <= 0.0 {
                return Err(MiningError::DegenerateSupport(itemset));
            }
            let confidence = itemset_support / antecedent_support;
            let lift = confidence / consequent_support;
            if lift >= MIN_RULE_LIFT {
                insights.push(render_rule(antecedent, consequent, confidence));
            }
        }
    }

    if insights.is_empty() {
        return Ok(vec![NO_STRONG_RULES.to_owned()]);
    }
    Ok(insights)
}

/// Boolean goal flags for one day, packed into a bitmask in
/// [`FLAG_NAMES`] order. Sleep uses the deliberately looser
/// [`GOOD_SLEEP_GOAL_FRACTION`] bar.
fn goal_flags(record: &DailyRecord, goals: &Goals) -> u8 {
    let mut mask = 0_u8;
    if record.steps >= goals.steps {
        mask |= 1;
    }
    if record.calories >= goals.calories {
        mask |= 1 << 1;
    }
    if record.active_minutes >= goals.active_minutes {
        mask |= 1 << 2;
    }
    if f64::from(record.sleep_minutes) >= goals.sleep_goal_minutes() * GOOD_SLEEP_GOAL_FRACTION {
        mask |= 1 << 3;
    }
    mask
}

/// Fraction of transactions containing every flag in `mask`
#[allow(clippy::cast_precision_loss)]
fn support(transactions: &[u8], mask: u8) -> f64 {
    if transactions.is_empty() {
        return 0.0;
    }
    let hits = transactions.iter().filter(|t| *t & mask == mask).count();
    hits as f64 / transactions.len() as f64
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn render_rule(antecedent: u8, consequent: u8, confidence: f64) -> String {
    format!(
        "When you achieve your {}, you are {}% likely to also achieve your {}.",
        flag_names(antecedent),
        (confidence * 100.0).round() as u32,
        flag_names(consequent)
    )
}

fn flag_names(mask: u8) -> String {
    let names: Vec<&str> = (0..FLAG_COUNT)
        .filter(|bit| mask & (1 << bit) != 0)
        .map(|bit| FLAG_NAMES[bit])
        .collect();
    names.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(day: u32, steps: u32, calories: u32, active: u32, sleep: u32) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            steps,
            calories,
            active_minutes: active,
            heart_minutes: 0,
            sleep_minutes: sleep,
            weight: 70.0,
            height: 1.75,
            bmi: 22.86,
        }
    }

    #[test]
    fn fewer_than_three_records_yields_empty_result() {
        let goals = Goals::default();
        assert!(mine_wellness_patterns(&[], &goals).is_empty());
        let records = vec![record(1, 12_000, 2_600, 70, 450), record(2, 0, 0, 0, 0)];
        assert!(mine_wellness_patterns(&records, &goals).is_empty());
    }

    #[test]
    fn no_frequent_itemsets_yields_single_fallback() {
        // No goal ever met: every transaction is empty, no itemset has support
        let records = vec![
            record(1, 0, 0, 0, 0),
            record(2, 100, 100, 1, 10),
            record(3, 200, 50, 2, 20),
        ];
        let insights = mine_wellness_patterns(&records, &Goals::default());
        assert_eq!(insights, vec![NO_FREQUENT_PATTERNS.to_owned()]);
    }

    #[test]
    fn independent_flags_yield_no_strong_rules_fallback() {
        // Step and calorie goals each met half the time, together a quarter:
        // confidence 0.5, lift 1.0, below the 1.1 bar.
        let records = vec![
            record(1, 12_000, 0, 0, 0),
            record(2, 0, 2_600, 0, 0),
            record(3, 12_000, 2_600, 0, 0),
            record(4, 0, 0, 0, 0),
        ];
        let insights = mine_wellness_patterns(&records, &Goals::default());
        assert_eq!(insights, vec![NO_STRONG_RULES.to_owned()]);
    }

    #[test]
    fn correlated_flags_produce_rules_in_both_directions() {
        // Step and calorie goals always met together on half the days
        let records = vec![
            record(1, 12_000, 2_600, 0, 0),
            record(2, 12_000, 2_600, 0, 0),
            record(3, 0, 0, 0, 0),
            record(4, 0, 0, 0, 0),
        ];
        let insights = mine_wellness_patterns(&records, &Goals::default());
        assert_eq!(insights.len(), 2);
        // Antecedent subsets enumerate in bitmask order: steps first
        assert_eq!(
            insights[0],
            "When you achieve your Met Step Goal, you are 100% likely to also achieve your Met Calorie Goal."
        );
        assert_eq!(
            insights[1],
            "When you achieve your Met Calorie Goal, you are 100% likely to also achieve your Met Step Goal."
        );
    }

    #[test]
    fn sleep_flag_uses_the_looser_ninety_percent_bar() {
        // Goal 7.5h = 450 min; 90% bar = 405 min
        let goals = Goals::default();
        assert_eq!(goal_flags(&record(1, 0, 0, 0, 405), &goals), 1 << 3);
        assert_eq!(goal_flags(&record(1, 0, 0, 0, 404), &goals), 0);
    }

    #[test]
    fn three_flag_itemsets_enumerate_all_partitions() {
        // Steps, calories, and active all met together on 3 of 4 days
        let records = vec![
            record(1, 12_000, 2_600, 70, 0),
            record(2, 12_000, 2_600, 70, 0),
            record(3, 12_000, 2_600, 70, 0),
            record(4, 0, 0, 0, 0),
        ];
        let insights = mine_wellness_patterns(&records, &Goals::default());
        // Three 2-itemsets with 2 rules each, then the 3-itemset with 6 rules
        assert_eq!(insights.len(), 12);
        assert!(insights
            .iter()
            .any(|i| i.contains("Met Step Goal, Met Calorie Goal")));
    }

    #[test]
    fn confidence_renders_as_whole_percent() {
        // Steps met 3 of 6 days, calories met on 2 of those step days:
        // confidence 2/3 -> 67%
        let records = vec![
            record(1, 12_000, 2_600, 0, 0),
            record(2, 12_000, 2_600, 0, 0),
            record(3, 12_000, 0, 0, 0),
            record(4, 0, 0, 0, 0),
            record(5, 0, 0, 0, 0),
            record(6, 0, 0, 0, 0),
        ];
        let insights = mine_wellness_patterns(&records, &Goals::default());
        assert!(
            insights.iter().any(|i| i.contains("67% likely")),
            "got: {insights:?}"
        );
    }
}
