// ABOUTME: Defaults and tunable thresholds for aggregation, inference, and mining
// ABOUTME: Population placeholders, goal defaults, and pattern-mining cutoffs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Application-wide constants.
//!
//! Every threshold that shapes behavior lives here so it can be tuned in one
//! place instead of being scattered through the pipeline.

/// Goal defaults applied when a session has never set explicit goals.
pub mod goal_defaults {
    /// Default daily step goal
    pub const STEPS: u32 = 10_000;

    /// Default daily calorie-burn goal (kcal)
    pub const CALORIES: u32 = 2_500;

    /// Default daily active-minutes goal
    pub const ACTIVE_MINUTES: u32 = 60;

    /// Default nightly sleep goal in hours
    pub const SLEEP_HOURS: f64 = 7.5;
}

/// Body-metric placeholders used before any direct sample exists.
pub mod body_defaults {
    /// Population-average weight placeholder (kg), used until a weight sample arrives
    pub const WEIGHT_KG: f64 = 65.0;

    /// Population-average height placeholder (m), used until a height sample arrives
    pub const HEIGHT_M: f64 = 1.70;
}

/// Feature-derivation constants shared by the pipeline and the models.
pub mod features {
    /// Steps counted as one minute of high-intensity movement
    pub const STEPS_PER_VERY_ACTIVE_MINUTE: u32 = 120;

    /// Calorie feature substituted when a day recorded zero calories (data gap)
    pub const FALLBACK_CALORIES: f64 = 1_600.0;

    /// BMI feature substituted when a day has no usable BMI (data gap)
    pub const FALLBACK_BMI: f64 = 24.0;
}

/// Inference thresholds and output guards.
pub mod inference {
    /// Positive-class probability above which a day is flagged at risk
    pub const RISK_PROBABILITY_THRESHOLD: f64 = 0.5;

    /// Lowest plausible daily calorie prediction (kcal); regressor output is floored here
    pub const MIN_PREDICTED_CALORIES: f64 = 1_200.0;
}

/// Goal-comparison bands for recommendation text.
pub mod recommendation {
    /// Below this fraction of a goal the user is "behind"
    pub const BEHIND_GOAL_FRACTION: f64 = 0.5;

    /// Catch-up target suggested to users who are behind
    pub const CATCH_UP_GOAL_FRACTION: f64 = 0.7;
}

/// Frequent-pattern mining cutoffs.
pub mod mining {
    /// Minimum number of daily records before mining is statistically meaningful
    pub const MIN_RECORDS_FOR_MINING: usize = 3;

    /// Minimum itemset support (fraction of days) to count as frequent
    pub const MIN_ITEMSET_SUPPORT: f64 = 0.2;

    /// Minimum lift for an association rule to survive
    pub const MIN_RULE_LIFT: f64 = 1.1;

    /// Fraction of the sleep goal that counts as a good night.
    ///
    /// Deliberately looser than the 100% bar used for the other goal flags;
    /// tunable independently.
    pub const GOOD_SLEEP_GOAL_FRACTION: f64 = 0.9;
}

/// Sleep-segment stage codes that count toward nightly sleep duration.
///
/// Matches the telemetry provider's segment encoding: 2 = generic sleep,
/// 4 = light, 5 = deep, 6 = REM. Awake (1) and out-of-bed (3) segments are
/// excluded.
pub const SLEEP_STAGE_CODES: [i64; 4] = [2, 4, 5, 6];
