// ABOUTME: Goal-aware recommendation rule table applied uniformly across metrics
// ABOUTME: Threshold bands at 50% and 100% of goal plus category-specific overlays
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recommendation rules.
//!
//! Each tracked metric is compared against its goal and mapped through one
//! uniform threshold table: below 50% is "behind" (with a 70% catch-up
//! target), 50–99% is "almost there", and 100%+ is celebratory. Messages are
//! emitted in a fixed order — steps, active minutes, sleep, calories, then
//! the category overlay — so output is deterministic for a given record.

use wellness_core::constants::recommendation::{BEHIND_GOAL_FRACTION, CATCH_UP_GOAL_FRACTION};
use wellness_core::{DailyRecord, Goals, WellnessCategory};

/// Fallback when no rule produced a message
const KEEP_IT_UP: &str = "Keep up your current routine!";

/// Where a metric's value sits relative to its goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GoalBand {
    /// Below the behind-goal fraction
    Behind,
    /// At or above the behind-goal fraction but short of the goal
    AlmostThere,
    /// Goal met or exceeded
    Achieved,
}

fn band(value: f64, goal: f64) -> GoalBand {
    if goal <= 0.0 || value >= goal {
        GoalBand::Achieved
    } else if value < goal * BEHIND_GOAL_FRACTION {
        GoalBand::Behind
    } else {
        GoalBand::AlmostThere
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent_of_goal(value: f64, goal: f64) -> u32 {
    if goal <= 0.0 {
        100
    } else {
        (value / goal * 100.0) as u32
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn catch_up_target(goal: f64) -> u32 {
    (goal * CATCH_UP_GOAL_FRACTION) as u32
}

/// Assemble the ordered recommendation list for one daily record.
///
/// Always returns at least one message; when no threshold rule matches, the
/// generic keep-it-up fallback is returned alone.
#[must_use]
pub fn personalized_recommendations(
    record: &DailyRecord,
    category: WellnessCategory,
    is_at_risk: bool,
    goals: &Goals,
) -> Vec<String> {
    let mut recs = Vec::new();

    let steps = f64::from(record.steps);
    let step_goal = f64::from(goals.steps);
    match band(steps, step_goal) {
        GoalBand::Behind => recs.push(format!(
            "You're at {}% of your step goal. Try to reach {} steps today",
            percent_of_goal(steps, step_goal),
            catch_up_target(step_goal)
        )),
        GoalBand::AlmostThere => recs.push(format!(
            "Almost there! Just {} more steps to reach your goal",
            goals.steps.saturating_sub(record.steps)
        )),
        GoalBand::Achieved => recs.push(format!(
            "Goal achieved! You've completed {}% of your step target",
            percent_of_goal(steps, step_goal)
        )),
    }

    let active = f64::from(record.active_minutes);
    let active_goal = f64::from(goals.active_minutes);
    match band(active, active_goal) {
        GoalBand::Behind => recs.push(format!(
            "Try to get {}+ active minutes today",
            catch_up_target(active_goal)
        )),
        GoalBand::AlmostThere => recs.push(format!(
            "Almost there! {} more active minutes to go",
            goals.active_minutes.saturating_sub(record.active_minutes)
        )),
        GoalBand::Achieved => {
            recs.push("Great job! You hit your active minutes goal".to_owned());
        }
    }

    let sleep = f64::from(record.sleep_minutes);
    let sleep_goal = goals.sleep_goal_minutes();
    match band(sleep, sleep_goal) {
        GoalBand::Behind => recs.push(format!(
            "Try to get at least {:.1} hours of sleep tonight",
            goals.sleep_hours
        )),
        GoalBand::AlmostThere => recs.push(format!(
            "Almost there! About {:.0} more minutes of sleep would hit your goal",
            sleep_goal - sleep
        )),
        GoalBand::Achieved => recs.push(format!(
            "Well rested! You got {:.1} hours of sleep",
            sleep / 60.0
        )),
    }

    let calories = f64::from(record.calories);
    let calorie_goal = f64::from(goals.calories);
    match band(calories, calorie_goal) {
        GoalBand::Behind => recs.push(format!(
            "Increase activity to burn more calories (Goal: {})",
            goals.calories
        )),
        GoalBand::AlmostThere => recs.push(format!(
            "Almost there! {} more calories to burn today",
            goals.calories.saturating_sub(record.calories)
        )),
        GoalBand::Achieved => recs.push(format!(
            "Excellent! You burned {}% of your calorie goal",
            percent_of_goal(calories, calorie_goal)
        )),
    }

    if category == WellnessCategory::AtRisk || is_at_risk {
        recs.push("Focus on improving your activity levels this week".to_owned());
    } else if category == WellnessCategory::HighPerformance {
        recs.push("Outstanding performance! Remember to include rest days".to_owned());
    }

    if recs.is_empty() {
        recs.push(KEEP_IT_UP.to_owned());
    }
    recs
}

/// Join an ordered recommendation list into one display string.
#[must_use]
pub fn render_recommendations(recommendations: &[String]) -> String {
    if recommendations.is_empty() {
        KEEP_IT_UP.to_owned()
    } else {
        recommendations.join(" | ")
    }
}
