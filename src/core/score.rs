//! Composite 0-100 stability score.
//!
//! Four ratio signals are mapped to 0-100 sub-scores, each clamped before
//! weighting, then summed. Dependents, age and investments adjust the result
//! within a bounded band so they never outweigh the ratios.

use super::types::{FinancialInput, Ratios};

pub const SAVINGS_WEIGHT: f64 = 0.40;
pub const EMI_WEIGHT: f64 = 0.30;
pub const EXPENSE_WEIGHT: f64 = 0.20;
pub const RUNWAY_WEIGHT: f64 = 0.10;

/// Savings rate earning full marks.
pub const SAVINGS_RATE_FULL_MARKS: f64 = 0.40;
/// EMI share of income below which no penalty applies.
pub const EMI_COMFORT_RATIO: f64 = 0.10;
/// EMI share of income at which the EMI sub-score reaches zero.
pub const EMI_CEILING_RATIO: f64 = 0.50;
pub const EXPENSE_COMFORT_RATIO: f64 = 0.50;
pub const EXPENSE_CEILING_RATIO: f64 = 1.00;

/// Runway earns `RUNWAY_CORE_POINTS` linearly up to `RUNWAY_CORE_MONTHS`,
/// and the remainder more slowly up to `RUNWAY_FULL_MONTHS`.
pub const RUNWAY_CORE_MONTHS: f64 = 6.0;
pub const RUNWAY_CORE_POINTS: f64 = 80.0;
pub const RUNWAY_FULL_MONTHS: f64 = 12.0;

pub const FREE_DEPENDENTS: u32 = 2;
pub const DEPENDENT_PENALTY: f64 = 2.0;
pub const MAX_DEPENDENT_PENALTY: f64 = 6.0;
pub const INVESTMENT_CUSHION_MONTHS: f64 = 6.0;
pub const INVESTMENT_BONUS: f64 = 2.0;
/// Combined modifiers never move the score by more than this many points.
pub const MODIFIER_BAND: f64 = 10.0;

const MAX_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub savings: f64,
    pub emi: f64,
    pub expense: f64,
    pub runway: f64,
}

impl SubScores {
    pub fn weighted_total(self) -> f64 {
        SAVINGS_WEIGHT * self.savings
            + EMI_WEIGHT * self.emi
            + EXPENSE_WEIGHT * self.expense
            + RUNWAY_WEIGHT * self.runway
    }
}

pub fn compute_score(ratios: &Ratios, input: &FinancialInput) -> u8 {
    let base = sub_scores(ratios).weighted_total();
    let total = base + modifiers(input);
    total.round().clamp(0.0, MAX_SCORE) as u8
}

pub fn sub_scores(ratios: &Ratios) -> SubScores {
    SubScores {
        savings: linear_score(ratios.savings_rate, 0.0, SAVINGS_RATE_FULL_MARKS),
        emi: linear_score(ratios.emi_to_income, EMI_CEILING_RATIO, EMI_COMFORT_RATIO),
        expense: linear_score(
            ratios.expense_to_income,
            EXPENSE_CEILING_RATIO,
            EXPENSE_COMFORT_RATIO,
        ),
        runway: runway_score(ratios.runway_months),
    }
}

/// Sum of the non-ratio adjustments, clamped to `±MODIFIER_BAND`.
pub fn modifiers(input: &FinancialInput) -> f64 {
    let extra_dependents = input.dependents.saturating_sub(FREE_DEPENDENTS) as f64;
    let dependent_penalty = (extra_dependents * DEPENDENT_PENALTY).min(MAX_DEPENDENT_PENALTY);

    let investment_bonus =
        if input.investments >= input.monthly_income * INVESTMENT_CUSHION_MONTHS {
            INVESTMENT_BONUS
        } else {
            0.0
        };

    (age_adjustment(input.age) + investment_bonus - dependent_penalty)
        .clamp(-MODIFIER_BAND, MODIFIER_BAND)
}

fn age_adjustment(age: u32) -> f64 {
    match age {
        0..30 => 3.0,
        30..40 => 2.0,
        40..55 => 0.0,
        _ => -2.0,
    }
}

/// Maps `value` onto 0-100 where `zero_at` scores 0 and `full_at` scores
/// 100. Works in either direction.
fn linear_score(value: f64, zero_at: f64, full_at: f64) -> f64 {
    let t = (value - zero_at) / (full_at - zero_at);
    t.clamp(0.0, 1.0) * MAX_SCORE
}

fn runway_score(months: f64) -> f64 {
    let months = months.max(0.0);
    let core = months.min(RUNWAY_CORE_MONTHS) / RUNWAY_CORE_MONTHS * RUNWAY_CORE_POINTS;
    let tail = ((months - RUNWAY_CORE_MONTHS) / (RUNWAY_FULL_MONTHS - RUNWAY_CORE_MONTHS))
        .clamp(0.0, 1.0)
        * (MAX_SCORE - RUNWAY_CORE_POINTS);
    core + tail
}
