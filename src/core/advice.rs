//! Rule-driven advisory directives.
//!
//! `ADVISORY_RULES` is evaluated top to bottom and every matching rule adds
//! one paragraph. Rules are independent, so several concerns can be raised
//! together, and the order is fixed so identical inputs give identical text.

use serde::Serialize;

use super::projection::Trajectory;
use super::types::{FinancialInput, Projection, Ratios, RiskLevel, RiskZone};

pub const DELEVERAGE_EMI_RATIO: f64 = 0.30;
pub const LOW_SAVINGS_RATE: f64 = 0.10;
pub const EMERGENCY_FUND_MONTHS: f64 = 3.0;
/// Annual premium budget as a share of annual income.
pub const PROTECTION_BASE_SHARE: f64 = 0.02;
pub const PROTECTION_SHARE_PER_DEPENDENT: f64 = 0.005;
/// The gap rule fires when the premium is below this fraction of the budget.
pub const PROTECTION_GAP_FRACTION: f64 = 0.5;
pub const SURPLUS_SAVINGS_RATE: f64 = 0.20;
pub const INVESTMENT_FLOOR_MONTHS: f64 = 3.0;

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct AdvisoryFacts<'a> {
    pub input: &'a FinancialInput,
    pub ratios: &'a Ratios,
    pub score: u8,
    pub zone: RiskZone,
    pub projection: &'a Projection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directive {
    pub rule: &'static str,
    pub text: String,
}

pub struct AdvisoryRule {
    pub id: &'static str,
    pub applies: fn(&AdvisoryFacts<'_>) -> bool,
    pub directive: fn(&AdvisoryFacts<'_>) -> String,
}

pub const ADVISORY_RULES: &[AdvisoryRule] = &[
    AdvisoryRule {
        id: "zone-summary",
        applies: always,
        directive: zone_summary,
    },
    AdvisoryRule {
        id: "deleverage",
        applies: emi_is_high,
        directive: deleverage,
    },
    AdvisoryRule {
        id: "savings-discipline",
        applies: savings_are_low,
        directive: savings_discipline,
    },
    AdvisoryRule {
        id: "emergency-fund",
        applies: runway_is_short,
        directive: emergency_fund,
    },
    AdvisoryRule {
        id: "protection-gap",
        applies: cover_is_thin,
        directive: protection_gap,
    },
    AdvisoryRule {
        id: "depletion-warning",
        applies: savings_deplete,
        directive: depletion_warning,
    },
    AdvisoryRule {
        id: "idle-surplus",
        applies: surplus_is_idle,
        directive: idle_surplus,
    },
    AdvisoryRule {
        id: "goal-focus",
        applies: has_goal,
        directive: goal_focus,
    },
];

pub fn directives(facts: &AdvisoryFacts<'_>) -> Vec<Directive> {
    ADVISORY_RULES
        .iter()
        .filter(|rule| (rule.applies)(facts))
        .map(|rule| Directive {
            rule: rule.id,
            text: (rule.directive)(facts),
        })
        .collect()
}

pub fn render_narrative(directives: &[Directive]) -> String {
    directives
        .iter()
        .map(|d| d.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn advise(
    ratios: &Ratios,
    score: u8,
    zone: RiskZone,
    projection: &Projection,
    input: &FinancialInput,
) -> String {
    let facts = AdvisoryFacts {
        input,
        ratios,
        score,
        zone,
        projection,
    };
    render_narrative(&directives(&facts))
}

pub fn recommended_annual_premium(input: &FinancialInput) -> f64 {
    let share =
        PROTECTION_BASE_SHARE + PROTECTION_SHARE_PER_DEPENDENT * input.dependents as f64;
    input.monthly_income * 12.0 * share
}

fn always(_: &AdvisoryFacts<'_>) -> bool {
    true
}

fn emi_is_high(f: &AdvisoryFacts<'_>) -> bool {
    f.ratios.emi_to_income >= DELEVERAGE_EMI_RATIO
}

fn savings_are_low(f: &AdvisoryFacts<'_>) -> bool {
    f.ratios.savings_rate < LOW_SAVINGS_RATE
}

fn runway_is_short(f: &AdvisoryFacts<'_>) -> bool {
    f.ratios.runway_months < EMERGENCY_FUND_MONTHS
}

fn cover_is_thin(f: &AdvisoryFacts<'_>) -> bool {
    f.input.insurance_premium < recommended_annual_premium(f.input) * PROTECTION_GAP_FRACTION
}

fn savings_deplete(f: &AdvisoryFacts<'_>) -> bool {
    f.projection.risk_6_month >= RiskLevel::High
}

fn surplus_is_idle(f: &AdvisoryFacts<'_>) -> bool {
    f.ratios.savings_rate >= SURPLUS_SAVINGS_RATE
        && f.input.investments < f.input.monthly_income * INVESTMENT_FLOOR_MONTHS
}

fn has_goal(f: &AdvisoryFacts<'_>) -> bool {
    !f.input.goals.trim().is_empty()
}

fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

fn zone_summary(f: &AdvisoryFacts<'_>) -> String {
    let outlook = match f.zone {
        RiskZone::Critical => {
            "Commitments are outrunning what your income and savings can carry. Stabilise monthly cash flow before taking on anything new."
        }
        RiskZone::Risk => {
            "You are managing, but one shock (a job gap or medical bill) could tip you into trouble. Build slack into the budget first."
        }
        RiskZone::Neutral => {
            "Your finances are steady but thin. Small, consistent improvements to savings and debt will move you into growth."
        }
        RiskZone::Growth => {
            "You have a healthy surplus and manageable debt. Direct the surplus deliberately so it compounds."
        }
        RiskZone::WealthBuilding => {
            "You are in a strong position with low leverage and a deep cushion. Focus on long-term wealth creation and protection."
        }
    };
    format!(
        "Overall: {} zone (score {}/100). {}",
        f.zone, f.score, outlook
    )
}

fn deleverage(f: &AdvisoryFacts<'_>) -> String {
    format!(
        "Loan EMIs take {} of your income. Avoid new loans, prepay the highest-interest debt first, and aim to bring EMIs under {} of income.",
        percent(f.ratios.emi_to_income),
        percent(DELEVERAGE_EMI_RATIO)
    )
}

fn savings_discipline(f: &AdvisoryFacts<'_>) -> String {
    if f.ratios.savings_rate < 0.0 {
        format!(
            "You are spending {} more than you earn each month. Cut discretionary costs now and list fixed expenses that can be renegotiated.",
            percent(-f.ratios.savings_rate)
        )
    } else {
        format!(
            "You save only {} of income. Automate a transfer on payday and target at least {} before spending on extras.",
            percent(f.ratios.savings_rate),
            percent(LOW_SAVINGS_RATE)
        )
    }
}

fn emergency_fund(f: &AdvisoryFacts<'_>) -> String {
    let target = f.input.monthly_outflow() * EMERGENCY_FUND_MONTHS;
    let gap = (target - f.input.existing_savings).max(0.0);
    format!(
        "Savings cover only {:.1} months of expenses. Build an emergency fund of at least {:.0} ({} months), about {:.0} more, in a liquid account.",
        f.ratios.runway_months, target, EMERGENCY_FUND_MONTHS, gap
    )
}

fn protection_gap(f: &AdvisoryFacts<'_>) -> String {
    let who = match f.input.dependents {
        0 => "yourself".to_string(),
        1 => "you and your dependent".to_string(),
        n => format!("you and your {n} dependents"),
    };
    format!(
        "Your annual insurance premium of {:.0} looks low for protecting {}. Review term life and health cover; a budget of around {:.0} a year is a reasonable starting point.",
        f.input.insurance_premium,
        who,
        recommended_annual_premium(f.input)
    )
}

fn depletion_warning(f: &AdvisoryFacts<'_>) -> String {
    let trajectory = Trajectory::from_input(f.input);
    // Only reached on a shortfall, where depletion is always `Some`.
    let months = trajectory.months_to_depletion().unwrap_or_default();
    format!(
        "At the current monthly shortfall of {:.0}, savings run out in about {months:.1} months. 6-month risk is {}; close the gap between income and outflow as a priority.",
        trajectory.net_outflow, f.projection.risk_6_month
    )
}

fn idle_surplus(f: &AdvisoryFacts<'_>) -> String {
    format!(
        "You save {} of income but investments are modest. Once the emergency fund is in place, start a monthly SIP into diversified funds.",
        percent(f.ratios.savings_rate)
    )
}

fn goal_focus(f: &AdvisoryFacts<'_>) -> String {
    format!(
        "Goal: {}. Give it a target amount and date, and ring-fence a fixed monthly contribution towards it.",
        f.input.goals.trim()
    )
}
