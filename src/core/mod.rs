pub mod advice;
mod engine;
pub mod projection;
mod ratios;
pub mod score;
mod types;
pub mod zone;

pub use advice::{Directive, advise};
pub use engine::{Assessment, analyze, apply_changes, assess, simulate};
pub use projection::project;
pub use ratios::{MAX_AMOUNT, UNBOUNDED_RUNWAY_MONTHS, compute_ratios, validate_input};
pub use score::compute_score;
pub use types::{
    AnalysisResult, FinancialInput, Projection, Ratios, RiskLevel, RiskZone, SimulationChangeSet,
    SimulationRequest,
};
pub use zone::classify;

#[cfg(test)]
pub(crate) fn sample_input() -> FinancialInput {
    FinancialInput {
        monthly_income: 75_000.0,
        fixed_expenses: 35_000.0,
        total_emi: 15_000.0,
        existing_savings: 200_000.0,
        dependents: 2,
        age: 32,
        insurance_premium: 5_000.0,
        investments: 100_000.0,
        goals: "Buy a house".to_string(),
    }
}
