use tracing::debug;

use super::advice::{AdvisoryFacts, Directive, directives, render_narrative};
use super::projection::project;
use super::ratios::compute_ratios;
use super::score::compute_score;
use super::types::{
    AnalysisResult, FinancialInput, Projection, Ratios, RiskZone, SimulationChangeSet,
};
use super::zone::classify;
use crate::error::InputError;

/// Numeric outcome of the pipeline plus the directives selected for it,
/// before any narrative has been attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub score: u8,
    pub risk_zone: RiskZone,
    pub ratios: Ratios,
    pub projection: Projection,
    pub directives: Vec<Directive>,
}

impl Assessment {
    /// Rule directives rendered as paragraphs.
    pub fn narrative(&self) -> String {
        render_narrative(&self.directives)
    }

    pub fn into_result(self, ai_advice: String) -> AnalysisResult {
        AnalysisResult {
            score: self.score,
            risk_zone: self.risk_zone,
            ratios: self.ratios,
            projection: self.projection,
            ai_advice,
        }
    }
}

/// Runs ratios, score, zone, projection and advisory rules in order.
pub fn assess(input: &FinancialInput) -> Result<Assessment, InputError> {
    let ratios = compute_ratios(input)?;
    let score = compute_score(&ratios, input);
    let risk_zone = classify(score, &ratios);
    let projection = project(input, &ratios);
    let directives = directives(&AdvisoryFacts {
        input,
        ratios: &ratios,
        score,
        zone: risk_zone,
        projection: &projection,
    });

    Ok(Assessment {
        score,
        risk_zone,
        ratios,
        projection,
        directives,
    })
}

pub fn analyze(input: &FinancialInput) -> Result<AnalysisResult, InputError> {
    let assessment = assess(input)?;
    let narrative = assessment.narrative();
    Ok(assessment.into_result(narrative))
}

/// Applies `changes` to a copy of `current` and analyses the copy exactly as
/// a fresh request.
pub fn simulate(
    current: &FinancialInput,
    changes: &SimulationChangeSet,
) -> Result<AnalysisResult, InputError> {
    let derived = apply_changes(current, changes)?;
    analyze(&derived)
}

/// Builds the hypothetical input. `new_emi` replaces `total_emi`,
/// `expense_change` is added to `fixed_expenses` (floored at zero), and
/// `savings_target` is not applied to any field.
pub fn apply_changes(
    current: &FinancialInput,
    changes: &SimulationChangeSet,
) -> Result<FinancialInput, InputError> {
    let mut derived = current.clone();

    if let Some(new_emi) = changes.new_emi {
        if !new_emi.is_finite() {
            return Err(InputError::NonFinite { field: "new_emi" });
        }
        if new_emi < 0.0 {
            return Err(InputError::Negative { field: "new_emi" });
        }
        derived.total_emi = new_emi;
    }

    if let Some(delta) = changes.expense_change {
        if !delta.is_finite() {
            return Err(InputError::NonFinite {
                field: "expense_change",
            });
        }
        let adjusted = derived.fixed_expenses + delta;
        if adjusted < 0.0 {
            debug!(
                fixed_expenses = derived.fixed_expenses,
                delta, "expense change would go negative; clamping fixed_expenses to 0"
            );
        }
        derived.fixed_expenses = adjusted.max(0.0);
    }

    if let Some(target) = changes.savings_target {
        debug!(target, "savings_target is not applied to simulated inputs");
    }

    Ok(derived)
}
