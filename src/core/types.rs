use std::fmt;

use serde::{Deserialize, Serialize};

/// Monthly figures supplied by the caller. Money values are in a single,
/// unspecified currency; `insurance_premium` is annual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialInput {
    pub monthly_income: f64,
    pub fixed_expenses: f64,
    pub total_emi: f64,
    pub existing_savings: f64,
    pub dependents: u32,
    pub age: u32,
    pub insurance_premium: f64,
    pub investments: f64,
    #[serde(default)]
    pub goals: String,
}

impl FinancialInput {
    /// Fixed expenses plus loan installments.
    pub fn monthly_outflow(&self) -> f64 {
        self.fixed_expenses + self.total_emi
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ratios {
    pub emi_to_income: f64,
    pub savings_rate: f64,
    pub runway_months: f64,
    pub expense_to_income: f64,
}

/// Financial-health tier, declared worst to best so the derived `Ord`
/// is the ranking used by guards and comparisons.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum RiskZone {
    Critical,
    Risk,
    Neutral,
    Growth,
    #[serde(rename = "Wealth Building", alias = "WealthBuilding", alias = "Wealth")]
    WealthBuilding,
}

impl RiskZone {
    pub const ALL: [RiskZone; 5] = [
        RiskZone::Critical,
        RiskZone::Risk,
        RiskZone::Neutral,
        RiskZone::Growth,
        RiskZone::WealthBuilding,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RiskZone::Critical => "Critical",
            RiskZone::Risk => "Risk",
            RiskZone::Neutral => "Neutral",
            RiskZone::Growth => "Growth",
            RiskZone::WealthBuilding => "Wealth Building",
        }
    }
}

impl fmt::Display for RiskZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Qualitative risk at a projection horizon, ordered least to most severe.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Severe,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::Severe => "Severe",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub risk_3_month: RiskLevel,
    pub risk_6_month: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: u8,
    pub risk_zone: RiskZone,
    pub ratios: Ratios,
    pub projection: Projection,
    pub ai_advice: String,
}

/// Hypothetical overrides applied on top of a baseline input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationChangeSet {
    pub new_emi: Option<f64>,
    pub expense_change: Option<f64>,
    /// Accepted for forward compatibility; not applied to any input field.
    pub savings_target: Option<f64>,
}

impl SimulationChangeSet {
    pub fn is_empty(&self) -> bool {
        self.new_emi.is_none() && self.expense_change.is_none() && self.savings_target.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub current_data: FinancialInput,
    #[serde(default)]
    pub changes: SimulationChangeSet,
}
