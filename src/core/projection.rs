//! Short-horizon savings depletion model.
//!
//! Savings are drawn down by the monthly shortfall (outflow above income).
//! Both horizons read the same constant-outflow trajectory, so the later
//! horizon can never look safer than the earlier one.

use super::types::{FinancialInput, Projection, Ratios, RiskLevel};

pub const SHORT_HORIZON_MONTHS: f64 = 3.0;
pub const LONG_HORIZON_MONTHS: f64 = 6.0;

/// Months of fixed expenses that must remain after a horizon to avoid `High`.
pub const MIN_RESERVE_MONTHS: f64 = 1.0;
/// Multiple of the minimum reserve that must remain to rate `Low`.
pub const COMFORT_RESERVE_MULTIPLE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trajectory {
    pub starting_balance: f64,
    pub net_outflow: f64,
    pub min_reserve: f64,
}

impl Trajectory {
    pub fn from_input(input: &FinancialInput) -> Self {
        Self {
            starting_balance: input.existing_savings,
            net_outflow: (input.monthly_outflow() - input.monthly_income).max(0.0),
            min_reserve: input.fixed_expenses * MIN_RESERVE_MONTHS,
        }
    }

    pub fn is_self_funding(&self) -> bool {
        self.net_outflow <= 0.0
    }

    /// `None` when the balance never runs out.
    pub fn months_to_depletion(&self) -> Option<f64> {
        if self.is_self_funding() {
            None
        } else {
            Some(self.starting_balance / self.net_outflow)
        }
    }

    pub fn balance_after(&self, months: f64) -> f64 {
        self.starting_balance - self.net_outflow * months
    }

    pub fn risk_at(&self, horizon_months: f64) -> RiskLevel {
        let Some(depletion) = self.months_to_depletion() else {
            return RiskLevel::Low;
        };
        if depletion <= horizon_months {
            return RiskLevel::Severe;
        }

        let residual = self.balance_after(horizon_months);
        if residual < self.min_reserve {
            RiskLevel::High
        } else if residual < self.min_reserve * COMFORT_RESERVE_MULTIPLE {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

pub fn project(input: &FinancialInput, _ratios: &Ratios) -> Projection {
    let trajectory = Trajectory::from_input(input);
    Projection {
        risk_3_month: trajectory.risk_at(SHORT_HORIZON_MONTHS),
        risk_6_month: trajectory.risk_at(LONG_HORIZON_MONTHS),
    }
}
