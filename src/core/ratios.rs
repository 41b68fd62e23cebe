use super::types::{FinancialInput, Ratios};
use crate::error::InputError;

/// Reported runway when there is no monthly outflow to deplete savings.
pub const UNBOUNDED_RUNWAY_MONTHS: f64 = 999.0;

/// Largest accepted money amount. Keeps sums and annualised figures finite.
pub const MAX_AMOUNT: f64 = 1e15;

pub fn validate_input(input: &FinancialInput) -> Result<(), InputError> {
    for (field, value) in [
        ("monthly_income", input.monthly_income),
        ("fixed_expenses", input.fixed_expenses),
        ("total_emi", input.total_emi),
        ("existing_savings", input.existing_savings),
        ("insurance_premium", input.insurance_premium),
        ("investments", input.investments),
    ] {
        if !value.is_finite() {
            return Err(InputError::NonFinite { field });
        }
        if value < 0.0 {
            return Err(InputError::Negative { field });
        }
        if value > MAX_AMOUNT {
            return Err(InputError::OutOfRange { field });
        }
    }

    if input.monthly_income == 0.0 {
        return Err(InputError::ZeroIncome);
    }

    if input.age == 0 {
        return Err(InputError::InvalidAge);
    }

    Ok(())
}

/// Ratios are reported unclamped: an EMI above income shows up as a ratio
/// above 1.0.
pub fn compute_ratios(input: &FinancialInput) -> Result<Ratios, InputError> {
    validate_input(input)?;

    let income = input.monthly_income;
    let outflow = input.monthly_outflow();

    let runway_months = if outflow > 0.0 {
        input.existing_savings / outflow
    } else {
        UNBOUNDED_RUNWAY_MONTHS
    };

    let ratios = Ratios {
        emi_to_income: input.total_emi / income,
        savings_rate: (income - outflow) / income,
        runway_months,
        expense_to_income: outflow / income,
    };

    // A tiny income under large outflows still divides past f64::MAX.
    for (field, value) in [
        ("emi_to_income", ratios.emi_to_income),
        ("savings_rate", ratios.savings_rate),
        ("runway_months", ratios.runway_months),
        ("expense_to_income", ratios.expense_to_income),
    ] {
        if !value.is_finite() {
            return Err(InputError::OutOfRange { field });
        }
    }

    Ok(ratios)
}
