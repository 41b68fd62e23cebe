use super::types::{Ratios, RiskZone};

/// Lower score bound (inclusive) of each zone above `Critical`.
pub const RISK_MIN_SCORE: u8 = 30;
pub const NEUTRAL_MIN_SCORE: u8 = 50;
pub const GROWTH_MIN_SCORE: u8 = 70;
pub const WEALTH_BUILDING_MIN_SCORE: u8 = 85;

/// EMI share of income treated as dangerous leverage whatever the score.
pub const EMI_DANGER_RATIO: f64 = 0.50;
pub const RUNWAY_CRITICAL_MONTHS: f64 = 1.0;
pub const RUNWAY_THIN_MONTHS: f64 = 3.0;
pub const RUNWAY_COMFORT_MONTHS: f64 = 6.0;

/// A ratio condition that caps the zone regardless of score.
pub struct ZoneGuard {
    pub name: &'static str,
    pub applies: fn(&Ratios) -> bool,
    pub ceiling: RiskZone,
}

pub const ZONE_GUARDS: &[ZoneGuard] = &[
    ZoneGuard {
        name: "emi-danger",
        applies: |r: &Ratios| r.emi_to_income >= EMI_DANGER_RATIO,
        ceiling: RiskZone::Risk,
    },
    ZoneGuard {
        name: "negative-savings",
        applies: |r: &Ratios| r.savings_rate < 0.0,
        ceiling: RiskZone::Risk,
    },
    ZoneGuard {
        name: "runway-critical",
        applies: |r: &Ratios| r.runway_months < RUNWAY_CRITICAL_MONTHS,
        ceiling: RiskZone::Risk,
    },
    ZoneGuard {
        name: "runway-thin",
        applies: |r: &Ratios| r.runway_months < RUNWAY_THIN_MONTHS,
        ceiling: RiskZone::Neutral,
    },
    ZoneGuard {
        name: "runway-short",
        applies: |r: &Ratios| r.runway_months < RUNWAY_COMFORT_MONTHS,
        ceiling: RiskZone::Growth,
    },
];

pub fn classify(score: u8, ratios: &Ratios) -> RiskZone {
    ZONE_GUARDS
        .iter()
        .filter(|guard| (guard.applies)(ratios))
        .map(|guard| guard.ceiling)
        .fold(zone_for_score(score), RiskZone::min)
}

/// Score-only band lookup. Every `u8` lands in exactly one zone.
pub fn zone_for_score(score: u8) -> RiskZone {
    match score {
        s if s < RISK_MIN_SCORE => RiskZone::Critical,
        s if s < NEUTRAL_MIN_SCORE => RiskZone::Risk,
        s if s < GROWTH_MIN_SCORE => RiskZone::Neutral,
        s if s < WEALTH_BUILDING_MIN_SCORE => RiskZone::Growth,
        _ => RiskZone::WealthBuilding,
    }
}
