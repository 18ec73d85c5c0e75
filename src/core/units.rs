use crate::domain::model::{LengthUnit, Measure, WeightUnit};
use rust_decimal::Decimal;

/// Converts a weight to kilograms. Unknown units contribute zero.
pub fn normalize_weight(value: Decimal, unit: &WeightUnit) -> Decimal {
    match unit {
        WeightUnit::Kilogram => value,
        WeightUnit::Gram => value / Decimal::ONE_THOUSAND,
        WeightUnit::Milligram => value / Decimal::from(1_000_000),
        WeightUnit::Unknown(_) => Decimal::ZERO,
    }
}

/// Converts a length to centimeters. Unknown units contribute zero.
pub fn normalize_length(value: Decimal, unit: &LengthUnit) -> Decimal {
    match unit {
        LengthUnit::Centimeter => value,
        LengthUnit::Meter => saturating_mul(value, Decimal::ONE_HUNDRED),
        LengthUnit::Millimeter => value / Decimal::TEN,
        LengthUnit::Unknown(_) => Decimal::ZERO,
    }
}

fn saturating_mul(value: Decimal, factor: Decimal) -> Decimal {
    value.checked_mul(factor).unwrap_or(if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

pub fn weight_in_kg(measure: &Measure<WeightUnit>) -> Decimal {
    match (measure.value, measure.unit.as_ref()) {
        (Some(value), Some(unit)) => normalize_weight(value, unit),
        _ => Decimal::ZERO,
    }
}

pub fn length_in_cm(measure: &Measure<LengthUnit>) -> Decimal {
    match (measure.value, measure.unit.as_ref()) {
        (Some(value), Some(unit)) => normalize_length(value, unit),
        _ => Decimal::ZERO,
    }
}
