//! Billable weight for a whole cart.
//!
//! Every item contributes its physical weight to the physical total. Its
//! contribution to the cubic-tier total is either its volumetric weight or its
//! physical weight, depending on the carrier's [`CubicTier`] policy.

use crate::core::units::{length_in_cm, weight_in_kg};
use crate::domain::model::CartItem;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierComparator {
    #[default]
    GreaterThan,
    AtLeast,
}

/// Decides when a package is billed by volume instead of mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubicTier {
    pub threshold: Decimal,
    pub comparator: TierComparator,
}

impl Default for CubicTier {
    fn default() -> Self {
        Self {
            threshold: Decimal::from(50),
            comparator: TierComparator::GreaterThan,
        }
    }
}

impl CubicTier {
    pub fn selects_cubic(&self, cubic_weight: Decimal) -> bool {
        match self.comparator {
            TierComparator::GreaterThan => cubic_weight > self.threshold,
            TierComparator::AtLeast => cubic_weight >= self.threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightPolicy {
    /// 材積換算係數，乘在各邊 (cm) 的乘積上
    pub volumetric_factor: Decimal,
    pub tier: CubicTier,
}

impl Default for WeightPolicy {
    fn default() -> Self {
        Self {
            volumetric_factor: Decimal::from(167),
            tier: CubicTier::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartWeight {
    pub physical: Decimal,
    pub cubic_tier: Decimal,
}

impl CartWeight {
    pub fn billable(&self) -> Decimal {
        self.physical.max(self.cubic_tier)
    }
}

impl WeightPolicy {
    /// Volumetric weight of one unit of the item, or `None` when no side has
    /// a usable measure.
    pub fn cubic_weight(&self, item: &CartItem) -> Option<Decimal> {
        let sides: Vec<Decimal> = item
            .dimensions
            .iter()
            .flat_map(|dimensions| dimensions.values())
            .flatten()
            .map(length_in_cm)
            .filter(|side| *side > Decimal::ZERO)
            .collect();

        if sides.is_empty() {
            return None;
        }

        let volume = sides
            .iter()
            .try_fold(Decimal::ONE, |acc, side| acc.checked_mul(*side))
            .unwrap_or(Decimal::MAX);

        Some(
            volume
                .checked_mul(self.volumetric_factor)
                .unwrap_or(Decimal::MAX),
        )
    }

    pub fn calculate(&self, items: &[CartItem]) -> CartWeight {
        let mut total = CartWeight::default();

        for item in items {
            let quantity = Decimal::from(item.quantity);
            let physical = item
                .weight
                .as_ref()
                .map(weight_in_kg)
                .unwrap_or(Decimal::ZERO)
                .max(Decimal::ZERO);

            // 超過門檻時取材積與實重較大者，邊長增加時計費重量不會變小
            let tiered = match self.cubic_weight(item) {
                Some(cubic) if self.tier.selects_cubic(cubic) => cubic.max(physical),
                _ => physical,
            };

            total.physical = saturating_add(
                total.physical,
                quantity.checked_mul(physical).unwrap_or(Decimal::MAX),
            );
            total.cubic_tier = saturating_add(
                total.cubic_tier,
                quantity.checked_mul(tiered).unwrap_or(Decimal::MAX),
            );
        }

        tracing::debug!(
            "Cart weight for {} items: physical={}kg cubic_tier={}kg",
            items.len(),
            total.physical,
            total.cubic_tier
        );

        total
    }
}

fn saturating_add(left: Decimal, right: Decimal) -> Decimal {
    left.checked_add(right).unwrap_or(Decimal::MAX)
}
