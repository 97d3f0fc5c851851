//! Tiered discount rule.

use crate::order::OrderType;

/// Wholesale tiers as `(minimum quantity, discount percent)`, highest first.
const WHOLESALE_TIERS: [(i32, f64); 3] = [(100, 15.0), (50, 10.0), (10, 5.0)];

/// Discount percentage for one order line.
///
/// Retail never discounts. Wholesale picks the highest tier whose inclusive
/// lower bound the quantity reaches; tiers do not stack.
pub fn discount_percent(order_type: OrderType, quantity: i32) -> f64 {
    match order_type {
        OrderType::Retail => 0.0,
        OrderType::Wholesale => WHOLESALE_TIERS
            .iter()
            .find(|(min, _)| quantity >= *min)
            .map_or(0.0, |(_, pct)| *pct),
    }
}
