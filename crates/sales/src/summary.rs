//! Aggregate sales figures over a set of orders (sales report data).

use serde::Serialize;

use crate::order::{Order, OrderType};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesSummary {
    pub order_count: usize,
    pub retail_total: f64,
    pub wholesale_total: f64,
    pub total_amount: f64,
    pub total_discount: f64,
}

impl SalesSummary {
    pub fn from_orders<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Self {
        orders.into_iter().fold(Self::default(), |mut acc, order| {
            acc.order_count += 1;
            match order.order_type() {
                OrderType::Retail => acc.retail_total += order.total_amount(),
                OrderType::Wholesale => acc.wholesale_total += order.total_amount(),
            }
            acc.total_amount += order.total_amount();
            acc.total_discount += order.total_discount();
            acc
        })
    }
}
