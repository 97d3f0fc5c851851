use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, OrderId, ProductId};
use stockroom_products::Product;

use crate::discount::discount_percent;

/// Order channel; drives discount tier selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    #[default]
    Retail,
    Wholesale,
}

impl OrderType {
    pub fn label(self) -> &'static str {
        match self {
            OrderType::Retail => "Retail",
            OrderType::Wholesale => "Wholesale",
        }
    }

    /// Wire code used by the order file.
    pub fn code(self) -> i32 {
        match self {
            OrderType::Retail => 0,
            OrderType::Wholesale => 1,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(OrderType::Retail),
            1 => Some(OrderType::Wholesale),
            _ => None,
        }
    }
}

impl core::fmt::Display for OrderType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Order line: a snapshot of the product at add-time plus the derived discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub category: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub discount_percent: f64,
    pub total_price: f64,
}

impl OrderItem {
    pub fn new(
        product_id: ProductId,
        product_name: impl Into<String>,
        category: impl Into<String>,
        quantity: i32,
        unit_price: f64,
    ) -> DomainResult<Self> {
        if quantity <= 0 {
            return Err(DomainError::invalid_quantity(format!(
                "order quantity must be positive (got {quantity})"
            )));
        }
        if !unit_price.is_finite() || unit_price < 0.0 {
            return Err(DomainError::invalid_price(format!(
                "unit price must be a non-negative number (got {unit_price})"
            )));
        }
        let mut item = Self {
            product_id,
            product_name: product_name.into(),
            category: category.into(),
            quantity,
            unit_price,
            discount_percent: 0.0,
            total_price: 0.0,
        };
        item.apply_discount(0.0);
        Ok(item)
    }

    /// Snapshot `product`'s identity and current price.
    pub fn from_product(product: &Product, quantity: i32) -> DomainResult<Self> {
        Self::new(
            product.id_typed(),
            product.name(),
            product.category(),
            quantity,
            product.unit_price(),
        )
    }

    /// Undiscounted line amount.
    pub fn gross_amount(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }

    pub fn discount_amount(&self) -> f64 {
        self.gross_amount() - self.total_price
    }

    fn apply_discount(&mut self, discount: f64) {
        self.discount_percent = discount;
        let price_after_discount = self.unit_price * (1.0 - discount / 100.0);
        self.total_price = price_after_discount * f64::from(self.quantity);
    }
}

/// Entity: Order.
///
/// Totals are derived from the items and re-computed after every item or
/// channel change, so they can never drift from the lines they summarize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    id: OrderId,
    company_name: String,
    contact_person: String,
    phone: String,
    order_type: OrderType,
    order_date: NaiveDate,
    items: Vec<OrderItem>,
    total_amount: f64,
    total_discount: f64,
}

impl Order {
    pub fn new(
        id: OrderId,
        company_name: impl Into<String>,
        contact_person: impl Into<String>,
        phone: impl Into<String>,
        order_type: OrderType,
        order_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            company_name: company_name.into(),
            contact_person: contact_person.into(),
            phone: phone.into(),
            order_type,
            order_date,
            items: Vec::new(),
            total_amount: 0.0,
            total_discount: 0.0,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn contact_person(&self) -> &str {
        &self.contact_person
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn order_date(&self) -> NaiveDate {
        self.order_date
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn item(&self, product_id: ProductId) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }

    pub fn total_discount(&self) -> f64 {
        self.total_discount
    }

    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i64::from(i.quantity)).sum()
    }

    pub fn set_id(&mut self, id: OrderId) {
        self.id = id;
    }

    pub fn set_company_name(&mut self, name: impl Into<String>) {
        self.company_name = name.into();
    }

    pub fn set_contact_person(&mut self, contact: impl Into<String>) {
        self.contact_person = contact.into();
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.phone = phone.into();
    }

    pub fn set_order_date(&mut self, date: NaiveDate) {
        self.order_date = date;
    }

    pub fn set_order_type(&mut self, order_type: OrderType) {
        self.order_type = order_type;
        self.calculate_total();
    }

    /// Add a line; a product already in the order has its quantity increased
    /// instead of getting a second line.
    pub fn add_item(&mut self, item: OrderItem) -> DomainResult<()> {
        if item.quantity <= 0 {
            return Err(DomainError::invalid_quantity(format!(
                "order quantity must be positive (got {})",
                item.quantity
            )));
        }
        match self.items.iter_mut().find(|i| i.product_id == item.product_id) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or_else(|| DomainError::invalid_quantity("order quantity overflow"))?;
            }
            None => self.items.push(item),
        }
        self.calculate_total();
        Ok(())
    }

    /// Remove the line for `product_id`. Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.calculate_total();
        self.items.len() != before
    }

    /// Set a line's quantity; `<= 0` removes the line. Unknown products are
    /// ignored. Returns whether a line was found.
    pub fn update_item_quantity(&mut self, product_id: ProductId, quantity: i32) -> bool {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                self.calculate_total();
                true
            }
            None => false,
        }
    }

    pub fn clear_items(&mut self) {
        self.items.clear();
        self.total_amount = 0.0;
        self.total_discount = 0.0;
    }

    /// Re-derive every line's discount and the order totals.
    pub fn calculate_total(&mut self) {
        let order_type = self.order_type;
        let mut total_amount = 0.0;
        let mut total_discount = 0.0;

        for item in &mut self.items {
            item.apply_discount(discount_percent(order_type, item.quantity));
            total_amount += item.total_price;
            total_discount += item.gross_amount() - item.total_price;
        }

        self.total_amount = total_amount;
        self.total_discount = total_discount;
    }

    /// Check the order is complete enough to be recorded.
    pub fn validate(&self) -> DomainResult<()> {
        if self.company_name.trim().is_empty() {
            return Err(DomainError::validation("company name is required"));
        }
        if self.contact_person.trim().is_empty() {
            return Err(DomainError::validation("contact person is required"));
        }
        if self.phone.trim().is_empty() {
            return Err(DomainError::validation("phone number is required"));
        }
        if self.items.is_empty() {
            return Err(DomainError::validation("order has no items"));
        }
        Ok(())
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
