use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, ProductId};

use crate::repository::Catalogued;

/// Product kind, persisted as a human-readable label.
///
/// Unknown labels read from disk are preserved verbatim so that a load/save
/// cycle does not rewrite them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    #[default]
    Standard,
    Other(String),
}

impl ProductKind {
    pub const STANDARD_LABEL: &'static str = "Standard Product";

    pub fn label(&self) -> &str {
        match self {
            ProductKind::Standard => Self::STANDARD_LABEL,
            ProductKind::Other(label) => label,
        }
    }

    pub fn from_label(label: &str) -> Self {
        if label == Self::STANDARD_LABEL {
            ProductKind::Standard
        } else {
            ProductKind::Other(label.to_string())
        }
    }
}

impl core::fmt::Display for ProductKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Entity: Product.
///
/// Quantity and unit price are validated on construction and on every
/// mutation; a failed mutation leaves the product unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    id: ProductId,
    name: String,
    category: String,
    quantity: i32,
    unit_price: f64,
    kind: ProductKind,
}

impl Product {
    /// Validated constructor for a standard product.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: impl Into<String>,
        quantity: i32,
        unit_price: f64,
    ) -> DomainResult<Self> {
        let name = name.into();
        if !id.is_valid() {
            return Err(DomainError::validation(format!(
                "product id must be positive (got {id})"
            )));
        }
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        ensure_quantity(quantity)?;
        ensure_price(unit_price)?;

        Ok(Self {
            id,
            name,
            category: category.into(),
            quantity,
            unit_price,
            kind: ProductKind::Standard,
        })
    }

    pub fn with_kind(mut self, kind: ProductKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn kind(&self) -> &ProductKind {
        &self.kind
    }

    /// Derived: `quantity * unit_price`.
    pub fn total_value(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }

    /// Unit price after a percentage discount.
    pub fn discounted_price(&self, discount_percent: f64) -> f64 {
        self.unit_price * (1.0 - discount_percent / 100.0)
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> DomainResult<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        self.name = name;
        Ok(())
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    pub fn set_quantity(&mut self, quantity: i32) -> DomainResult<()> {
        ensure_quantity(quantity)?;
        self.quantity = quantity;
        Ok(())
    }

    pub fn set_unit_price(&mut self, unit_price: f64) -> DomainResult<()> {
        ensure_price(unit_price)?;
        self.unit_price = unit_price;
        Ok(())
    }

    /// Increase stock by `qty`. The result must stay non-negative.
    pub fn increase(&mut self, qty: i32) -> DomainResult<()> {
        let next = self
            .quantity
            .checked_add(qty)
            .ok_or_else(|| DomainError::invalid_quantity("quantity overflow"))?;
        if next < 0 {
            return Err(DomainError::invalid_quantity(
                "resulting quantity cannot be negative",
            ));
        }
        self.quantity = next;
        Ok(())
    }

    /// Decrease stock by `qty`.
    ///
    /// Rejects a negative argument and any result below zero; in both cases the
    /// quantity is left untouched.
    pub fn decrease(&mut self, qty: i32) -> DomainResult<()> {
        if qty < 0 {
            return Err(DomainError::invalid_quantity(
                "cannot subtract a negative quantity",
            ));
        }
        let next = self.quantity - qty;
        if next < 0 {
            return Err(DomainError::invalid_quantity(format!(
                "resulting quantity cannot be negative (have {}, removing {qty})",
                self.quantity
            )));
        }
        self.quantity = next;
        Ok(())
    }

    /// Products are the same entity when their ids match.
    pub fn same_identity(&self, other: &Product) -> bool {
        self.id == other.id
    }

    /// Natural ordering of products is by name.
    pub fn cmp_by_name(&self, other: &Product) -> Ordering {
        self.name.cmp(&other.name)
    }
}

fn ensure_quantity(quantity: i32) -> DomainResult<()> {
    if quantity < 0 {
        return Err(DomainError::invalid_quantity(format!(
            "quantity cannot be negative (got {quantity})"
        )));
    }
    Ok(())
}

fn ensure_price(unit_price: f64) -> DomainResult<()> {
    if !unit_price.is_finite() || unit_price < 0.0 {
        return Err(DomainError::invalid_price(format!(
            "unit price must be a non-negative number (got {unit_price})"
        )));
    }
    Ok(())
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Catalogued for Product {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn unit_price(&self) -> f64 {
        self.unit_price
    }

    fn quantity(&self) -> i32 {
        self.quantity
    }

    fn total_value(&self) -> f64 {
        Product::total_value(self)
    }
}

impl core::fmt::Display for Product {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Product{{id={}, name={}, category={}, quantity={}, unitPrice={:.2}, totalValue={:.2}}}",
            self.id,
            self.name,
            self.category,
            self.quantity,
            self.unit_price,
            self.total_value()
        )
    }
}
