//! Field layouts of the persisted entities.
//!
//! Decoders rebuild values through the domain constructors, so a record that
//! breaks a domain rule is reported like any other malformed record.

use stockroom_core::{DomainError, OrderId, ProductId, WriteOffId};
use stockroom_inventory::WriteOffRecord;
use stockroom_products::{Product, ProductKind};
use stockroom_sales::{Order, OrderItem, OrderType};

use crate::codec::{Reader, Writer};
use crate::error::StoreError;

/// id, name, category, quantity, unit price, kind label.
pub fn encode_product(product: &Product, w: &mut Writer) -> Result<(), StoreError> {
    w.put_i32(product.id_typed().get());
    w.put_str(product.name())?;
    w.put_str(product.category())?;
    w.put_i32(product.quantity());
    w.put_f64(product.unit_price());
    w.put_str(product.kind().label())
}

pub fn decode_product(r: &mut Reader<'_>) -> Result<Product, StoreError> {
    let id = r.get_i32("product id")?;
    let name = r.get_str("product name")?;
    let category = r.get_str("product category")?;
    let quantity = r.get_i32("product quantity")?;
    let unit_price = r.get_f64("product unit price")?;
    let label = r.get_str("product type")?;
    let product = Product::new(ProductId::new(id), name, category, quantity, unit_price)?;
    Ok(product.with_kind(ProductKind::from_label(&label)))
}

pub fn encode_order(order: &Order, w: &mut Writer) -> Result<(), StoreError> {
    w.put_i32(order.id_typed().get());
    w.put_str(order.company_name())?;
    w.put_str(order.contact_person())?;
    w.put_str(order.phone())?;
    w.put_i32(order.order_type().code());
    w.put_date(Some(order.order_date()));
    let count = i32::try_from(order.items().len())
        .map_err(|_| StoreError::malformed("too many order items"))?;
    w.put_i32(count);
    for item in order.items() {
        w.put_i32(item.product_id.get());
        w.put_str(&item.product_name)?;
        w.put_str(&item.category)?;
        w.put_i32(item.quantity);
        w.put_f64(item.unit_price);
        w.put_f64(item.discount_percent);
        w.put_f64(item.total_price);
    }
    w.put_f64(order.total_amount());
    w.put_f64(order.total_discount());
    Ok(())
}

/// Stored discounts and totals are read past and re-derived from the items.
pub fn decode_order(r: &mut Reader<'_>) -> Result<Order, StoreError> {
    let id = r.get_i32("order id")?;
    if id <= 0 {
        return Err(StoreError::malformed(format!("order id must be positive (got {id})")));
    }
    let company = r.get_str("company name")?;
    let contact = r.get_str("contact person")?;
    let phone = r.get_str("phone")?;
    let code = r.get_i32("order type")?;
    let order_type = OrderType::from_code(code)
        .ok_or_else(|| StoreError::malformed(format!("unknown order type {code}")))?;
    let order_date = r
        .get_date("order date")?
        .ok_or_else(|| StoreError::malformed("order without a date"))?;
    let count = r.get_i32("item count")?;
    if count < 0 {
        return Err(StoreError::malformed(format!("negative item count {count}")));
    }

    let mut order = Order::new(
        OrderId::new(id),
        company,
        contact,
        phone,
        order_type,
        order_date,
    );
    for _ in 0..count {
        let product_id = r.get_i32("item product id")?;
        let name = r.get_str("item product name")?;
        let category = r.get_str("item category")?;
        let quantity = r.get_i32("item quantity")?;
        let unit_price = r.get_f64("item unit price")?;
        r.get_f64("item discount")?;
        r.get_f64("item total")?;
        let item = OrderItem::new(ProductId::new(product_id), name, category, quantity, unit_price)?;
        order.add_item(item)?;
    }
    r.get_f64("total amount")?;
    r.get_f64("total discount")?;
    order.calculate_total();
    Ok(order)
}

pub fn encode_write_off(record: &WriteOffRecord, w: &mut Writer) -> Result<(), StoreError> {
    w.put_i32(record.id.get());
    w.put_i32(record.product_id.get());
    w.put_str(&record.product_name)?;
    w.put_i32(record.quantity);
    w.put_f64(record.value);
    w.put_str(&record.reason)
}

pub fn decode_write_off(r: &mut Reader<'_>) -> Result<WriteOffRecord, StoreError> {
    let id = r.get_i32("write-off id")?;
    let product_id = r.get_i32("write-off product id")?;
    let product_name = r.get_str("write-off product name")?;
    let quantity = r.get_i32("write-off quantity")?;
    let value = r.get_f64("write-off value")?;
    let reason = r.get_str("write-off reason")?;
    if id <= 0 {
        return Err(DomainError::validation(format!("write-off id must be positive (got {id})")).into());
    }
    Ok(WriteOffRecord::new(
        WriteOffId::new(id),
        ProductId::new(product_id),
        product_name,
        quantity,
        value,
        reason,
    )?)
}
