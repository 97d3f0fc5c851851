//! Plain-text reports.

use std::path::Path;

use anyhow::Context;
use tracing::info;

use stockroom_inventory::InventoryService;
use stockroom_inventory::write_off::total_write_off_value;
use stockroom_sales::{Order, SalesSummary};

const SEPARATOR: &str = "---";

pub fn inventory_report(inventory: &InventoryService) -> String {
    let mut lines = vec![
        "=== INVENTORY REPORT ===".to_string(),
        String::new(),
        format!("Total Products: {}", inventory.get_total_product_count()),
        format!(
            "Total Inventory Value: ${:.2}",
            inventory.calculate_total_inventory_value()
        ),
        format!("Total Quantity: {}", inventory.get_total_quantity()),
        String::new(),
        "=== PRODUCT LIST ===".to_string(),
        String::new(),
    ];
    for product in inventory.get_all_products() {
        lines.push(format!("ID: {}", product.id_typed()));
        lines.push(format!("Name: {}", product.name()));
        lines.push(format!("Category: {}", product.category()));
        lines.push(format!("Quantity: {}", product.quantity()));
        lines.push(format!("Unit Price: ${:.2}", product.unit_price()));
        lines.push(format!("Total Value: ${:.2}", product.total_value()));
        lines.push(SEPARATOR.to_string());
        lines.push(String::new());
    }
    finish(lines)
}

/// Report over the in-memory write-off history of this session.
pub fn write_off_report(inventory: &InventoryService) -> String {
    let history = inventory.write_off_history();
    let mut lines = vec![
        "=== WRITE-OFF HISTORY REPORT ===".to_string(),
        String::new(),
        format!("Total Write-offs: {}", history.len()),
        String::new(),
    ];
    for entry in history {
        lines.push(format!("ID: {}", entry.product.id_typed()));
        lines.push(format!("Name: {}", entry.product.name()));
        lines.push(format!("Quantity: {}", entry.product.quantity()));
        lines.push(format!("Reason: {}", entry.reason));
        lines.push(format!("Value: ${:.2}", entry.value()));
        lines.push(SEPARATOR.to_string());
        lines.push(String::new());
    }
    lines.push(format!(
        "Total Write-off Value: ${:.2}",
        total_write_off_value(history)
    ));
    finish(lines)
}

pub fn sales_report(orders: &[Order]) -> String {
    let summary = SalesSummary::from_orders(orders);
    let mut lines = vec![
        "=== SALES REPORT ===".to_string(),
        String::new(),
        format!("Total Orders: {}", summary.order_count),
        format!("Retail Sales: ${:.2}", summary.retail_total),
        format!("Wholesale Sales: ${:.2}", summary.wholesale_total),
        format!("Total Sales: ${:.2}", summary.total_amount),
        format!("Total Discounts: ${:.2}", summary.total_discount),
        String::new(),
        "=== ORDERS ===".to_string(),
        String::new(),
    ];
    for order in orders {
        lines.push(format!(
            "Order #{} | {} | {} | {} | {} items | ${:.2}",
            order.id_typed(),
            order.order_date().format("%Y-%m-%d"),
            order.company_name(),
            order.order_type(),
            order.items().len(),
            order.total_amount()
        ));
        for item in order.items() {
            lines.push(format!(
                "  {} x{} @ ${:.2} (-{}%) = ${:.2}",
                item.product_name,
                item.quantity,
                item.unit_price,
                item.discount_percent,
                item.total_price
            ));
        }
    }
    finish(lines)
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn write_report(path: &Path, kind: &str, body: String) -> anyhow::Result<()> {
    std::fs::write(path, body)
        .with_context(|| format!("writing {kind} report to {}", path.display()))?;
    info!(path = %path.display(), kind, "report exported");
    Ok(())
}

pub fn export_inventory_report(inventory: &InventoryService, path: &Path) -> anyhow::Result<()> {
    write_report(path, "inventory", inventory_report(inventory))
}

pub fn export_write_off_report(inventory: &InventoryService, path: &Path) -> anyhow::Result<()> {
    write_report(path, "write-off", write_off_report(inventory))
}

pub fn export_sales_report(orders: &[Order], path: &Path) -> anyhow::Result<()> {
    write_report(path, "sales", sales_report(orders))
}
