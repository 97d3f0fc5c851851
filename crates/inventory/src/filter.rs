//! Category + free-text product filtering for list views.

use stockroom_products::Product;

use crate::service::InventoryService;

/// Category selector value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All Categories";

/// Products in `category` (or all of them for [`ALL_CATEGORIES`] / empty)
/// whose name contains the trimmed `search_text`, case-insensitively.
///
/// The unfiltered view is ordered by category; a single category keeps the
/// inventory's order.
pub fn filter_products<'a>(
    inventory: &'a InventoryService,
    category: &str,
    search_text: &str,
) -> Vec<&'a Product> {
    let mut products = if category.is_empty() || category == ALL_CATEGORIES {
        let mut all = inventory.get_all_products();
        all.sort_by(|a, b| a.category().cmp(b.category()));
        all
    } else {
        inventory.filter_by_category(category)
    };

    let needle = search_text.trim().to_lowercase();
    if !needle.is_empty() {
        products.retain(|p| p.name().to_lowercase().contains(&needle));
    }
    products
}
