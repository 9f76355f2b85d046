// Rust guideline compliant 2026-10-16

//! In-memory adapter for the `Catalog` port.
//!
//! Keeps items in insertion order (the cold-start fallback order) with an id
//! index for lookups. Construction rejects duplicate ids and invalid prices,
//! so the catalog invariants hold for the adapter's whole lifetime.

use std::collections::HashMap;

use domain::{Catalog, CatalogError, CatalogItem, Category, ItemId};

/// `Catalog` adapter backed by a `Vec<CatalogItem>` and an id index.
#[derive(Debug)]
pub struct InMemoryCatalog {
    items: Vec<CatalogItem>,
    index: HashMap<ItemId, usize>,
}

impl InMemoryCatalog {
    /// Build a catalog from `items`, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateItem`] when two items share an id, or
    /// [`CatalogError::InvalidPrice`] for a negative or non-finite price.
    pub fn new(items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            if !(item.price.is_finite() && item.price >= 0.0) {
                return Err(CatalogError::InvalidPrice { id: item.id, price: item.price });
            }
            if index.insert(item.id, pos).is_some() {
                return Err(CatalogError::DuplicateItem { id: item.id });
            }
        }
        Ok(Self { items, index })
    }

    /// The storefront's sample assortment.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in data; the signature mirrors [`new`](Self::new).
    // #[allow] not #[expect]: used by shop_demo, dead in shop_demo_bench.
    #[allow(dead_code, reason = "used by shop_demo binary; dead in shop_demo_bench")]
    pub fn demo() -> Result<Self, CatalogError> {
        Self::new(vec![
            CatalogItem::new(1, "Floral Summer Dress", Category::Dresses, ["floral", "summer", "casual"], 59.99),
            CatalogItem::new(2, "Little Black Dress", Category::Dresses, ["evening", "classic"], 89.99),
            CatalogItem::new(3, "Linen Wrap Dress", Category::Dresses, ["linen", "summer"], 74.50),
            CatalogItem::new(4, "Basic Cotton Tee", Category::Tops, ["cotton", "casual", "basic"], 19.99),
            CatalogItem::new(5, "Silk Blouse", Category::Tops, ["silk", "office"], 64.00),
            CatalogItem::new(6, "Striped Linen Shirt", Category::Tops, ["linen", "summer", "casual"], 39.90),
            CatalogItem::new(7, "High-Rise Jeans", Category::Bottoms, ["denim", "casual"], 79.00),
            CatalogItem::new(8, "Pleated Midi Skirt", Category::Bottoms, ["office", "classic"], 54.00),
            CatalogItem::new(9, "Cargo Trousers", Category::Bottoms, ["cotton", "utility"], 49.50),
            CatalogItem::new(10, "Wool Overcoat", Category::Outerwear, ["wool", "winter", "classic"], 210.00),
            CatalogItem::new(11, "Denim Jacket", Category::Outerwear, ["denim", "casual"], 95.00),
            CatalogItem::new(12, "Puffer Parka", Category::Outerwear, ["winter", "utility"], 160.00),
        ])
    }

    /// Items of `category`, in catalog order.
    #[allow(dead_code, reason = "used by shop_demo binary; dead in shop_demo_bench")]
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter().filter(move |i| i.category == category)
    }
}

impl Catalog for InMemoryCatalog {
    fn item(&self, id: ItemId) -> Option<&CatalogItem> {
        self.index.get(&id).map(|&pos| &self.items[pos])
    }

    fn items(&self) -> &[CatalogItem] {
        &self.items
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::InMemoryCatalog;
    use domain::{Catalog as _, CatalogError, CatalogItem, Category, ItemId};

    fn tee(id: u64, price: f64) -> CatalogItem {
        CatalogItem::new(id, "Tee", Category::Tops, ["cotton"], price)
    }

    // IMC-T01: lookup by id resolves the right item.
    #[test]
    fn lookup_by_id() {
        let catalog = InMemoryCatalog::new(vec![tee(3, 10.0), tee(1, 12.0)]).unwrap();
        assert!((catalog.item(ItemId(1)).unwrap().price - 12.0).abs() < f64::EPSILON);
        assert!(catalog.item(ItemId(2)).is_none());
    }

    // IMC-T02: items() preserves insertion order, not id order.
    #[test]
    fn items_keep_insertion_order() {
        let catalog = InMemoryCatalog::new(vec![tee(3, 10.0), tee(1, 12.0), tee(2, 8.0)]).unwrap();
        let ids: Vec<u64> = catalog.items().iter().map(|i| i.id.0).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    // IMC-T03: duplicate ids are rejected.
    #[test]
    fn duplicate_id_rejected() {
        let result = InMemoryCatalog::new(vec![tee(1, 10.0), tee(1, 12.0)]);
        assert_eq!(result.unwrap_err(), CatalogError::DuplicateItem { id: ItemId(1) });
    }

    // IMC-T04: negative and NaN prices are rejected.
    #[test]
    fn invalid_price_rejected() {
        assert!(matches!(
            InMemoryCatalog::new(vec![tee(1, -1.0)]),
            Err(CatalogError::InvalidPrice { .. })
        ));
        assert!(matches!(
            InMemoryCatalog::new(vec![tee(1, f64::NAN)]),
            Err(CatalogError::InvalidPrice { .. })
        ));
    }

    // IMC-T05: the demo assortment covers every category.
    #[test]
    fn demo_catalog_covers_all_categories() {
        let catalog = InMemoryCatalog::demo().unwrap();
        assert_eq!(catalog.items().len(), 12);
        for category in Category::ALL {
            assert!(catalog.in_category(category).count() >= 3, "{category}");
        }
    }
}
