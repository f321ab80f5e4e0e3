//! # Catalog
//!
//! Ordered set of product slots keyed by code.
//!
//! ```text
//! ┌──────┬───────────────┬────────┬─────┐
//! │ code │ name          │ price  │ qty │   insertion order = display order
//! ├──────┼───────────────┼────────┼─────┤
//! │ A1   │ Coke          │ $1.75  │  9  │
//! │ A2   │ Pepsi         │ $1.75  │  9  │
//! │ ...  │               │        │     │
//! │ F4   │ Mint Gum      │ $0.75  │ 10  │
//! └──────┴───────────────┴────────┴─────┘
//! ```
//!
//! The catalog is owned by exactly one [`Machine`](crate::Machine). Codes are
//! unique: `add` replaces the slot in place rather than appending a duplicate.

use std::collections::HashSet;

use crate::error::{CatalogError, CatalogResult};
use crate::money::Money;
use crate::types::{GridLayout, Product, ProductRecord};

/// Default assortment of the standard 6×4 machine, in grid order.
const DEFAULT_PRODUCTS: [(&str, &str, i64, u32); 24] = [
    ("A1", "Coke", 175, 9),
    ("A2", "Pepsi", 175, 9),
    ("A3", "Dr Pepper", 175, 9),
    ("A4", "Powerade", 225, 10),
    ("B1", "Water", 125, 9),
    ("B2", "Sparkling", 200, 10),
    ("B3", "Iced Coffee", 350, 10),
    ("B4", "Energy Drk", 300, 10),
    ("C1", "Classic Chips", 150, 9),
    ("C2", "BBQ Chips", 150, 10),
    ("C3", "Sour Cream", 150, 10),
    ("C4", "Pretzels", 125, 10),
    ("D1", "Mixed Nuts", 250, 10),
    ("D2", "Protein Bar", 300, 10),
    ("D3", "Beef Jerky", 450, 10),
    ("D4", "Popcorn", 200, 10),
    ("E1", "PB Cookie", 200, 10),
    ("E2", "Dark Choco", 250, 10),
    ("E3", "Milk Choco", 225, 10),
    ("E4", "Gummy Bears", 175, 10),
    ("F1", "Skittles", 175, 10),
    ("F2", "Brownie", 250, 10),
    ("F3", "Fruit Snacks", 150, 10),
    ("F4", "Mint Gum", 75, 10),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Catalog::default()
    }

    /// The 24-slot factory assortment (A1–F4).
    pub fn with_defaults() -> Self {
        let products: Vec<Product> = DEFAULT_PRODUCTS
            .iter()
            .filter_map(|&(code, name, cents, quantity)| {
                Product::new(code, name, Money::from_cents(cents), quantity).ok()
            })
            .collect();
        debug_assert_eq!(
            products.len(),
            DEFAULT_PRODUCTS.len(),
            "every default row must pass validation"
        );
        Catalog { products }
    }

    /// Builds a catalog from snapshot records.
    ///
    /// Fails on the first invalid record or on a duplicated code.
    pub fn from_records(records: Vec<ProductRecord>) -> CatalogResult<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut products = Vec::with_capacity(records.len());

        for record in records {
            if !seen.insert(record.code.clone()) {
                return Err(CatalogError::Load(format!("duplicate code {}", record.code)));
            }
            let code = record.code.clone();
            let product = Product::try_from(record)
                .map_err(|e| CatalogError::Load(format!("record {}: {}", code, e)))?;
            products.push(product);
        }

        Ok(Catalog { products })
    }

    /// Inserts a product, or replaces the slot that already has its code.
    ///
    /// A replaced slot keeps its position in the display order.
    pub fn add(&mut self, product: Product) {
        match self.position(product.code()) {
            Some(index) => self.products[index] = product,
            None => self.products.push(product),
        }
    }

    /// Looks up a product by code.
    pub fn get(&self, code: &str) -> CatalogResult<&Product> {
        self.products
            .iter()
            .find(|p| p.code() == code)
            .ok_or_else(|| CatalogError::NotFound(code.to_string()))
    }

    pub(crate) fn get_mut(&mut self, code: &str) -> CatalogResult<&mut Product> {
        self.products
            .iter_mut()
            .find(|p| p.code() == code)
            .ok_or_else(|| CatalogError::NotFound(code.to_string()))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.position(code).is_some()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Sets every slot to `quantity` units. Names and prices are untouched.
    pub fn restock_all(&mut self, quantity: u32) {
        for product in &mut self.products {
            product.set_quantity(quantity);
        }
    }

    /// Products in the order of the layout's codes.
    ///
    /// Codes with no product are skipped; products outside the layout are
    /// not returned.
    pub fn in_grid_order(&self, layout: &GridLayout) -> Vec<&Product> {
        layout
            .codes()
            .iter()
            .filter_map(|code| self.get(code).ok())
            .collect()
    }

    /// Flat records for a snapshot, in insertion order.
    pub fn serialize(&self) -> Vec<ProductRecord> {
        self.products.iter().map(ProductRecord::from).collect()
    }

    /// Replaces the whole catalog with `records`.
    ///
    /// The replacement is built completely before anything is swapped in,
    /// so on error the current catalog is left exactly as it was.
    pub fn deserialize(&mut self, records: Vec<ProductRecord>) -> CatalogResult<()> {
        let replacement = Catalog::from_records(records)?;
        *self = replacement;
        Ok(())
    }

    fn position(&self, code: &str) -> Option<usize> {
        self.products.iter().position(|p| p.code() == code)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(code: &str, name: &str, cents: i64, quantity: u32) -> Product {
        Product::new(code, name, Money::from_cents(cents), quantity).unwrap()
    }

    fn record(code: &str, cents: i64) -> ProductRecord {
        ProductRecord {
            code: code.to_string(),
            name: format!("Item {}", code),
            price: Money::from_cents(cents),
            quantity: 3,
        }
    }

    #[test]
    fn test_defaults_cover_standard_grid() {
        let catalog = Catalog::with_defaults();
        assert_eq!(catalog.len(), 24);

        let codes: Vec<&str> = catalog.iter().map(|p| p.code()).collect();
        let grid = GridLayout::standard().codes();
        assert_eq!(codes, grid.iter().map(String::as_str).collect::<Vec<_>>());

        let coke = catalog.get("A1").unwrap();
        assert_eq!(coke.name(), "Coke");
        assert_eq!(coke.price(), Money::from_cents(175));
        assert_eq!(coke.quantity(), 9);
        assert_eq!(catalog.get("F4").unwrap().price(), Money::from_cents(75));
    }

    #[test]
    fn test_every_default_row_is_valid() {
        for &(code, name, cents, quantity) in DEFAULT_PRODUCTS.iter() {
            let result = Product::new(code, name, Money::from_cents(cents), quantity);
            assert!(result.is_ok(), "default row {} rejected: {:?}", code, result);
        }
    }

    #[test]
    fn test_add_replaces_in_place() {
        let mut catalog = Catalog::new();
        catalog.add(product("A1", "Coke", 175, 1));
        catalog.add(product("A2", "Pepsi", 175, 1));
        catalog.add(product("A1", "Cola Zero", 200, 5));

        assert_eq!(catalog.len(), 2);
        let first = catalog.iter().next().unwrap();
        assert_eq!(first.name(), "Cola Zero");
        assert_eq!(first.quantity(), 5);
    }

    #[test]
    fn test_get_unknown_code() {
        let catalog = Catalog::with_defaults();
        assert_eq!(
            catalog.get("Z9").unwrap_err(),
            CatalogError::NotFound("Z9".to_string())
        );
        assert!(!catalog.contains("Z9"));
        assert!(catalog.contains("C3"));
    }

    #[test]
    fn test_restock_all_keeps_price_and_name() {
        let mut catalog = Catalog::with_defaults();
        catalog.restock_all(4);

        assert!(catalog.iter().all(|p| p.quantity() == 4));
        assert_eq!(catalog.get("D3").unwrap().name(), "Beef Jerky");
        assert_eq!(catalog.get("D3").unwrap().price(), Money::from_cents(450));
    }

    #[test]
    fn test_in_grid_order_skips_missing_codes() {
        let mut catalog = Catalog::new();
        catalog.add(product("B1", "Water", 125, 1));
        catalog.add(product("A2", "Pepsi", 175, 1));
        catalog.add(product("Z9", "Mystery", 100, 1));

        let ordered: Vec<&str> = catalog
            .in_grid_order(&GridLayout::standard())
            .iter()
            .map(|p| p.code())
            .collect();
        assert_eq!(ordered, vec!["A2", "B1"]);
    }

    #[test]
    fn test_deserialize_replaces_everything() {
        let mut catalog = Catalog::with_defaults();
        catalog
            .deserialize(vec![record("H1", 100), record("H2", 50)])
            .unwrap();

        assert_eq!(catalog.len(), 2);
        assert!(!catalog.contains("A1"));
        assert_eq!(catalog.get("H2").unwrap().price(), Money::from_cents(50));
    }

    #[test]
    fn test_deserialize_invalid_record_leaves_catalog_untouched() {
        let mut catalog = Catalog::with_defaults();
        let before = catalog.clone();

        let result = catalog.deserialize(vec![record("H1", 100), record("H2", -1)]);
        assert!(matches!(result, Err(CatalogError::Load(_))));
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_deserialize_duplicate_code_fails() {
        let mut catalog = Catalog::with_defaults();
        let before = catalog.clone();

        let result = catalog.deserialize(vec![record("H1", 100), record("H1", 200)]);
        assert!(matches!(result, Err(CatalogError::Load(_))));
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_serialize_preserves_order() {
        let catalog = Catalog::with_defaults();
        let records = catalog.serialize();
        assert_eq!(records.len(), 24);
        assert_eq!(records[0].code, "A1");
        assert_eq!(records[23].code, "F4");
        assert_eq!(Catalog::from_records(records).unwrap(), catalog);
    }
}
