use crate::models::Product;

/// Builder for constructing product catalog queries.
///
/// Every filter that is set must match. An empty query matches every product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    /// Exact category.
    pub category: Option<String>,

    /// Exact manufacturer.
    pub manufacturer: Option<String>,

    /// Exact brand.
    pub brand: Option<String>,

    /// Minimum price (inclusive).
    pub min_price: Option<i32>,

    /// Maximum price (inclusive).
    pub max_price: Option<i32>,

    /// Case-insensitive substring of the product name.
    pub name_contains: Option<String>,
}

impl ProductQuery {
    /// Creates a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for products in a category.
    pub fn for_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Default::default()
        }
    }

    /// Creates a query for products in an inclusive price range.
    pub fn for_price_range(min: i32, max: i32) -> Self {
        Self {
            min_price: Some(min),
            max_price: Some(max),
            ..Default::default()
        }
    }

    /// Filters by category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Filters by manufacturer.
    pub fn manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// Filters by brand.
    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Filters to products priced at least `min`.
    pub fn min_price(mut self, min: i32) -> Self {
        self.min_price = Some(min);
        self
    }

    /// Filters to products priced at most `max`.
    pub fn max_price(mut self, max: i32) -> Self {
        self.max_price = Some(max);
        self
    }

    /// Filters by a case-insensitive fragment of the name.
    pub fn name_contains(mut self, fragment: impl Into<String>) -> Self {
        self.name_contains = Some(fragment.into());
        self
    }

    /// Evaluates the query against a single product.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(ref category) = self.category
            && &product.category != category
        {
            return false;
        }
        if let Some(ref manufacturer) = self.manufacturer
            && &product.manufacturer != manufacturer
        {
            return false;
        }
        if let Some(ref brand) = self.brand
            && &product.brand != brand
        {
            return false;
        }
        if let Some(min) = self.min_price
            && product.price < min
        {
            return false;
        }
        if let Some(max) = self.max_price
            && product.price > max
        {
            return false;
        }
        if let Some(ref fragment) = self.name_contains
            && !product
                .name
                .to_lowercase()
                .contains(&fragment.to_lowercase())
        {
            return false;
        }
        true
    }
}
