//! Product catalog service with guarded deletion.

use common::ProductCode;
use common::status::{CANCELLED, DELIVERED};
use store::{OrderRepository, Product, ProductQuery, ProductRepository};

use crate::error::DomainError;
use crate::guard::DependencyGuard;

/// Service for managing catalog products.
#[derive(Clone)]
pub struct ProductService<P: ProductRepository, O: OrderRepository> {
    products: P,
    guard: DependencyGuard<O>,
}

impl<P: ProductRepository, O: OrderRepository> ProductService<P, O> {
    /// Creates a product service. `orders` backs the deletion guard.
    pub fn new(products: P, orders: O) -> Self {
        Self {
            products,
            guard: DependencyGuard::new(orders),
        }
    }

    /// Saves a product. An existing product with the same code is overwritten.
    #[tracing::instrument(skip(self, product), fields(code = %product.code))]
    pub async fn create(&self, product: Product) -> Result<Product, DomainError> {
        Ok(self.products.save_product(product).await?)
    }

    /// Lists every product.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.products.find_all_products().await?)
    }

    /// Loads a product by code.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, code: &ProductCode) -> Result<Option<Product>, DomainError> {
        Ok(self.products.find_product(code).await?)
    }

    /// Lists products matching a catalog query.
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, query: ProductQuery) -> Result<Vec<Product>, DomainError> {
        Ok(self.products.search_products(query).await?)
    }

    /// Replaces every field except the code.
    #[tracing::instrument(skip(self, product))]
    pub async fn update(
        &self,
        code: &ProductCode,
        product: Product,
    ) -> Result<Product, DomainError> {
        let mut existing = self
            .products
            .find_product(code)
            .await?
            .ok_or_else(|| DomainError::not_found("Product", code))?;

        existing.name = product.name;
        existing.image = product.image;
        existing.price = product.price;
        existing.manufacturer = product.manufacturer;
        existing.distributor = product.distributor;
        existing.brand = product.brand;
        existing.material = product.material;
        existing.description = product.description;
        existing.link = product.link;
        existing.category = product.category;

        Ok(self.products.save_product(existing).await?)
    }

    /// Deletes a product unless an active order still contains it.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, code: &ProductCode) -> Result<(), DomainError> {
        if !self.products.product_exists(code).await? {
            return Err(DomainError::not_found("Product", code));
        }

        if self.guard.has_active_order_containing_product(code).await? {
            metrics::counter!("deletions_blocked_total", "entity" => "product").increment(1);
            tracing::info!(%code, "product deletion blocked by active orders");
            return Err(DomainError::conflict(blocked_message(code)));
        }

        self.products.delete_product(code).await?;
        tracing::info!(%code, "product deleted");
        Ok(())
    }

    /// Reports whether [`delete`](Self::delete) would currently succeed.
    ///
    /// Absent products cannot be deleted. Has no side effects.
    #[tracing::instrument(skip(self))]
    pub async fn can_delete(&self, code: &ProductCode) -> Result<bool, DomainError> {
        if !self.products.product_exists(code).await? {
            return Ok(false);
        }
        Ok(!self.guard.has_active_order_containing_product(code).await?)
    }
}

fn blocked_message(code: &ProductCode) -> String {
    format!(
        "Deletion blocked: product '{code}' cannot be deleted because it is part of one or \
         more active orders. Cancel every order containing it or mark it as '{DELIVERED}' \
         first. Every status other than '{CANCELLED}' and '{DELIVERED}' blocks deletion, \
         for example 'en preparacion' or 'pendiente'."
    )
}
