use shopkit_core::{
    ensure_valid, Entity, ErrorMessage, FieldViolation, InMemoryRepository, Modified, Repository,
    ServiceError,
};
use tracing::{error, info};

use crate::models::{seed_categories, Category, Product};

/// Business rules for the product catalog atop the record store.
///
/// This service is the authority serializing stock decrements: every
/// adjustment is applied here as one atomic read-modify-write, so interleaved
/// callers cannot both observe the same stock level and drive it negative.
#[derive(Clone)]
pub struct ProductService<R> {
    products: R,
    categories: InMemoryRepository<Category>,
}

impl<R: Repository<Product>> ProductService<R> {
    pub fn new(products: R) -> Self {
        Self {
            products,
            categories: InMemoryRepository::seeded(seed_categories()),
        }
    }

    pub async fn list_all(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self.products.find_all().await?)
    }

    pub async fn list_by_category(&self, category_id: u64) -> Result<Vec<Product>, ServiceError> {
        let products = self
            .products
            .find_where(|p| p.category_id == category_id)
            .await?;
        if products.is_empty() {
            error!(category_id, "Products with category id not found");
            return Err(ServiceError::NotFound(format!(
                "no products in category {category_id}"
            )));
        }
        Ok(products)
    }

    pub async fn get(&self, id: u64) -> Result<Product, ServiceError> {
        info!(id, "Fetching product");
        match self.products.find_by_id(id).await? {
            Some(product) => Ok(product),
            None => {
                error!(id, "Product not found");
                Err(ServiceError::NotFound(format!("product {id}")))
            }
        }
    }

    pub async fn create(&self, product: Product) -> Result<Product, ServiceError> {
        info!(name = %product.name, "Creating product");
        ensure_valid(&product)?;
        Ok(self.products.insert(product).await?)
    }

    pub async fn update(&self, id: u64, product: Product) -> Result<Product, ServiceError> {
        info!(id, "Updating product");
        match self.products.update(product.with_id(id)).await? {
            Some(updated) => Ok(updated),
            None => {
                error!(id, "Unable to update product: not found");
                Err(ServiceError::NotFound(format!("product {id}")))
            }
        }
    }

    pub async fn delete(&self, id: u64) -> Result<Product, ServiceError> {
        info!(id, "Fetching & deleting product");
        match self.products.delete(id).await? {
            Some(product) => Ok(product),
            None => {
                error!(id, "Unable to delete product: not found");
                Err(ServiceError::NotFound(format!("product {id}")))
            }
        }
    }

    /// Atomically decrement a product's stock.
    ///
    /// The decrement runs as a single guarded read-modify-write under the
    /// store's write lock; concurrent adjustments against the same product
    /// serialize here, at the owner. An adjustment that would drive stock
    /// negative is rejected with a conflict — never clamped to zero, which
    /// would hide the shortfall from the caller.
    pub async fn adjust_stock(&self, id: u64, quantity: u32) -> Result<Product, ServiceError> {
        if quantity == 0 {
            return Err(ServiceError::Validation(ErrorMessage::validation(vec![
                FieldViolation::new("quantity", "must be a positive quantity"),
            ])));
        }
        info!(id, quantity, "Adjusting product stock");
        let outcome = self
            .products
            .modify(id, |product| match product.stock.checked_sub(quantity) {
                Some(remaining) => {
                    product.stock = remaining;
                    Ok(())
                }
                None => Err(product.stock),
            })
            .await?;
        match outcome {
            Modified::Updated(product) => Ok(product),
            Modified::Rejected(available) => {
                error!(id, quantity, available, "Insufficient stock for adjustment");
                Err(ServiceError::Conflict(ErrorMessage::stock_conflict(
                    format!("insufficient stock: requested {quantity}, available {available}"),
                )))
            }
            Modified::Missing => {
                error!(id, "Product not found");
                Err(ServiceError::NotFound(format!("product {id}")))
            }
        }
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ServiceError> {
        Ok(self.categories.find_all().await?)
    }
}
