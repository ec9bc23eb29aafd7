use std::sync::Arc;

use crate::{
    Error,
    error::StorageError,
    product::{NewProduct, Product, ProductId},
    repositories::ProductRepository,
    validation::{require_non_empty, validate_price},
};

pub struct ProductService<P: ProductRepository> {
    products: Arc<P>,
}

impl<P: ProductRepository> ProductService<P> {
    pub fn new(products: Arc<P>) -> Self {
        Self { products }
    }

    pub async fn list(&self) -> Result<Vec<Product>, Error> {
        self.products.list().await
    }

    pub async fn get(&self, id: ProductId) -> Result<Product, Error> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| StorageError::NotFound("Product").into())
    }

    pub async fn create(&self, product: NewProduct) -> Result<Product, Error> {
        validate(&product)?;
        let product = self.products.create(product).await?;
        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Replace every field of an existing product.
    pub async fn replace(&self, id: ProductId, product: NewProduct) -> Result<Product, Error> {
        validate(&product)?;
        self.products
            .replace(id, product)
            .await?
            .ok_or_else(|| StorageError::NotFound("Product").into())
    }

    pub async fn delete(&self, id: ProductId) -> Result<(), Error> {
        if !self.products.delete(id).await? {
            return Err(StorageError::NotFound("Product").into());
        }
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

fn validate(product: &NewProduct) -> Result<(), Error> {
    require_non_empty(&product.name, "Name")?;
    validate_price(product.price)?;
    Ok(())
}
