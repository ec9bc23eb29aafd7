use crate::{
    Error,
    product::{NewProduct, Product, ProductId},
};
use async_trait::async_trait;

/// Repository for product data access
#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    async fn create(&self, product: NewProduct) -> Result<Product, Error>;

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, Error>;

    async fn list(&self) -> Result<Vec<Product>, Error>;

    /// Replace name, description and price. `None` when no product has `id`.
    async fn replace(&self, id: ProductId, product: NewProduct) -> Result<Option<Product>, Error>;

    async fn delete(&self, id: ProductId) -> Result<bool, Error>;
}
