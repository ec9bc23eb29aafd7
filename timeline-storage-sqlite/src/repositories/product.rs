use async_trait::async_trait;
use sqlx::SqlitePool;
use timeline_core::{Error, NewProduct, Product, ProductId, repositories::ProductRepository};

use super::{map_sqlx_err, timestamp};

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SqliteProduct {
    id: i64,
    name: String,
    description: Option<String>,
    price: f64,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<SqliteProduct> for Product {
    type Error = Error;

    fn try_from(row: SqliteProduct) -> Result<Self, Self::Error> {
        Ok(Product {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            created_at: timestamp(row.created_at)?,
            updated_at: timestamp(row.updated_at)?,
        })
    }
}

pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn create(&self, product: NewProduct) -> Result<Product, Error> {
        let now = chrono::Utc::now().timestamp_millis();

        let row = sqlx::query_as::<_, SqliteProduct>(
            r#"
            INSERT INTO products (name, description, price, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            RETURNING *
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_err(e, "Failed to create product"))?;

        row.try_into()
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, Error> {
        sqlx::query_as::<_, SqliteProduct>("SELECT * FROM products WHERE id = ?1")
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_err(e, "Failed to find product"))?
            .map(Product::try_from)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Product>, Error> {
        sqlx::query_as::<_, SqliteProduct>("SELECT * FROM products ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_err(e, "Failed to list products"))?
            .into_iter()
            .map(Product::try_from)
            .collect()
    }

    async fn replace(&self, id: ProductId, product: NewProduct) -> Result<Option<Product>, Error> {
        let now = chrono::Utc::now().timestamp_millis();

        sqlx::query_as::<_, SqliteProduct>(
            r#"
            UPDATE products
            SET name = ?2, description = ?3, price = ?4, updated_at = ?5
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(id.into_inner())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_err(e, "Failed to update product"))?
        .map(Product::try_from)
        .transpose()
    }

    async fn delete(&self, id: ProductId) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_err(e, "Failed to delete product"))?;

        Ok(result.rows_affected() > 0)
    }
}
