use async_trait::async_trait;
use sqlx::SqlitePool;
use timeline_core::{
    Customer, CustomerId, Error, NewCustomer, error::StorageError,
    repositories::CustomerRepository,
};

use super::{map_sqlx_err, timestamp};

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SqliteCustomer {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    postal_code: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<SqliteCustomer> for Customer {
    type Error = Error;

    fn try_from(row: SqliteCustomer) -> Result<Self, Self::Error> {
        Ok(Customer {
            id: CustomerId::new(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            city: row.city,
            state: row.state,
            postal_code: row.postal_code,
            created_at: timestamp(row.created_at)?,
            updated_at: timestamp(row.updated_at)?,
        })
    }
}

pub struct SqliteCustomerRepository {
    pool: SqlitePool,
}

impl SqliteCustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for SqliteCustomerRepository {
    async fn create(&self, customer: NewCustomer) -> Result<Customer, Error> {
        let now = chrono::Utc::now().timestamp_millis();

        let row = sqlx::query_as::<_, SqliteCustomer>(
            r#"
            INSERT INTO customers
                (first_name, last_name, email, phone, address, city, state, postal_code, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            RETURNING *
            "#,
        )
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.city)
        .bind(&customer.state)
        .bind(&customer.postal_code)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_err(e, "Failed to create customer"))?;

        row.try_into()
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, Error> {
        sqlx::query_as::<_, SqliteCustomer>("SELECT * FROM customers WHERE id = ?1")
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_err(e, "Failed to find customer"))?
            .map(Customer::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, Error> {
        sqlx::query_as::<_, SqliteCustomer>("SELECT * FROM customers WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_err(e, "Failed to find customer by email"))?
            .map(Customer::try_from)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Customer>, Error> {
        sqlx::query_as::<_, SqliteCustomer>("SELECT * FROM customers ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_err(e, "Failed to list customers"))?
            .into_iter()
            .map(Customer::try_from)
            .collect()
    }

    async fn update(&self, customer: &Customer) -> Result<Customer, Error> {
        let now = chrono::Utc::now().timestamp_millis();

        let row = sqlx::query_as::<_, SqliteCustomer>(
            r#"
            UPDATE customers
            SET first_name = ?2, last_name = ?3, email = ?4, phone = ?5, address = ?6,
                city = ?7, state = ?8, postal_code = ?9, updated_at = ?10
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(customer.id.into_inner())
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.city)
        .bind(&customer.state)
        .bind(&customer.postal_code)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_err(e, "Failed to update customer"))?
        .ok_or(StorageError::NotFound("Customer"))?;

        row.try_into()
    }

    async fn delete(&self, id: CustomerId) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_err(e, "Failed to delete customer"))?;

        Ok(result.rows_affected() > 0)
    }
}
