use crate::{
    Error,
    customer::{Customer, CustomerId, NewCustomer},
};
use async_trait::async_trait;

/// Repository for customer data access. `email` is unique.
#[async_trait]
pub trait CustomerRepository: Send + Sync + 'static {
    async fn create(&self, customer: NewCustomer) -> Result<Customer, Error>;

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, Error>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, Error>;

    async fn list(&self) -> Result<Vec<Customer>, Error>;

    async fn update(&self, customer: &Customer) -> Result<Customer, Error>;

    async fn delete(&self, id: CustomerId) -> Result<bool, Error>;
}
