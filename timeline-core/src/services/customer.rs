use std::sync::Arc;

use crate::{
    Error,
    customer::{Customer, CustomerId, CustomerUpdate, NewCustomer},
    error::{AuthError, StorageError},
    repositories::CustomerRepository,
    services::account::duplicate_email_on_constraint,
    validation::{require_non_empty, validate_email},
};

pub struct CustomerService<C: CustomerRepository> {
    customers: Arc<C>,
}

impl<C: CustomerRepository> CustomerService<C> {
    pub fn new(customers: Arc<C>) -> Self {
        Self { customers }
    }

    pub async fn list(&self) -> Result<Vec<Customer>, Error> {
        self.customers.list().await
    }

    pub async fn get(&self, id: CustomerId) -> Result<Customer, Error> {
        self.customers
            .find_by_id(id)
            .await?
            .ok_or_else(|| StorageError::NotFound("Customer").into())
    }

    pub async fn create(&self, customer: NewCustomer) -> Result<Customer, Error> {
        require_non_empty(&customer.first_name, "First name")?;
        require_non_empty(&customer.last_name, "Last name")?;
        validate_email(&customer.email)?;

        if self.customers.find_by_email(&customer.email).await?.is_some() {
            return Err(AuthError::DuplicateEmail.into());
        }

        let customer = self
            .customers
            .create(customer)
            .await
            .map_err(duplicate_email_on_constraint)?;

        tracing::info!(customer_id = %customer.id, "Customer created");
        Ok(customer)
    }

    pub async fn update(&self, id: CustomerId, update: CustomerUpdate) -> Result<Customer, Error> {
        let mut customer = self.get(id).await?;

        if let Some(email) = update.email.as_deref() {
            if email != customer.email {
                validate_email(email)?;
                if self.customers.find_by_email(email).await?.is_some() {
                    return Err(AuthError::DuplicateEmail.into());
                }
            }
        }

        customer.apply(update);
        self.customers
            .update(&customer)
            .await
            .map_err(duplicate_email_on_constraint)
    }

    pub async fn delete(&self, id: CustomerId) -> Result<(), Error> {
        if !self.customers.delete(id).await? {
            return Err(StorageError::NotFound("Customer").into());
        }
        tracing::info!(customer_id = %id, "Customer deleted");
        Ok(())
    }
}
