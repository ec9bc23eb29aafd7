use crate::{
    Error,
    account::{Account, AccountId, NewAccount},
    customer::{Customer, CustomerId, NewCustomer},
    product::{NewProduct, Product, ProductId},
    repositories::{AccountRepository, CustomerRepository, ProductRepository, RepositoryProvider},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Adapter that wraps a RepositoryProvider and implements [`AccountRepository`]
pub struct AccountRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> AccountRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> AccountRepository for AccountRepositoryAdapter<R> {
    async fn create(&self, account: NewAccount) -> Result<Account, Error> {
        self.provider.account().create(account).await
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, Error> {
        self.provider.account().find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, Error> {
        self.provider.account().find_by_email(email).await
    }

    async fn list(&self) -> Result<Vec<Account>, Error> {
        self.provider.account().list().await
    }

    async fn update(&self, account: &Account) -> Result<Account, Error> {
        self.provider.account().update(account).await
    }

    async fn delete(&self, id: AccountId) -> Result<bool, Error> {
        self.provider.account().delete(id).await
    }
}

pub struct CustomerRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> CustomerRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> CustomerRepository for CustomerRepositoryAdapter<R> {
    async fn create(&self, customer: NewCustomer) -> Result<Customer, Error> {
        self.provider.customer().create(customer).await
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, Error> {
        self.provider.customer().find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, Error> {
        self.provider.customer().find_by_email(email).await
    }

    async fn list(&self) -> Result<Vec<Customer>, Error> {
        self.provider.customer().list().await
    }

    async fn update(&self, customer: &Customer) -> Result<Customer, Error> {
        self.provider.customer().update(customer).await
    }

    async fn delete(&self, id: CustomerId) -> Result<bool, Error> {
        self.provider.customer().delete(id).await
    }
}

pub struct ProductRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> ProductRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> ProductRepository for ProductRepositoryAdapter<R> {
    async fn create(&self, product: NewProduct) -> Result<Product, Error> {
        self.provider.product().create(product).await
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, Error> {
        self.provider.product().find_by_id(id).await
    }

    async fn list(&self) -> Result<Vec<Product>, Error> {
        self.provider.product().list().await
    }

    async fn replace(&self, id: ProductId, product: NewProduct) -> Result<Option<Product>, Error> {
        self.provider.product().replace(id, product).await
    }

    async fn delete(&self, id: ProductId) -> Result<bool, Error> {
        self.provider.product().delete(id).await
    }
}
