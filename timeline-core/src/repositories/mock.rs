//! In-memory repositories for service tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    Error,
    account::{Account, AccountId, NewAccount},
    customer::{Customer, CustomerId, NewCustomer},
    error::StorageError,
    product::{NewProduct, Product, ProductId},
    repositories::{
        AccountRepository, AccountRepositoryProvider, CustomerRepository,
        CustomerRepositoryProvider, ProductRepository, ProductRepositoryProvider,
        RepositoryProvider,
    },
};

#[derive(Default)]
pub struct MockAccountRepository {
    accounts: Arc<Mutex<HashMap<AccountId, Account>>>,
    next_id: Arc<Mutex<i64>>,
    /// Counts `update` calls so tests can assert on write counts
    pub updates: Arc<Mutex<usize>>,
}

impl MockAccountRepository {
    /// Overwrite a stored record directly, bypassing the service layer
    pub async fn put(&self, account: Account) {
        self.accounts.lock().await.insert(account.id, account);
    }

    pub async fn update_count(&self) -> usize {
        *self.updates.lock().await
    }

    pub async fn len(&self) -> usize {
        self.accounts.lock().await.len()
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, Error> {
        let mut accounts = self.accounts.lock().await;
        if accounts.values().any(|a| a.email == account.email) {
            return Err(StorageError::Constraint("UNIQUE constraint failed: users.email".to_string()).into());
        }

        let mut next_id = self.next_id.lock().await;
        *next_id += 1;
        let now = Utc::now();
        let account = Account {
            id: AccountId::new(*next_id),
            full_name: account.full_name,
            email: account.email,
            password_hash: account.password_hash,
            role: account.role,
            email_confirmed: account.email_confirmed,
            failed_login_attempts: 0,
            lock_until: None,
            last_login: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        };
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, Error> {
        Ok(self.accounts.lock().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, Error> {
        Ok(self
            .accounts
            .lock()
            .await
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Account>, Error> {
        let mut accounts: Vec<_> = self.accounts.lock().await.values().cloned().collect();
        accounts.sort_by_key(|a| a.id);
        Ok(accounts)
    }

    async fn update(&self, account: &Account) -> Result<Account, Error> {
        *self.updates.lock().await += 1;
        let mut accounts = self.accounts.lock().await;
        if !accounts.contains_key(&account.id) {
            return Err(StorageError::NotFound("User").into());
        }
        if accounts
            .values()
            .any(|a| a.id != account.id && a.email == account.email)
        {
            return Err(StorageError::Constraint("UNIQUE constraint failed: users.email".to_string()).into());
        }
        let mut updated = account.clone();
        updated.updated_at = Utc::now();
        accounts.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: AccountId) -> Result<bool, Error> {
        Ok(self.accounts.lock().await.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct MockCustomerRepository {
    customers: Arc<Mutex<HashMap<CustomerId, Customer>>>,
    next_id: Arc<Mutex<i64>>,
}

#[async_trait]
impl CustomerRepository for MockCustomerRepository {
    async fn create(&self, customer: NewCustomer) -> Result<Customer, Error> {
        let mut customers = self.customers.lock().await;
        if customers.values().any(|c| c.email == customer.email) {
            return Err(StorageError::Constraint("UNIQUE constraint failed: customers.email".to_string()).into());
        }

        let mut next_id = self.next_id.lock().await;
        *next_id += 1;
        let now = Utc::now();
        let customer = Customer {
            id: CustomerId::new(*next_id),
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email,
            phone: customer.phone,
            address: customer.address,
            city: customer.city,
            state: customer.state,
            postal_code: customer.postal_code,
            created_at: now,
            updated_at: now,
        };
        customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, Error> {
        Ok(self.customers.lock().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, Error> {
        Ok(self
            .customers
            .lock()
            .await
            .values()
            .find(|c| c.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Customer>, Error> {
        let mut customers: Vec<_> = self.customers.lock().await.values().cloned().collect();
        customers.sort_by_key(|c| c.id);
        Ok(customers)
    }

    async fn update(&self, customer: &Customer) -> Result<Customer, Error> {
        let mut customers = self.customers.lock().await;
        if !customers.contains_key(&customer.id) {
            return Err(StorageError::NotFound("Customer").into());
        }
        let mut updated = customer.clone();
        updated.updated_at = Utc::now();
        customers.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: CustomerId) -> Result<bool, Error> {
        Ok(self.customers.lock().await.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct MockProductRepository {
    products: Arc<Mutex<HashMap<ProductId, Product>>>,
    next_id: Arc<Mutex<i64>>,
}

#[async_trait]
impl ProductRepository for MockProductRepository {
    async fn create(&self, product: NewProduct) -> Result<Product, Error> {
        let mut next_id = self.next_id.lock().await;
        *next_id += 1;
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(*next_id),
            name: product.name,
            description: product.description,
            price: product.price,
            created_at: now,
            updated_at: now,
        };
        self.products
            .lock()
            .await
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, Error> {
        Ok(self.products.lock().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Product>, Error> {
        let mut products: Vec<_> = self.products.lock().await.values().cloned().collect();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    async fn replace(&self, id: ProductId, product: NewProduct) -> Result<Option<Product>, Error> {
        let mut products = self.products.lock().await;
        Ok(products.get_mut(&id).map(|stored| {
            stored.name = product.name;
            stored.description = product.description;
            stored.price = product.price;
            stored.updated_at = Utc::now();
            stored.clone()
        }))
    }

    async fn delete(&self, id: ProductId) -> Result<bool, Error> {
        Ok(self.products.lock().await.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct MockRepositoryProvider {
    pub accounts: MockAccountRepository,
    pub customers: MockCustomerRepository,
    pub products: MockProductRepository,
}

impl AccountRepositoryProvider for MockRepositoryProvider {
    type AccountRepo = MockAccountRepository;

    fn account(&self) -> &Self::AccountRepo {
        &self.accounts
    }
}

impl CustomerRepositoryProvider for MockRepositoryProvider {
    type CustomerRepo = MockCustomerRepository;

    fn customer(&self) -> &Self::CustomerRepo {
        &self.customers
    }
}

impl ProductRepositoryProvider for MockRepositoryProvider {
    type ProductRepo = MockProductRepository;

    fn product(&self) -> &Self::ProductRepo {
        &self.products
    }
}

#[async_trait]
impl RepositoryProvider for MockRepositoryProvider {
    async fn migrate(&self) -> Result<(), Error> {
        Ok(())
    }

    async fn health_check(&self) -> Result<(), Error> {
        Ok(())
    }
}
