//! Account storage
//!
//! Handlers talk to a [`StateStore`]. In production that is the sidecar's
//! named state store; tests and local runs use [`InMemoryStateStore`].

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use tokio::sync::RwLock;
use tracing::debug;

use sidecar::{SidecarClient, SidecarResult};

use crate::models::Account;

/// Default name of the sidecar state store component
pub const DEFAULT_STORE_NAME: &str = "statestore";

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = SidecarResult<T>> + Send + 'a>>;

/// Key-value access to accounts
pub trait StateStore: Send + Sync {
    fn get_account<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<Account>>;

    fn save_account<'a>(&'a self, account: &'a Account) -> StoreFuture<'a, ()>;
}

/// Accounts kept in a sidecar state store
pub struct SidecarStateStore {
    client: SidecarClient,
    store_name: String,
}

impl SidecarStateStore {
    pub fn new(client: SidecarClient, store_name: impl Into<String>) -> Self {
        Self {
            client,
            store_name: store_name.into(),
        }
    }
}

impl StateStore for SidecarStateStore {
    fn get_account<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<Account>> {
        Box::pin(async move { self.client.get_state(&self.store_name, id).await })
    }

    fn save_account<'a>(&'a self, account: &'a Account) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.client
                .save_state(&self.store_name, &account.id, account)
                .await
        })
    }
}

/// Process-local accounts
#[derive(Default)]
pub struct InMemoryStateStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        Self {
            accounts: RwLock::new(
                accounts
                    .into_iter()
                    .map(|account| (account.id.clone(), account))
                    .collect(),
            ),
        }
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

impl StateStore for InMemoryStateStore {
    fn get_account<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<Account>> {
        Box::pin(async move { Ok(self.accounts.read().await.get(id).cloned()) })
    }

    fn save_account<'a>(&'a self, account: &'a Account) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            debug!("Saving account {} with balance {}", account.id, account.balance);
            self.accounts
                .write()
                .await
                .insert(account.id.clone(), account.clone());
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = InMemoryStateStore::new();
        assert!(store.get_account("17").await.unwrap().is_none());

        let mut account = Account::open("17");
        account.balance = Decimal::new(42, 0);
        store.save_account(&account).await.unwrap();

        assert_eq!(store.get_account("17").await.unwrap(), Some(account));
        assert_eq!(store.len().await, 1);
    }
}
