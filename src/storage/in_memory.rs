//! In-memory implementations of the store traits for testing and development

use crate::core::error::{StorageError, StoreResult};
use crate::core::store::{CARD_NUMBER_KEY, CUSTOMER_CPF_KEY, CardStore, CustomerStore};
use crate::core::{Card, Customer};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

const BACKEND: &str = "in-memory";

/// Rows of one table plus its id sequence
struct Table<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    /// Use `id` if given, otherwise draw the next value of the sequence
    fn assign_id(&mut self, id: Option<i32>) -> i32 {
        let id = id.unwrap_or(self.next_id);
        self.next_id = self.next_id.max(id + 1);
        id
    }
}

fn read<T>(lock: &RwLock<Table<T>>) -> StoreResult<RwLockReadGuard<'_, Table<T>>> {
    lock.read()
        .map_err(|_| StorageError::Poisoned { backend: BACKEND })
}

fn write<T>(lock: &RwLock<Table<T>>) -> StoreResult<RwLockWriteGuard<'_, Table<T>>> {
    lock.write()
        .map_err(|_| StorageError::Poisoned { backend: BACKEND })
}

/// In-memory customer store
///
/// Uses RwLock for thread-safe access. Clones share the same rows.
#[derive(Clone, Default)]
pub struct InMemoryCustomerStore {
    table: Arc<RwLock<Table<Customer>>>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Customer>> {
        Ok(read(&self.table)?.rows.get(&id).cloned())
    }

    async fn find_by_cpf(&self, cpf: &str) -> StoreResult<Option<Customer>> {
        Ok(read(&self.table)?
            .rows
            .values()
            .find(|c| c.cpf.as_deref() == Some(cpf))
            .cloned())
    }

    async fn save(&self, mut customer: Customer) -> StoreResult<Customer> {
        let mut table = write(&self.table)?;

        let duplicate = table
            .rows
            .values()
            .any(|c| c.cpf.is_some() && c.cpf == customer.cpf && c.id != customer.id);
        if duplicate {
            return Err(StorageError::Constraint {
                backend: BACKEND,
                constraint: CUSTOMER_CPF_KEY.to_string(),
            });
        }

        let id = table.assign_id(customer.id);
        customer.id = Some(id);
        table.rows.insert(id, customer.clone());

        Ok(customer)
    }
}

/// In-memory card store
///
/// The owning-customer reference is not checked here; the card service
/// verifies it before saving.
#[derive(Clone, Default)]
pub struct InMemoryCardStore {
    table: Arc<RwLock<Table<Card>>>,
}

impl InMemoryCardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CardStore for InMemoryCardStore {
    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Card>> {
        Ok(read(&self.table)?.rows.get(&id).cloned())
    }

    async fn find_by_customer_id(&self, customer_id: i32) -> StoreResult<Vec<Card>> {
        // BTreeMap iteration is already ordered by id
        Ok(read(&self.table)?
            .rows
            .values()
            .filter(|c| c.customer_id == Some(customer_id))
            .cloned()
            .collect())
    }

    async fn find_by_number(&self, number: &str) -> StoreResult<Option<Card>> {
        Ok(read(&self.table)?
            .rows
            .values()
            .find(|c| c.number.as_deref() == Some(number))
            .cloned())
    }

    async fn save(&self, mut card: Card) -> StoreResult<Card> {
        let mut table = write(&self.table)?;

        let duplicate = table
            .rows
            .values()
            .any(|c| c.number.is_some() && c.number == card.number && c.id != card.id);
        if duplicate {
            return Err(StorageError::Constraint {
                backend: BACKEND,
                constraint: CARD_NUMBER_KEY.to_string(),
            });
        }

        let id = table.assign_id(card.id);
        card.id = Some(id);
        table.rows.insert(id, card.clone());

        Ok(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 12, 31).unwrap()
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let store = InMemoryCustomerStore::new();

        let ana = store.save(Customer::new("12345678900", "Ana")).await.unwrap();
        let bia = store.save(Customer::new("98765432100", "Bia")).await.unwrap();

        assert_eq!(ana.id, Some(1));
        assert_eq!(bia.id, Some(2));
    }

    #[tokio::test]
    async fn test_save_with_id_updates_in_place() {
        let store = InMemoryCustomerStore::new();
        let saved = store.save(Customer::new("12345678900", "Ana")).await.unwrap();

        let mut updated = saved.clone();
        updated.name = Some("Ana Maria".to_string());
        store.save(updated).await.unwrap();

        let found = store.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(found.name.as_deref(), Some("Ana Maria"));
        assert!(store.find_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_cpf() {
        let store = InMemoryCustomerStore::new();
        store.save(Customer::new("12345678900", "Ana")).await.unwrap();

        let found = store.find_by_cpf("12345678900").await.unwrap().unwrap();
        assert_eq!(found.id, Some(1));
        assert!(store.find_by_cpf("00000000000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_cpf_is_a_constraint_violation() {
        let store = InMemoryCustomerStore::new();
        store.save(Customer::new("12345678900", "Ana")).await.unwrap();

        let err = store
            .save(Customer::new("12345678900", "Bia"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Constraint { .. }));
    }

    #[tokio::test]
    async fn test_clones_share_rows() {
        let store = InMemoryCustomerStore::new();
        let clone = store.clone();
        store.save(Customer::new("12345678900", "Ana")).await.unwrap();

        assert!(clone.find_by_id(1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_cards_by_customer_are_ordered_and_filtered() {
        let store = InMemoryCardStore::new();
        store.save(Card::new("4111111111111111", expiry(), 1)).await.unwrap();
        store.save(Card::new("5500000000000004", expiry(), 2)).await.unwrap();
        store.save(Card::new("340000000000009", expiry(), 1)).await.unwrap();

        let cards = store.find_by_customer_id(1).await.unwrap();
        let ids: Vec<_> = cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![Some(1), Some(3)]);
    }

    #[tokio::test]
    async fn test_cards_for_customer_without_cards_is_empty() {
        let store = InMemoryCardStore::new();
        assert!(store.find_by_customer_id(42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_card_by_number() {
        let store = InMemoryCardStore::new();
        store.save(Card::new("4111111111111111", expiry(), 1)).await.unwrap();

        let card = store.find_by_number("4111111111111111").await.unwrap();
        assert_eq!(card.and_then(|c| c.customer_id), Some(1));
        assert!(store.find_by_number("0000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_explicit_id_advances_sequence() {
        let store = InMemoryCardStore::new();
        store
            .save(Card::new("4111111111111111", expiry(), 1).with_id(10))
            .await
            .unwrap();
        let next = store.save(Card::new("5500000000000004", expiry(), 1)).await.unwrap();
        assert_eq!(next.id, Some(11));
    }
}
