//! Store traits for customer and card rows
//!
//! Stores are the sole authority for their rows. They report absence as
//! `None` and leave it to the service layer to decide whether absence is an
//! error. Backends live in [`crate::storage`].

use crate::core::card::Card;
use crate::core::customer::Customer;
use crate::core::error::StoreResult;
use async_trait::async_trait;

/// Unique constraint on `cliente.cpf`
pub const CUSTOMER_CPF_KEY: &str = "cliente_cpf_key";

/// Unique constraint on `cartao.numero`
pub const CARD_NUMBER_KEY: &str = "cartao_numero_key";

/// Customer rows, keyed by id and by unique CPF
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Get a customer by id
    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Customer>>;

    /// Get a customer by CPF
    async fn find_by_cpf(&self, cpf: &str) -> StoreResult<Option<Customer>>;

    /// Insert when `customer.id` is `None`, otherwise update in place
    ///
    /// Returns the persisted row, including the assigned id.
    async fn save(&self, customer: Customer) -> StoreResult<Customer>;
}

/// Card rows, each referencing its owning customer
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Get a card by id
    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Card>>;

    /// All cards whose owner is `customer_id`, ordered by card id
    ///
    /// Returns an empty list when the customer has no cards or does not exist.
    async fn find_by_customer_id(&self, customer_id: i32) -> StoreResult<Vec<Card>>;

    /// The card with this number, if any
    async fn find_by_number(&self, number: &str) -> StoreResult<Option<Card>>;

    /// Insert when `card.id` is `None`, otherwise update in place
    async fn save(&self, card: Card) -> StoreResult<Card>;
}
