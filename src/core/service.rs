//! Services for customer and card operations
//!
//! Services sit between handlers and stores. They validate input, turn store
//! absence into [`ConsistencyError::NotFound`](crate::core::error::ConsistencyError)
//! and enforce the uniqueness rules (CPF per customer, number per card).

use crate::core::card::Card;
use crate::core::customer::Customer;
use crate::core::error::{ApiError, ApiResult, StorageError};
use crate::core::store::{CARD_NUMBER_KEY, CUSTOMER_CPF_KEY, CardStore, CustomerStore};
use crate::core::validation::FieldRules;
use crate::core::validation::validators::{digits, positive, required, state_code, string_length};
use std::sync::Arc;

const CUSTOMER: &str = "customer";
const CARD: &str = "card";

fn customer_rules() -> FieldRules {
    FieldRules::new()
        .rule("nome", required())
        .rule("nome", string_length(2, 100))
        .rule("cpf", required())
        .rule("cpf", digits(11, 11))
        .rule("uf", state_code())
}

fn card_rules() -> FieldRules {
    FieldRules::new()
        .rule("numero", required())
        .rule("numero", digits(13, 19))
        .rule("dataValidade", required())
        .rule("clienteId", required())
        .rule("clienteId", positive())
}

fn ensure_positive_id(entity: &'static str, id: i32) -> ApiResult<()> {
    if id <= 0 {
        return Err(ApiError::invalid(format!(
            "Invalid {} id: {} (must be a positive integer)",
            entity, id
        )));
    }
    Ok(())
}

/// Map a failed write to the business rule it broke
///
/// The uniqueness pre-checks and the write are separate store calls, so a
/// concurrent save can still trip the store's constraint. That is the same
/// consistency failure as one caught by the pre-check.
fn write_error(err: StorageError) -> ApiError {
    match err {
        StorageError::Constraint { constraint, .. } => {
            let message = match constraint.as_str() {
                CUSTOMER_CPF_KEY => "CPF is already registered to another customer".to_string(),
                CARD_NUMBER_KEY => "Card number is already registered".to_string(),
                other => format!("Constraint '{}' violated", other),
            };
            ApiError::invalid(message)
        }
        other => other.into(),
    }
}

/// A persisted row always carries its id
fn ensure_assigned_id(entity: &'static str, id: Option<i32>) -> ApiResult<()> {
    match id {
        Some(_) => Ok(()),
        None => Err(ApiError::Internal(format!(
            "{} store returned a row without an id",
            entity
        ))),
    }
}

/// Customer lookups and upsert
#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn CustomerStore>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        Self { store }
    }

    /// Get a customer by id
    pub async fn find_by_id(&self, id: i32) -> ApiResult<Customer> {
        ensure_positive_id(CUSTOMER, id)?;
        tracing::debug!(id, "Service: looking up customer by id");

        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(CUSTOMER, "id", id))
    }

    /// Get a customer by CPF
    pub async fn find_by_cpf(&self, cpf: &str) -> ApiResult<Customer> {
        tracing::debug!(cpf, "Service: looking up customer by CPF");

        self.store
            .find_by_cpf(cpf)
            .await?
            .ok_or_else(|| ApiError::not_found(CUSTOMER, "cpf", cpf))
    }

    /// Validate and persist a customer
    ///
    /// A present `id` must reference an existing customer, and the CPF must
    /// not belong to a different one.
    pub async fn save(&self, customer: Customer) -> ApiResult<Customer> {
        customer_rules().validate_entity(&customer)?;

        if let Some(id) = customer.id {
            self.find_by_id(id).await?;
        }

        if let Some(cpf) = customer.cpf.as_deref() {
            if let Some(owner) = self.store.find_by_cpf(cpf).await? {
                if owner.id != customer.id {
                    return Err(ApiError::invalid(format!(
                        "CPF {} is already registered to another customer",
                        cpf
                    )));
                }
            }
        }

        tracing::debug!(id = ?customer.id, "Service: saving customer");
        let saved = self.store.save(customer).await.map_err(write_error)?;
        ensure_assigned_id(CUSTOMER, saved.id)?;
        Ok(saved)
    }
}

/// Card lookups and upsert
#[derive(Clone)]
pub struct CardService {
    store: Arc<dyn CardStore>,
    customers: Arc<dyn CustomerStore>,
}

impl CardService {
    pub fn new(store: Arc<dyn CardStore>, customers: Arc<dyn CustomerStore>) -> Self {
        Self { store, customers }
    }

    /// All cards of a customer; empty when it has none
    pub async fn find_by_customer_id(&self, customer_id: i32) -> ApiResult<Vec<Card>> {
        ensure_positive_id(CUSTOMER, customer_id)?;
        tracing::debug!(customer_id, "Service: listing cards of customer");

        Ok(self.store.find_by_customer_id(customer_id).await?)
    }

    /// Get a card by its number
    pub async fn find_by_number(&self, number: &str) -> ApiResult<Card> {
        tracing::debug!(number, "Service: looking up card by number");

        self.store
            .find_by_number(number)
            .await?
            .ok_or_else(|| ApiError::not_found(CARD, "numero", number))
    }

    /// Validate and persist a card
    ///
    /// The owning customer must exist, a present `id` must reference an
    /// existing card, and the number must not belong to a different card.
    pub async fn save(&self, mut card: Card) -> ApiResult<Card> {
        card_rules().validate_entity(&card)?;

        if let Some(customer_id) = card.customer_id {
            self.customers
                .find_by_id(customer_id)
                .await?
                .ok_or_else(|| ApiError::not_found(CUSTOMER, "id", customer_id))?;
        }

        if let Some(id) = card.id {
            ensure_positive_id(CARD, id)?;
            self.store
                .find_by_id(id)
                .await?
                .ok_or_else(|| ApiError::not_found(CARD, "id", id))?;
        }

        if let Some(number) = card.number.as_deref() {
            if let Some(owner) = self.store.find_by_number(number).await? {
                if owner.id != card.id {
                    return Err(ApiError::invalid(format!(
                        "Card number {} is already registered",
                        number
                    )));
                }
            }
        }

        card.blocked.get_or_insert(false);

        tracing::debug!(id = ?card.id, "Service: saving card");
        let saved = self.store.save(card).await.map_err(write_error)?;
        ensure_assigned_id(CARD, saved.id)?;
        Ok(saved)
    }
}
