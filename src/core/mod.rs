//! Core domain: models, errors, store traits and services

pub mod card;
pub mod customer;
pub mod error;
pub mod service;
pub mod store;
pub mod validation;

pub use card::Card;
pub use customer::Customer;
pub use error::{ApiError, ApiResult, ConsistencyError, StorageError, StoreResult};
pub use service::{CardService, CustomerService};
pub use store::{CardStore, CustomerStore};
