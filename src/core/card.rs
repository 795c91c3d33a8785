//! Card model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A card owned by exactly one customer
///
/// `customer_id` is the back-reference to the owning customer. As with
/// [`Customer`](super::customer::Customer), the default value serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,

    /// Unique card number
    #[serde(rename = "numero", default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,

    #[serde(
        rename = "dataValidade",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_on: Option<NaiveDate>,

    #[serde(rename = "bloqueado", default, skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,

    #[serde(rename = "clienteId", default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i32>,
}

impl Card {
    /// Create an unsaved, unblocked card
    pub fn new(number: impl Into<String>, expires_on: NaiveDate, customer_id: i32) -> Self {
        Self {
            id: None,
            number: Some(number.into()),
            expires_on: Some(expires_on),
            blocked: Some(false),
            customer_id: Some(customer_id),
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.unwrap_or(false)
    }
}
