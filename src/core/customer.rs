//! Customer model

use serde::{Deserialize, Serialize};

/// A customer, keyed by a store-assigned id and by a unique CPF
///
/// Every field is optional so that the default value serializes as `{}`,
/// which is the body returned when a request fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Assigned by the store on first save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,

    /// Brazilian taxpayer id, 11 digits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,

    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Two-letter state code
    #[serde(rename = "uf", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Customer {
    /// Create an unsaved customer
    pub fn new(cpf: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            cpf: Some(cpf.into()),
            name: Some(name.into()),
            state: None,
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }
}
