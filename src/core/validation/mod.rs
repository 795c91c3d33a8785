//! Declarative payload validation
//!
//! A [`FieldRules`] set lists, per wire field name, the validators a payload
//! must pass. Services run it before touching the store; all failures are
//! collected into a single [`ConsistencyError::Fields`].

pub mod validators;

use crate::core::error::{ConsistencyError, FieldValidationError};
use serde::Serialize;
use serde_json::Value;

type Validator = Box<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;

/// Validators grouped by field
#[derive(Default)]
pub struct FieldRules {
    fields: Vec<(&'static str, Vec<Validator>)>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validator for `field`
    pub fn rule<V>(mut self, field: &'static str, validator: V) -> Self
    where
        V: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, validators)) => validators.push(Box::new(validator)),
            None => self.fields.push((field, vec![Box::new(validator)])),
        }
        self
    }

    /// Validate a JSON payload
    ///
    /// Stops at the first failing validator of each field.
    pub fn validate(&self, payload: &Value) -> Result<(), ConsistencyError> {
        let errors: Vec<FieldValidationError> = self
            .fields
            .iter()
            .filter_map(|(field, validators)| {
                let value = payload.get(*field).unwrap_or(&Value::Null);
                validators
                    .iter()
                    .find_map(|v| v(field, value).err())
                    .map(|message| FieldValidationError {
                        field: field.to_string(),
                        message,
                    })
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConsistencyError::Fields(errors))
        }
    }

    /// Serialize `entity` and validate the result
    pub fn validate_entity<T: Serialize>(&self, entity: &T) -> Result<(), ConsistencyError> {
        let payload = serde_json::to_value(entity).map_err(|e| ConsistencyError::Invalid {
            message: format!("Payload could not be read: {}", e),
        })?;
        self.validate(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::validators::{digits, required, string_length};
    use super::*;
    use serde_json::json;

    fn rules() -> FieldRules {
        FieldRules::new()
            .rule("nome", required())
            .rule("nome", string_length(2, 100))
            .rule("cpf", required())
            .rule("cpf", digits(11, 11))
    }

    #[test]
    fn test_valid_payload() {
        assert!(rules()
            .validate(&json!({"nome": "Ana", "cpf": "12345678900"}))
            .is_ok());
    }

    #[test]
    fn test_collects_one_error_per_field() {
        let err = rules().validate(&json!({"cpf": "12"})).unwrap_err();
        let ConsistencyError::Fields(errors) = err else {
            panic!("expected field errors");
        };
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "nome");
        assert!(errors[0].message.contains("required"));
        assert_eq!(errors[1].field, "cpf");
        assert!(errors[1].message.contains("11 digits"));
    }
}
