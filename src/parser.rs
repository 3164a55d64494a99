use serde_json::Value;

use crate::binding;
use crate::error::CardError;
use crate::model::{CARD_TYPE, Card};
use crate::validation;

/// Decodes and validates JSON text into a typed [`Card`].
///
/// A JSON decode failure surfaces as [`CardError::Decode`], distinct from
/// validation failure. A wrong root discriminator is fatal before any
/// validator runs. Validation errors (never warnings) abort the parse with
/// an aggregate [`CardError::Validation`]; callers needing per-field issues
/// should call [`crate::validate`] directly instead.
pub fn parse(input: &str) -> Result<Card, CardError> {
    let value: Value = serde_json::from_str(input)?;
    parse_value(value)
}

/// Same contract as [`parse`] for input that is already decoded.
pub fn parse_value(value: Value) -> Result<Card, CardError> {
    let found = value.get("type").and_then(Value::as_str);
    if found != Some(CARD_TYPE) {
        return Err(CardError::UnexpectedCardType {
            found: found.unwrap_or("<missing>").to_string(),
        });
    }

    let report = validation::validate(&value);
    if !report.errors.is_empty() {
        return Err(CardError::Validation {
            issues: report.errors,
        });
    }

    // Fields absent from the input stay absent on the model; defaults
    // belong to the host configuration, not the card.
    Card::from_value(value)
}

/// Expands template bindings against `data` before parsing, so a templated
/// card is decoded, bound, validated, and typed in one step.
pub fn parse_with_data(input: &str, data: &Value) -> Result<Card, CardError> {
    let mut value: Value = serde_json::from_str(input)?;
    binding::expand_card(&mut value, data)?;
    parse_value(value)
}

/// Canonical compact JSON for a card. `parse(stringify(card))` reproduces a
/// structurally equal card for anything built via the builder or `parse`.
pub fn stringify(card: &Card) -> String {
    card.to_string()
}
