//! Internal helpers for input validation.
//!
//! These utilities are **not** part of the public API. They centralize the few
//! checks the engine performs so every entry point rejects the same inputs.

use crate::{EngineError, RESERVED_TAB_NAMES, ResultEngine};

/// Trim a required name and reject it when empty.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Normalize a list name: non-empty and not one of the reserved tab names.
pub(crate) fn normalize_list_name(value: &str) -> ResultEngine<String> {
    let name = normalize_required_name(value, "list")?;
    if is_reserved_tab(&name) {
        return Err(EngineError::InvalidName(format!(
            "\"{name}\" is reserved by the spreadsheet"
        )));
    }
    Ok(name)
}

/// Default tabs every new spreadsheet ships with; never shown as lists.
pub(crate) fn is_reserved_tab(title: &str) -> bool {
    let lowered = title.trim().to_lowercase();
    RESERVED_TAB_NAMES.iter().any(|reserved| *reserved == lowered)
}

/// Reject negative or non-finite user-entered numbers.
pub(crate) fn checked_non_negative(value: f64, label: &str) -> ResultEngine<f64> {
    if !value.is_finite() {
        return Err(EngineError::InvalidAmount(format!("{label} must be a number")));
    }
    if value < 0.0 {
        return Err(EngineError::InvalidAmount(format!("{label} must be >= 0")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_names_are_case_insensitive() {
        assert!(is_reserved_tab("Hoja1"));
        assert!(is_reserved_tab("SHEET1"));
        assert!(!is_reserved_tab("Lista 2024-06-01"));
        assert!(normalize_list_name(" sheet1 ").is_err());
    }

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(checked_non_negative(-0.5, "price").is_err());
        assert!(checked_non_negative(f64::NAN, "price").is_err());
        assert_eq!(checked_non_negative(2.5, "price").unwrap(), 2.5);
    }
}
