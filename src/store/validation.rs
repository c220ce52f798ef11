//! Local checks on add-product input. Nothing here touches the network.

use alloy::primitives::U256;
use thiserror::Error;

use crate::blockchain::units::Amount;
use crate::store::types::{NewProduct, ProductForm};

/// Why a product form was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    MissingField(&'static str),

    #[error("price must be a positive ether amount: {0}")]
    InvalidPrice(String),

    #[error("quantity must be a positive whole number, got '{0}'")]
    InvalidQuantity(String),
}

/// Positive decimal ether amount with at most 18 fractional digits.
pub fn parse_price(input: &str) -> Result<Amount, ValidationError> {
    let amount =
        Amount::from_decimal(input).map_err(|e| ValidationError::InvalidPrice(e.to_string()))?;
    if amount.is_zero() {
        return Err(ValidationError::InvalidPrice(format!("'{}' is not above zero", input.trim())));
    }
    Ok(amount)
}

/// Positive base-10 integer; signs, decimals and exponents are refused.
pub fn parse_quantity(input: &str) -> Result<U256, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidQuantity(input.to_string()));
    }
    match U256::from_str_radix(trimmed, 10) {
        Ok(quantity) if !quantity.is_zero() => Ok(quantity),
        _ => Err(ValidationError::InvalidQuantity(input.to_string())),
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Validate a form and convert it to the on-chain representation.
pub fn validate_product(form: &ProductForm) -> Result<NewProduct, ValidationError> {
    Ok(NewProduct {
        name: required(&form.name, "name")?,
        description: required(&form.description, "description")?,
        price: parse_price(&form.price)?,
        quantity: parse_quantity(&form.quantity)?,
        category: required(&form.category, "category")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bread() -> ProductForm {
        ProductForm::new("Bread", "Fresh loaf", "0.01", "10", "Food")
    }

    #[test]
    fn test_valid_form() {
        let product = validate_product(&bread()).unwrap();
        assert_eq!(product.name, "Bread");
        assert_eq!(product.price.wei(), U256::from(10_000_000_000_000_000u64));
        assert_eq!(product.quantity, U256::from(10u8));
    }

    #[test]
    fn test_rejects_non_positive_or_non_numeric_price() {
        for price in ["0", "0.0", "-1", "abc", "", "1e-2"] {
            let form = ProductForm {
                price: price.to_string(),
                ..bread()
            };
            assert!(
                matches!(validate_product(&form), Err(ValidationError::InvalidPrice(_))),
                "price {price:?} should be refused"
            );
        }
    }

    #[test]
    fn test_rejects_bad_quantity() {
        for quantity in ["0", "-3", "1.5", "ten", "", "+4"] {
            let form = ProductForm {
                quantity: quantity.to_string(),
                ..bread()
            };
            assert!(
                matches!(validate_product(&form), Err(ValidationError::InvalidQuantity(_))),
                "quantity {quantity:?} should be refused"
            );
        }
    }

    #[test]
    fn test_requires_text_fields() {
        let form = ProductForm {
            category: "   ".to_string(),
            ..bread()
        };
        assert_eq!(
            validate_product(&form),
            Err(ValidationError::MissingField("category"))
        );
    }

    #[test]
    fn test_trims_whitespace() {
        let form = ProductForm::new(" Bread ", "Fresh loaf", " 0.5 ", " 3 ", "Food");
        let product = validate_product(&form).unwrap();
        assert_eq!(product.name, "Bread");
        assert_eq!(product.quantity, U256::from(3u8));
    }
}
