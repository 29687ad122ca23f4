use chrono::NaiveDate;
use rust_decimal::Decimal;
use validator::{Validate, ValidationError};

use crate::entities::purchase_order::{Currency, OrderStatus};

/// Largest amount a `decimal(10, 2)` column holds: 9_999_999_999 hundredths,
/// which spills into the `mid` word.
pub const MAX_TOTAL_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Every client-writable field of a purchase order, already typed.
///
/// Used for both creation and full replacement; the identifier and the
/// creation timestamp are never taken from callers.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewPurchaseOrder {
    #[validate(
        length(min = 1, max = 50, message = "orderNumber must be between 1 and 50 characters"),
        custom = "not_blank"
    )]
    pub order_number: String,
    #[validate(
        length(min = 1, max = 100, message = "supplierName must be between 1 and 100 characters"),
        custom = "not_blank"
    )]
    pub supplier_name: String,
    pub status: OrderStatus,
    #[validate(custom = "valid_total_amount")]
    pub total_amount: Decimal,
    pub currency: Currency,
    pub expected_delivery_date: NaiveDate,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

fn valid_total_amount(amount: &Decimal) -> Result<(), ValidationError> {
    let message = if amount <= &Decimal::ZERO {
        "totalAmount must be greater than 0"
    } else if amount.normalize().scale() > 2 {
        "totalAmount must have at most 2 decimal places"
    } else if amount > &MAX_TOTAL_AMOUNT {
        "totalAmount must not exceed 99999999.99"
    } else {
        return Ok(());
    };

    let mut err = ValidationError::new("total_amount");
    err.message = Some(message.into());
    Err(err)
}
