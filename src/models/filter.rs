use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::entities::purchase_order::{search_key, Currency, Model, OrderStatus};
use crate::errors::ServiceError;

/// Optional criteria narrowing a purchase order listing.
///
/// Every field is independent; an absent field places no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchaseOrderFilter {
    /// Case-insensitive substring of the order number or the supplier name.
    pub q: Option<String>,
    pub status: Option<OrderStatus>,
    pub currency: Option<Currency>,
    /// Inclusive lower bound on the total amount.
    pub min_total: Option<Decimal>,
    /// Inclusive upper bound on the total amount.
    pub max_total: Option<Decimal>,
    /// Inclusive lower bound on the creation timestamp.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the creation timestamp.
    pub to: Option<DateTime<Utc>>,
}

impl PurchaseOrderFilter {
    /// Trimmed, case-folded text query, if it has any content.
    pub fn search_term(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(search_key)
    }

    /// True when no criterion would restrict the result.
    pub fn is_empty(&self) -> bool {
        self.search_term().is_none()
            && self.status.is_none()
            && self.currency.is_none()
            && self.min_total.is_none()
            && self.max_total.is_none()
            && self.from.is_none()
            && self.to.is_none()
    }

    /// Cross-field consistency checks, run before any query is issued.
    pub fn validate_ranges(&self) -> Result<(), ServiceError> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(ServiceError::InvalidFilter(
                    "'from' date must not be after 'to' date".to_string(),
                ));
            }
        }

        if let (Some(min), Some(max)) = (self.min_total, self.max_total) {
            if min > max {
                return Err(ServiceError::InvalidFilter(
                    "minimum total must not exceed maximum total".to_string(),
                ));
            }
        }

        for (name, bound) in [("minTotal", self.min_total), ("maxTotal", self.max_total)] {
            if bound.is_some_and(|value| value.is_sign_negative() && !value.is_zero()) {
                return Err(ServiceError::InvalidFilter(format!(
                    "{} must not be negative",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Evaluates the criteria against a loaded record.
    pub fn matches(&self, order: &Model) -> bool {
        if let Some(term) = self.search_term() {
            let hit = search_key(&order.order_number).contains(&term)
                || search_key(&order.supplier_name).contains(&term);
            if !hit {
                return false;
            }
        }

        self.status.map_or(true, |status| order.status == status)
            && self.currency.map_or(true, |currency| order.currency == currency)
            && self.min_total.map_or(true, |min| order.total_amount >= min)
            && self.max_total.map_or(true, |max| order.total_amount <= max)
            && self.from.map_or(true, |from| order.created_at >= from)
            && self.to.map_or(true, |to| order.created_at <= to)
    }
}
