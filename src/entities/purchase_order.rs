use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Enumerations whose wire names are matched case-insensitively against a fixed whitelist.
pub trait LiteralEnum: Sized + Copy + 'static {
    /// Name of the field the literal belongs to, used in error messages.
    const FIELD: &'static str;
    /// Canonical names, in declaration order.
    const NAMES: &'static [&'static str];

    fn variants() -> &'static [Self];

    fn literal(&self) -> &'static str;

    fn parse_literal(raw: &str) -> Result<Self, UnknownVariant> {
        let wanted = raw.trim();
        Self::variants()
            .iter()
            .copied()
            .find(|variant| variant.literal().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant {
                field: Self::FIELD,
                value: raw.to_string(),
                allowed: Self::NAMES,
            })
    }
}

/// A literal that is not part of an enum's whitelist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
    pub allowed: &'static [&'static str],
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {} value: {}. Allowed values: {}",
            self.field,
            self.value,
            self.allowed.join(", ")
        )
    }
}

impl std::error::Error for UnknownVariant {}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "SUBMITTED")]
    Submitted,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

impl LiteralEnum for OrderStatus {
    const FIELD: &'static str = "status";
    const NAMES: &'static [&'static str] =
        &["DRAFT", "SUBMITTED", "APPROVED", "REJECTED", "CANCELLED"];

    fn variants() -> &'static [Self] {
        &[
            Self::Draft,
            Self::Submitted,
            Self::Approved,
            Self::Rejected,
            Self::Cancelled,
        ]
    }

    fn literal(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(3))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Currency {
    #[sea_orm(string_value = "USD")]
    Usd,
    #[sea_orm(string_value = "EUR")]
    Eur,
}

impl LiteralEnum for Currency {
    const FIELD: &'static str = "currency";
    const NAMES: &'static [&'static str] = &["USD", "EUR"];

    fn variants() -> &'static [Self] {
        &[Self::Usd, Self::Eur]
    }

    fn literal(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub order_number: String,
    pub supplier_name: String,
    pub status: OrderStatus,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total_amount: Decimal,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
    pub expected_delivery_date: NaiveDate,
    /// `order_number` passed through [`search_key`]; what the text filter matches.
    #[serde(skip)]
    pub order_number_folded: String,
    /// `supplier_name` passed through [`search_key`].
    #[serde(skip)]
    pub supplier_name_folded: String,
}

/// Case-folds text for the `q` filter.
///
/// Folding happens here rather than in SQL: SQLite's `LOWER()` only knows ASCII.
pub fn search_key(text: &str) -> String {
    text.to_lowercase()
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
