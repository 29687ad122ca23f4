use async_trait::async_trait;
use sea_orm::{
    sea_query::{Condition, Expr, LikeExpr, SimpleExpr},
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
};

use super::Query;
use crate::{
    entities::purchase_order::{Column, Entity as PurchaseOrderEntity, Model as PurchaseOrderModel},
    errors::ServiceError,
    models::filter::PurchaseOrderFilter,
};

/// Escape character used in LIKE patterns built from user text.
pub const LIKE_ESCAPE: char = '!';

/// Wraps `term` in `%` after escaping the LIKE wildcards it contains.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_') || ch == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// `column` must hold text already passed through `search_key`.
fn folded_like(column: Column, pattern: &str) -> SimpleExpr {
    Expr::col(column).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

/// Translates a filter into a conjunction of column predicates.
///
/// Absent criteria contribute nothing, so an empty filter yields an empty
/// `Condition::all()` that matches every row.
pub fn build_condition(filter: &PurchaseOrderFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(term) = filter.search_term() {
        let pattern = contains_pattern(&term);
        condition = condition.add(
            Condition::any()
                .add(folded_like(Column::OrderNumberFolded, &pattern))
                .add(folded_like(Column::SupplierNameFolded, &pattern)),
        );
    }
    if let Some(status) = filter.status {
        condition = condition.add(Column::Status.eq(status));
    }
    if let Some(currency) = filter.currency {
        condition = condition.add(Column::Currency.eq(currency));
    }
    if let Some(min) = filter.min_total {
        condition = condition.add(Column::TotalAmount.gte(min));
    }
    if let Some(max) = filter.max_total {
        condition = condition.add(Column::TotalAmount.lte(max));
    }
    if let Some(from) = filter.from {
        condition = condition.add(Column::CreatedAt.gte(from));
    }
    if let Some(to) = filter.to {
        condition = condition.add(Column::CreatedAt.lte(to));
    }

    condition
}

/// Query returning every purchase order accepted by a filter, ordered by id.
#[derive(Debug, Clone)]
pub struct FilterPurchaseOrdersQuery {
    pub filter: PurchaseOrderFilter,
}

impl FilterPurchaseOrdersQuery {
    pub fn new(filter: PurchaseOrderFilter) -> Self {
        Self { filter }
    }
}

#[async_trait]
impl Query for FilterPurchaseOrdersQuery {
    type Result = Vec<PurchaseOrderModel>;

    async fn execute<C>(&self, db: &C) -> Result<Self::Result, ServiceError>
    where
        C: ConnectionTrait + Send + Sync,
    {
        self.filter.validate_ranges()?;

        PurchaseOrderEntity::find()
            .filter(build_condition(&self.filter))
            .order_by_asc(Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::from)
    }
}
