use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::{
    entities::purchase_order::Model as PurchaseOrderModel,
    errors::{ServiceError, ServiceResult},
    models::{filter::PurchaseOrderFilter, purchase_order::NewPurchaseOrder},
    queries::{purchase_order_queries::FilterPurchaseOrdersQuery, Query},
    repositories::purchase_order_repository as repo,
};

/// Purchase order use cases: filtered listing and single-record CRUD.
#[derive(Clone)]
pub struct PurchaseOrderService {
    db: Arc<DatabaseConnection>,
}

fn not_found(id: i64) -> ServiceError {
    ServiceError::not_found(format!("Purchase order with id {} not found", id))
}

fn duplicate_message(order_number: &str) -> String {
    format!("Purchase order number '{}' already exists", order_number)
}

fn duplicate_order_number(order_number: &str) -> ServiceError {
    ServiceError::ConstraintViolation(duplicate_message(order_number))
}

impl PurchaseOrderService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Every purchase order, ordered by id.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> ServiceResult<Vec<PurchaseOrderModel>> {
        let orders = repo::find_all(&*self.db).await?;
        debug!(count = orders.len(), "listed purchase orders");
        Ok(orders)
    }

    /// Purchase orders accepted by `filter`. Inconsistent ranges fail before any query runs.
    #[instrument(skip(self))]
    pub async fn list_filtered(
        &self,
        filter: PurchaseOrderFilter,
    ) -> ServiceResult<Vec<PurchaseOrderModel>> {
        if let Err(err) = filter.validate_ranges() {
            warn!(error = %err, "rejected purchase order filter");
            return Err(err);
        }
        if filter.is_empty() {
            return self.list_all().await;
        }

        let orders = FilterPurchaseOrdersQuery::new(filter)
            .execute(&*self.db)
            .await?;
        debug!(count = orders.len(), "filtered purchase orders");
        Ok(orders)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> ServiceResult<PurchaseOrderModel> {
        repo::find_by_id(&*self.db, id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    #[instrument(skip(self, input), fields(order_number = %input.order_number))]
    pub async fn create(&self, input: NewPurchaseOrder) -> ServiceResult<PurchaseOrderModel> {
        input.validate()?;

        let txn = self.db.begin().await?;
        if repo::find_by_order_number(&txn, &input.order_number, None)
            .await?
            .is_some()
        {
            warn!("duplicate purchase order number");
            return Err(duplicate_order_number(&input.order_number));
        }

        let order_number = input.order_number.clone();
        let created_at = Utc::now().trunc_subsecs(6);
        let created = repo::insert(&txn, input, created_at)
            .await
            .map_err(|e| ServiceError::from_write_error(e, || duplicate_message(&order_number)))?;
        txn.commit().await?;

        info!(id = created.id, "purchase order created");
        Ok(created)
    }

    #[instrument(skip(self, input), fields(order_number = %input.order_number))]
    pub async fn update(
        &self,
        id: i64,
        input: NewPurchaseOrder,
    ) -> ServiceResult<PurchaseOrderModel> {
        input.validate()?;

        let txn = self.db.begin().await?;
        let existing = repo::find_by_id(&txn, id)
            .await?
            .ok_or_else(|| not_found(id))?;

        if repo::find_by_order_number(&txn, &input.order_number, Some(id))
            .await?
            .is_some()
        {
            warn!("duplicate purchase order number");
            return Err(duplicate_order_number(&input.order_number));
        }

        let order_number = input.order_number.clone();
        let updated = repo::replace(&txn, existing, input)
            .await
            .map_err(|e| ServiceError::from_write_error(e, || duplicate_message(&order_number)))?;
        txn.commit().await?;

        info!(id, "purchase order updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let txn = self.db.begin().await?;
        let existing = repo::find_by_id(&txn, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        repo::delete(&txn, existing).await?;
        txn.commit().await?;

        info!(id, "purchase order deleted");
        Ok(())
    }
}
