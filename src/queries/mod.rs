use async_trait::async_trait;
use sea_orm::ConnectionTrait;

use crate::errors::ServiceError;

pub mod purchase_order_queries;

/// Trait representing a generic asynchronous query.
#[async_trait]
pub trait Query: Send + Sync {
    type Result: Send + Sync;

    /// Executes the query against any connection or open transaction.
    async fn execute<C>(&self, db: &C) -> Result<Self::Result, ServiceError>
    where
        C: ConnectionTrait + Send + Sync;
}
