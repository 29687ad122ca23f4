use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, ModelTrait, NotSet,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::purchase_order::{
    search_key, ActiveModel as PurchaseOrderActiveModel, Column, Entity as PurchaseOrder,
    Model as PurchaseOrderModel,
};
use crate::models::purchase_order::NewPurchaseOrder;

/// Every purchase order, ordered by id.
pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<PurchaseOrderModel>, DbErr> {
    PurchaseOrder::find().order_by_asc(Column::Id).all(db).await
}

pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<Option<PurchaseOrderModel>, DbErr> {
    PurchaseOrder::find_by_id(id).one(db).await
}

/// Looks up an order number, optionally ignoring one record (the one being updated).
pub async fn find_by_order_number<C: ConnectionTrait>(
    db: &C,
    order_number: &str,
    excluding_id: Option<i64>,
) -> Result<Option<PurchaseOrderModel>, DbErr> {
    let mut query = PurchaseOrder::find().filter(Column::OrderNumber.eq(order_number));
    if let Some(id) = excluding_id {
        query = query.filter(Column::Id.ne(id));
    }
    query.one(db).await
}

/// Inserts a new row; the store assigns the id.
pub async fn insert<C: ConnectionTrait>(
    db: &C,
    input: NewPurchaseOrder,
    created_at: DateTime<Utc>,
) -> Result<PurchaseOrderModel, DbErr> {
    let active = PurchaseOrderActiveModel {
        id: NotSet,
        order_number_folded: Set(search_key(&input.order_number)),
        supplier_name_folded: Set(search_key(&input.supplier_name)),
        order_number: Set(input.order_number),
        supplier_name: Set(input.supplier_name),
        status: Set(input.status),
        total_amount: Set(input.total_amount),
        currency: Set(input.currency),
        created_at: Set(created_at),
        expected_delivery_date: Set(input.expected_delivery_date),
    };
    active.insert(db).await
}

/// Overwrites every client-writable column of `existing` and refreshes the folded
/// search columns; id and created_at are kept.
pub async fn replace<C: ConnectionTrait>(
    db: &C,
    existing: PurchaseOrderModel,
    input: NewPurchaseOrder,
) -> Result<PurchaseOrderModel, DbErr> {
    let mut active: PurchaseOrderActiveModel = existing.into();
    active.order_number_folded = Set(search_key(&input.order_number));
    active.supplier_name_folded = Set(search_key(&input.supplier_name));
    active.order_number = Set(input.order_number);
    active.supplier_name = Set(input.supplier_name);
    active.status = Set(input.status);
    active.total_amount = Set(input.total_amount);
    active.currency = Set(input.currency);
    active.expected_delivery_date = Set(input.expected_delivery_date);
    active.update(db).await
}

pub async fn delete<C: ConnectionTrait>(db: &C, existing: PurchaseOrderModel) -> Result<(), DbErr> {
    existing.delete(db).await.map(|_| ())
}
