use super::common::{
    json_rejection, no_content_response, path_rejection, query_rejection, success_response,
};
use crate::{
    entities::purchase_order::{Currency, LiteralEnum, Model as PurchaseOrderModel, OrderStatus},
    errors::{ErrorResponse, ServiceError},
    models::{filter::PurchaseOrderFilter, purchase_order::NewPurchaseOrder},
    AppState,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Json, Path, Query, State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

// Request and response DTOs

/// Body of create and update requests. Every field is required.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderRequest {
    #[schema(example = "PO-1")]
    pub order_number: Option<String>,
    #[schema(example = "Acme Corp")]
    pub supplier_name: Option<String>,
    /// One of DRAFT, SUBMITTED, APPROVED, REJECTED, CANCELLED (any case)
    #[schema(example = "APPROVED")]
    pub status: Option<String>,
    #[schema(value_type = Option<String>, example = "100.00")]
    pub total_amount: Option<Decimal>,
    /// One of USD, EUR (any case)
    #[schema(example = "USD")]
    pub currency: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "2025-02-01")]
    pub expected_delivery_date: Option<NaiveDate>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ServiceError> {
    value.ok_or_else(|| ServiceError::validation(format!("{} is required", field)))
}

impl TryFrom<PurchaseOrderRequest> for NewPurchaseOrder {
    type Error = ServiceError;

    fn try_from(body: PurchaseOrderRequest) -> Result<Self, Self::Error> {
        Ok(NewPurchaseOrder {
            order_number: required(body.order_number, "orderNumber")?,
            supplier_name: required(body.supplier_name, "supplierName")?,
            status: OrderStatus::parse_literal(&required(body.status, "status")?)?,
            total_amount: required(body.total_amount, "totalAmount")?,
            currency: Currency::parse_literal(&required(body.currency, "currency")?)?,
            expected_delivery_date: required(body.expected_delivery_date, "expectedDeliveryDate")?,
        })
    }
}

/// A stored purchase order as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "PO-1")]
    pub order_number: String,
    #[schema(example = "Acme Corp")]
    pub supplier_name: String,
    pub status: OrderStatus,
    /// Exact amount with two fractional digits
    #[schema(example = "100.00")]
    pub total_amount: String,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = Date, example = "2025-02-01")]
    pub expected_delivery_date: NaiveDate,
}

impl From<PurchaseOrderModel> for PurchaseOrderResponse {
    fn from(model: PurchaseOrderModel) -> Self {
        let mut total_amount = model.total_amount;
        total_amount.rescale(2);
        Self {
            id: model.id,
            order_number: model.order_number,
            supplier_name: model.supplier_name,
            status: model.status,
            total_amount: total_amount.to_string(),
            currency: model.currency,
            created_at: model.created_at,
            expected_delivery_date: model.expected_delivery_date,
        }
    }
}

/// Optional listing filters. Omitted or blank parameters do not restrict the result.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListPurchaseOrdersParams {
    /// Case-insensitive substring of the order number or supplier name
    pub q: Option<String>,
    /// Status name, case-insensitive
    pub status: Option<String>,
    /// Currency code, case-insensitive
    pub currency: Option<String>,
    /// Inclusive minimum total amount
    #[param(value_type = Option<String>, example = "10.00")]
    pub min_total: Option<String>,
    /// Inclusive maximum total amount
    #[param(value_type = Option<String>, example = "500.00")]
    pub max_total: Option<String>,
    /// Inclusive lower bound on the creation time, e.g. 2025-01-01T00:00:00 (UTC)
    pub from: Option<String>,
    /// Inclusive upper bound on the creation time, e.g. 2025-12-31T23:59:59 (UTC)
    pub to: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_literal<E: LiteralEnum>(value: Option<String>) -> Result<Option<E>, ServiceError> {
    non_blank(value)
        .map(|raw| E::parse_literal(&raw))
        .transpose()
        .map_err(ServiceError::from)
}

fn parse_amount(value: Option<String>, name: &str) -> Result<Option<Decimal>, ServiceError> {
    non_blank(value)
        .map(|raw| {
            Decimal::from_str(raw.trim()).map_err(|_| {
                ServiceError::validation(format!("Invalid {} value: {}", name, raw))
            })
        })
        .transpose()
}

const LOCAL_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Accepts an offset-less ISO-8601 date-time (read as UTC) or an RFC 3339 timestamp.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Utc));
    }
    LOCAL_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

fn parse_bound(value: Option<String>, name: &str) -> Result<Option<DateTime<Utc>>, ServiceError> {
    non_blank(value)
        .map(|raw| {
            parse_timestamp(&raw).ok_or_else(|| {
                ServiceError::validation(format!(
                    "Invalid {} value: {}. Expected format: yyyy-MM-ddTHH:mm:ss",
                    name, raw
                ))
            })
        })
        .transpose()
}

impl TryFrom<ListPurchaseOrdersParams> for PurchaseOrderFilter {
    type Error = ServiceError;

    fn try_from(params: ListPurchaseOrdersParams) -> Result<Self, Self::Error> {
        Ok(PurchaseOrderFilter {
            q: non_blank(params.q),
            status: parse_literal(params.status)?,
            currency: parse_literal(params.currency)?,
            min_total: parse_amount(params.min_total, "minTotal")?,
            max_total: parse_amount(params.max_total, "maxTotal")?,
            from: parse_bound(params.from, "from")?,
            to: parse_bound(params.to, "to")?,
        })
    }
}

/// Creates the router for purchase order endpoints
pub fn purchase_order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_purchase_orders).post(create_purchase_order))
        .route(
            "/:id",
            get(get_purchase_order)
                .put(update_purchase_order)
                .delete(delete_purchase_order),
        )
}

/// List purchase orders, optionally filtered
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders",
    params(ListPurchaseOrdersParams),
    responses(
        (status = 200, description = "Matching purchase orders, ordered by id", body = Vec<PurchaseOrderResponse>),
        (status = 400, description = "Invalid filter value or inconsistent range", body = ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn list_purchase_orders(
    State(state): State<AppState>,
    params: Result<Query<ListPurchaseOrdersParams>, QueryRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let Query(params) = params.map_err(query_rejection)?;
    let filter = PurchaseOrderFilter::try_from(params)?;

    let orders = state.services.purchase_orders.list_filtered(filter).await?;
    let body: Vec<PurchaseOrderResponse> = orders.into_iter().map(Into::into).collect();
    Ok(success_response(body))
}

/// Create a purchase order
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders",
    request_body = PurchaseOrderRequest,
    responses(
        (status = 200, description = "Purchase order created", body = PurchaseOrderResponse),
        (status = 400, description = "Invalid or missing field", body = ErrorResponse),
        (status = 409, description = "Order number already exists", body = ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn create_purchase_order(
    State(state): State<AppState>,
    payload: Result<Json<PurchaseOrderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let Json(payload) = payload.map_err(json_rejection)?;
    let input = NewPurchaseOrder::try_from(payload)?;

    let created = state.services.purchase_orders.create(input).await?;
    Ok(success_response(PurchaseOrderResponse::from(created)))
}

/// Get a purchase order by id
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders/{id}",
    params(("id" = i64, Path, description = "Purchase order id")),
    responses(
        (status = 200, description = "Purchase order found", body = PurchaseOrderResponse),
        (status = 400, description = "Id is not an integer", body = ErrorResponse),
        (status = 404, description = "Purchase order not found", body = ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn get_purchase_order(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let Path(id) = id.map_err(path_rejection)?;
    let order = state.services.purchase_orders.get(id).await?;
    Ok(success_response(PurchaseOrderResponse::from(order)))
}

/// Replace every writable field of a purchase order
#[utoipa::path(
    put,
    path = "/api/v1/purchase-orders/{id}",
    params(("id" = i64, Path, description = "Purchase order id")),
    request_body = PurchaseOrderRequest,
    responses(
        (status = 200, description = "Purchase order updated", body = PurchaseOrderResponse),
        (status = 400, description = "Invalid or missing field", body = ErrorResponse),
        (status = 404, description = "Purchase order not found", body = ErrorResponse),
        (status = 409, description = "Order number already exists", body = ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn update_purchase_order(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PurchaseOrderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let Path(id) = id.map_err(path_rejection)?;
    let Json(payload) = payload.map_err(json_rejection)?;
    let input = NewPurchaseOrder::try_from(payload)?;

    let updated = state.services.purchase_orders.update(id, input).await?;
    Ok(success_response(PurchaseOrderResponse::from(updated)))
}

/// Delete a purchase order
#[utoipa::path(
    delete,
    path = "/api/v1/purchase-orders/{id}",
    params(("id" = i64, Path, description = "Purchase order id")),
    responses(
        (status = 204, description = "Purchase order deleted"),
        (status = 400, description = "Id is not an integer", body = ErrorResponse),
        (status = 404, description = "Purchase order not found", body = ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn delete_purchase_order(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let Path(id) = id.map_err(path_rejection)?;
    state.services.purchase_orders.delete(id).await?;
    Ok(no_content_response())
}
