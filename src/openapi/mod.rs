use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Purchase Order API",
        version = "1.0.0",
        description = r#"
# Purchase Order API

Create, read, update and delete purchase orders, and list them filtered by any
combination of:

- `q`: case-insensitive substring of the order number or supplier name
- `status`: DRAFT, SUBMITTED, APPROVED, REJECTED, CANCELLED
- `currency`: USD, EUR
- `minTotal` / `maxTotal`: inclusive total amount range
- `from` / `to`: inclusive creation time range (`yyyy-MM-ddTHH:mm:ss`, UTC)

## Error Handling

Failures share one body shape:

```json
{
  "error": "Bad Request",
  "message": "Invalid filter: minimum total must not exceed maximum total",
  "request_id": "5b0c1f7e-0c44-4a38-9f55-7f2f0a0c2f7d",
  "timestamp": "2025-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "purchase-orders", description = "Purchase order management endpoints")
    ),
    paths(
        crate::handlers::purchase_orders::list_purchase_orders,
        crate::handlers::purchase_orders::create_purchase_order,
        crate::handlers::purchase_orders::get_purchase_order,
        crate::handlers::purchase_orders::update_purchase_order,
        crate::handlers::purchase_orders::delete_purchase_order,
    ),
    components(
        schemas(
            crate::handlers::purchase_orders::PurchaseOrderRequest,
            crate::handlers::purchase_orders::PurchaseOrderResponse,
            crate::entities::purchase_order::OrderStatus,
            crate::entities::purchase_order::Currency,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
