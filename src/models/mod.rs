pub mod filter;
pub mod purchase_order;

pub use filter::PurchaseOrderFilter;
pub use purchase_order::NewPurchaseOrder;
