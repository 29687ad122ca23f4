//! Storage access for purchase orders.
//!
//! Functions are generic over `ConnectionTrait` so callers can pass either the
//! pool or an open transaction.

pub mod purchase_order_repository;
