//! `/store` operations.

use crate::petstore::context::HttpContext;
use crate::petstore::endpoints::{Operation, order_by_id};
use crate::petstore::error::ApiError;
use crate::petstore::models::Order;
use crate::petstore::response::ApiResponse;

/// Client for store and order operations.
#[derive(Debug, Clone, Copy)]
pub struct StoreClient<'ctx> {
    context: &'ctx HttpContext,
}

impl<'ctx> StoreClient<'ctx> {
    /// Binds the client to `context`.
    #[must_use]
    pub const fn new(context: &'ctx HttpContext) -> Self {
        Self { context }
    }

    /// `GET /store/inventory`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request cannot be completed.
    pub async fn inventory(&self) -> Result<ApiResponse, ApiError> {
        let endpoint = Operation::GetInventory.endpoint();
        self.context
            .send(endpoint.method(), endpoint.template(), &[])
            .await
    }

    /// `POST /store/order`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request cannot be completed.
    pub async fn place_order(&self, order: &Order) -> Result<ApiResponse, ApiError> {
        let endpoint = Operation::PlaceOrder.endpoint();
        self.context
            .send_json(endpoint.method(), endpoint.template(), order)
            .await
    }

    /// `GET /store/order/{orderId}`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request cannot be completed.
    pub async fn get_order_by_id(&self, id: i64) -> Result<ApiResponse, ApiError> {
        self.context
            .send(Operation::GetOrder.endpoint().method(), &order_by_id(id), &[])
            .await
    }

    /// `DELETE /store/order/{orderId}`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request cannot be completed.
    pub async fn delete_order(&self, id: i64) -> Result<ApiResponse, ApiError> {
        self.context
            .send(Operation::DeleteOrder.endpoint().method(), &order_by_id(id), &[])
            .await
    }
}
