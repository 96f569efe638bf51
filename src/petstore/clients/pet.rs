//! `/pet` operations.

use serde_json::Value;

use crate::petstore::context::HttpContext;
use crate::petstore::endpoints::{Operation, pet_by_id};
use crate::petstore::error::ApiError;
use crate::petstore::models::{Pet, PetStatus};
use crate::petstore::response::ApiResponse;

/// Client for pet operations.
#[derive(Debug, Clone, Copy)]
pub struct PetClient<'ctx> {
    context: &'ctx HttpContext,
}

impl<'ctx> PetClient<'ctx> {
    /// Binds the client to `context`.
    #[must_use]
    pub const fn new(context: &'ctx HttpContext) -> Self {
        Self { context }
    }

    /// `POST /pet`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request cannot be completed.
    pub async fn create(&self, pet: &Pet) -> Result<ApiResponse, ApiError> {
        let endpoint = Operation::CreatePet.endpoint();
        self.context
            .send_json(endpoint.method(), endpoint.template(), pet)
            .await
    }

    /// `PUT /pet`, replacing the pet identified by `pet.id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request cannot be completed.
    pub async fn update(&self, pet: &Pet) -> Result<ApiResponse, ApiError> {
        let endpoint = Operation::UpdatePet.endpoint();
        self.context
            .send_json(endpoint.method(), endpoint.template(), pet)
            .await
    }

    /// `PUT /pet` with a body sent exactly as given.
    ///
    /// Fields the typed [`Pet`] does not model survive the round trip.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request cannot be completed.
    pub async fn update_raw(&self, pet: &Value) -> Result<ApiResponse, ApiError> {
        let endpoint = Operation::UpdatePet.endpoint();
        self.context
            .send_json(endpoint.method(), endpoint.template(), pet)
            .await
    }

    /// `GET /pet/{petId}`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request cannot be completed.
    pub async fn get_by_id(&self, id: i64) -> Result<ApiResponse, ApiError> {
        self.context
            .send(Operation::GetPet.endpoint().method(), &pet_by_id(id), &[])
            .await
    }

    /// `GET /pet/findByStatus?status=...`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request cannot be completed.
    pub async fn find_by_status(&self, status: PetStatus) -> Result<ApiResponse, ApiError> {
        self.find_by_status_raw(status.as_str()).await
    }

    /// `GET /pet/findByStatus` with an arbitrary status string.
    ///
    /// The value is sent as-is so callers can check how the service treats
    /// unknown statuses.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request cannot be completed.
    pub async fn find_by_status_raw(&self, status: &str) -> Result<ApiResponse, ApiError> {
        let endpoint = Operation::FindPetsByStatus.endpoint();
        self.context
            .send(endpoint.method(), endpoint.template(), &[("status", status)])
            .await
    }

    /// `DELETE /pet/{petId}`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request cannot be completed.
    pub async fn delete(&self, id: i64) -> Result<ApiResponse, ApiError> {
        self.context
            .send(Operation::DeletePet.endpoint().method(), &pet_by_id(id), &[])
            .await
    }
}
