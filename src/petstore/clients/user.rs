//! `/user` operations.

use crate::petstore::context::HttpContext;
use crate::petstore::endpoints::{Operation, user_by_username};
use crate::petstore::error::ApiError;
use crate::petstore::models::User;
use crate::petstore::response::ApiResponse;

/// Client for user and session operations.
#[derive(Debug, Clone, Copy)]
pub struct UserClient<'ctx> {
    context: &'ctx HttpContext,
}

impl<'ctx> UserClient<'ctx> {
    /// Binds the client to `context`.
    #[must_use]
    pub const fn new(context: &'ctx HttpContext) -> Self {
        Self { context }
    }

    /// `POST /user`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request cannot be completed.
    pub async fn create(&self, user: &User) -> Result<ApiResponse, ApiError> {
        let endpoint = Operation::CreateUser.endpoint();
        self.context
            .send_json(endpoint.method(), endpoint.template(), user)
            .await
    }

    /// `GET /user/{username}`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request cannot be completed.
    pub async fn get_by_username(&self, username: &str) -> Result<ApiResponse, ApiError> {
        self.context
            .send(
                Operation::GetUser.endpoint().method(),
                &user_by_username(username),
                &[],
            )
            .await
    }

    /// `PUT /user/{username}`, replacing the stored user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request cannot be completed.
    pub async fn update(&self, username: &str, user: &User) -> Result<ApiResponse, ApiError> {
        self.context
            .send_json(
                Operation::UpdateUser.endpoint().method(),
                &user_by_username(username),
                user,
            )
            .await
    }

    /// `DELETE /user/{username}`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request cannot be completed.
    pub async fn delete(&self, username: &str) -> Result<ApiResponse, ApiError> {
        self.context
            .send(
                Operation::DeleteUser.endpoint().method(),
                &user_by_username(username),
                &[],
            )
            .await
    }

    /// `GET /user/login?username=...&password=...`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request cannot be completed.
    pub async fn login(&self, username: &str, password: &str) -> Result<ApiResponse, ApiError> {
        let endpoint = Operation::Login.endpoint();
        self.context
            .send(
                endpoint.method(),
                endpoint.template(),
                &[("username", username), ("password", password)],
            )
            .await
    }

    /// `GET /user/logout`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request cannot be completed.
    pub async fn logout(&self) -> Result<ApiResponse, ApiError> {
        let endpoint = Operation::Logout.endpoint();
        self.context
            .send(endpoint.method(), endpoint.template(), &[])
            .await
    }
}
