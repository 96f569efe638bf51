//! Per-resource client wrappers.
//!
//! Each wrapper borrows one [`HttpContext`] and maps its methods one-to-one
//! onto pet-store operations. A call issues exactly one request and returns
//! the raw [`ApiResponse`](super::ApiResponse) without looking at the
//! status, so callers can assert on error responses as easily as on
//! successful ones.

mod pet;
mod store;
mod user;

pub use pet::PetClient;
pub use store::StoreClient;
pub use user::UserClient;

use super::context::HttpContext;

/// The three wrappers bound to the same context.
#[derive(Debug, Clone, Copy)]
pub struct ApiClients<'ctx> {
    /// `/pet` operations.
    pub pets: PetClient<'ctx>,
    /// `/store` operations.
    pub store: StoreClient<'ctx>,
    /// `/user` operations.
    pub users: UserClient<'ctx>,
}

impl<'ctx> ApiClients<'ctx> {
    /// Binds all wrappers to `context`.
    #[must_use]
    pub const fn new(context: &'ctx HttpContext) -> Self {
        Self {
            pets: PetClient::new(context),
            store: StoreClient::new(context),
            users: UserClient::new(context),
        }
    }
}

#[cfg(test)]
mod tests;
